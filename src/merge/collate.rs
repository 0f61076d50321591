use feruca::{Collator, Tailoring};
use std::{cell::RefCell, cmp::Ordering};

thread_local! {
    // CLDR root order, punctuation and spaces non-ignorable, byte order as
    // the final tiebreak.
    static COLLATOR: RefCell<Collator> =
        RefCell::new(Collator::new(Tailoring::default(), false, true));
}

/// Locale-aware string ordering for display lists.
///
/// Base letters compare first with accents folded, then accents, then case
/// (lowercase before uppercase). Byte order settles anything left.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| collator.borrow_mut().collate(a, b))
}
