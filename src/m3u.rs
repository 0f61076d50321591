pub mod builder;
pub mod classifier;
pub mod directive;
pub mod parser;

pub use builder::{BuilderState, ChannelBuilder, PendingChannel};
pub use classifier::{LineClassifier, LineType};
pub use directive::{default_option_rules, ExtInfExtractor, OptionRule};
pub use parser::{parse_m3u, Diagnostic, ParseReport, PlaylistParser};
