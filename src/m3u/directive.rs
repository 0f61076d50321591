//! Field extraction for `#EXTINF`, `#EXTVLCOPT` and `#KODIPROP` directives.
//!
//! `#EXTINF` attributes are read through pattern tables so new `tvg-*` keys or
//! leaked header tokens are a table entry rather than another branch. Vendor
//! option lines go through [`OptionRule`]s, evaluated in order.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{builder::PendingChannel, classifier::LineType};
use crate::channel::{Tvg, HTTP_REFERRER, HTTP_USER_AGENT, VLC_HEADER_PREFIX};

/// Marker some providers append to names of region-locked streams.
pub const GEO_BLOCKED: &str = "[Geo-blocked]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TvgField {
    Id,
    Name,
    Logo,
    Language,
    Country,
    Url,
}

impl TvgField {
    fn slot(self, tvg: &mut Tvg) -> &mut Option<String> {
        match self {
            Self::Id => &mut tvg.id,
            Self::Name => &mut tvg.name,
            Self::Logo => &mut tvg.logo,
            Self::Language => &mut tvg.language,
            Self::Country => &mut tvg.country,
            Self::Url => &mut tvg.url,
        }
    }
}

fn quoted_attribute(name: &str) -> Regex {
    Regex::new(&format!(r#"(?i){}="([^"]*)""#, regex::escape(name)))
        .expect("Regular expression error")
}

static DURATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#EXTINF:(-?\d+(?:\.\d+)?)").expect("Regular expression error"));

static TVG_RULES: Lazy<Vec<(TvgField, Regex)>> = Lazy::new(|| {
    vec![
        (TvgField::Id, quoted_attribute("tvg-id")),
        (TvgField::Name, quoted_attribute("tvg-name")),
        (TvgField::Logo, quoted_attribute("tvg-logo")),
        (TvgField::Language, quoted_attribute("tvg-language")),
        (TvgField::Country, quoted_attribute("tvg-country")),
        (TvgField::Url, quoted_attribute("tvg-url")),
    ]
});

static GROUP_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| quoted_attribute("group-title"));

/// A header hint that providers write inline, often leaking into the name.
struct LeakedHeader {
    key: &'static str,
    token: &'static str,
    quoted: Regex,
    unquoted: Regex,
}

impl LeakedHeader {
    fn new(key: &'static str, token: &'static str) -> Self {
        let escaped = regex::escape(token);
        Self {
            key,
            token,
            quoted: Regex::new(&format!(r#"(?i){escaped}"([^"]*)""#))
                .expect("Regular expression error"),
            unquoted: Regex::new(&format!(r#"(?i){escaped}([^"\s]\S*)"#))
                .expect("Regular expression error"),
        }
    }

    /// Quoted form first, then the bare token form.
    fn find(&self, text: &str) -> Option<String> {
        [&self.quoted, &self.unquoted]
            .into_iter()
            .filter_map(|re| re.captures(text))
            .map(|caps| caps[1].to_string())
            .find(|value| !value.is_empty())
    }
}

static LEAKED_HEADERS: Lazy<[LeakedHeader; 2]> = Lazy::new(|| {
    [
        LeakedHeader::new(HTTP_REFERRER, "http-referrer="),
        LeakedHeader::new(HTTP_USER_AGENT, "http-user-agent="),
    ]
});

/// Extractor for `#EXTINF` channel definition lines.
pub struct ExtInfExtractor;

impl ExtInfExtractor {
    /// Build a fresh in-progress channel from a definition line.
    ///
    /// `emitted` is the number of channels already completed in this parse
    /// pass; it numbers the placeholder name when the line carries none.
    pub fn extract(line: &str, emitted: usize) -> PendingChannel {
        let mut channel = PendingChannel::new();

        channel.duration = Self::parse_duration(line);

        for (field, pattern) in TVG_RULES.iter() {
            if let Some(value) = Self::capture(pattern, line) {
                *field.slot(&mut channel.tvg) = Some(value);
            }
        }

        channel.group.title = Self::capture(&GROUP_TITLE_REGEX, line);

        for header in LEAKED_HEADERS.iter() {
            if let Some(value) = header.find(line) {
                channel.set_attribute(header.key, value);
            }
        }

        channel.name = Self::display_name_part(line)
            .and_then(|raw| Self::clean_display_name(raw, &mut channel))
            .unwrap_or_else(|| format!("Channel {}", emitted + 1));

        channel
    }

    fn capture(pattern: &Regex, line: &str) -> Option<String> {
        pattern
            .captures(line)
            .map(|caps| caps[1].to_string())
            .filter(|value| !value.is_empty())
    }

    fn parse_duration(line: &str) -> f64 {
        DURATION_REGEX
            .captures(line)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(-1.0)
    }

    /// Text after the last comma outside double quotes.
    fn display_name_part(line: &str) -> Option<&str> {
        let mut in_quotes = false;
        let mut last_comma = None;

        for (i, c) in line.char_indices() {
            match c {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => last_comma = Some(i),
                _ => {}
            }
        }

        let name = line[last_comma? + 1..].trim();
        (!name.is_empty()).then_some(name)
    }

    /// Strip leaked header tokens from the name, keeping a geo-block marker.
    fn clean_display_name(raw: &str, channel: &mut PendingChannel) -> Option<String> {
        let lowered = raw.to_ascii_lowercase();
        let cut = LEAKED_HEADERS
            .iter()
            .filter_map(|header| lowered.find(header.token))
            .min();

        let mut name = raw;
        if let Some(cut) = cut {
            name = raw[..cut].trim_end();

            for header in LEAKED_HEADERS.iter() {
                if channel.attributes.contains_key(header.key) {
                    continue;
                }
                if let Some(value) = header.find(raw) {
                    channel.set_attribute(header.key, value);
                }
            }
        }

        let name = if raw.contains(GEO_BLOCKED) {
            let base = name.split(GEO_BLOCKED).next().unwrap_or_default().trim();
            if base.is_empty() {
                GEO_BLOCKED.to_string()
            } else {
                format!("{base} {GEO_BLOCKED}")
            }
        } else {
            name.to_string()
        };

        (!name.is_empty()).then_some(name)
    }
}

/// Rule applied to vendor option lines while a channel is being collected.
pub trait OptionRule: Send + Sync {
    /// Check if this rule handles the line kind.
    fn matches(&self, line_type: &LineType) -> bool;

    /// Apply the option to the in-progress channel.
    fn apply(&self, line: &str, channel: &mut PendingChannel);
}

static VLC_CUSTOM_HEADER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^http-([^=]+)=(.+)$").expect("Regular expression error"));

/// `#EXTVLCOPT:http-*` header options.
pub struct VlcHeaderRule;

impl OptionRule for VlcHeaderRule {
    fn matches(&self, line_type: &LineType) -> bool {
        *line_type == LineType::VlcOption
    }

    fn apply(&self, line: &str, channel: &mut PendingChannel) {
        let Some(option) = line.trim().strip_prefix("#EXTVLCOPT:") else {
            return;
        };

        if let Some((_, value)) = option.split_once("http-referrer=") {
            channel.set_attribute(HTTP_REFERRER, value.trim());
        } else if let Some((_, value)) = option.split_once("http-user-agent=") {
            channel.set_attribute(HTTP_USER_AGENT, value.trim());
        } else if let Some(caps) = VLC_CUSTOM_HEADER_REGEX.captures(option.trim()) {
            let name = caps[1].trim().to_lowercase();
            let value = caps[2].trim();
            tracing::debug!("Found custom header: {}={}", name, value);
            channel.set_attribute(format!("{VLC_HEADER_PREFIX}{name}"), value);
        }
    }
}

static KODI_REFERER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Referer=([^&]+)").expect("Regular expression error"));
static KODI_USER_AGENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"User-Agent=([^&]+)").expect("Regular expression error"));

/// `#KODIPROP:` / `#EXTKODIPROP:` referrer and user agent properties.
pub struct KodiHeaderRule;

impl OptionRule for KodiHeaderRule {
    fn matches(&self, line_type: &LineType) -> bool {
        *line_type == LineType::KodiProp
    }

    fn apply(&self, line: &str, channel: &mut PendingChannel) {
        if let Some(caps) = KODI_REFERER_REGEX.captures(line) {
            channel.set_attribute(HTTP_REFERRER, caps[1].trim());
        }
        if let Some(caps) = KODI_USER_AGENT_REGEX.captures(line) {
            channel.set_attribute(HTTP_USER_AGENT, caps[1].trim());
        }
    }
}

/// Create default set of option rules.
pub fn default_option_rules() -> Vec<Box<dyn OptionRule>> {
    vec![Box::new(VlcHeaderRule), Box::new(KodiHeaderRule)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_full_definition() {
        let line = r#"#EXTINF:-1 tvg-id="abc" tvg-logo="http://x/y.png" group-title="News",CNN"#;
        let channel = ExtInfExtractor::extract(line, 0);

        assert_eq!(channel.name, "CNN");
        assert_eq!(channel.duration, -1.0);
        assert_eq!(channel.tvg.id.as_deref(), Some("abc"));
        assert_eq!(channel.tvg.logo.as_deref(), Some("http://x/y.png"));
        assert_eq!(channel.tvg.name, None);
        assert_eq!(channel.group.title.as_deref(), Some("News"));
        assert!(channel.attributes.is_empty());
    }

    #[test]
    fn test_extract_all_tvg_fields() {
        let line = r#"#EXTINF:0 tvg-id="i" tvg-name="n" tvg-logo="l" tvg-language="en" tvg-country="US" tvg-url="u",X"#;
        let channel = ExtInfExtractor::extract(line, 0);

        assert_eq!(channel.duration, 0.0);
        assert_eq!(channel.tvg.name.as_deref(), Some("n"));
        assert_eq!(channel.tvg.language.as_deref(), Some("en"));
        assert_eq!(channel.tvg.country.as_deref(), Some("US"));
        assert_eq!(channel.tvg.url.as_deref(), Some("u"));
    }

    #[test]
    fn test_empty_attribute_values_are_absent() {
        let line = r#"#EXTINF:-1 tvg-id="" group-title="",A"#;
        let channel = ExtInfExtractor::extract(line, 0);

        assert_eq!(channel.tvg.id, None);
        assert_eq!(channel.group.title, None);
    }

    #[test]
    fn test_duration() {
        assert_eq!(ExtInfExtractor::extract("#EXTINF:12.5,A", 0).duration, 12.5);
        assert_eq!(ExtInfExtractor::extract("#EXTINF:abc,A", 0).duration, -1.0);
        assert_eq!(ExtInfExtractor::extract("#EXTINF,A", 0).duration, -1.0);
    }

    #[test]
    fn test_leaked_headers_truncate_name() {
        let line = r#"#EXTINF:-1,Fox News http-referrer="http://fox.com/" http-user-agent="Mozilla""#;
        let channel = ExtInfExtractor::extract(line, 0);

        assert_eq!(channel.name, "Fox News");
        assert_eq!(channel.attributes.get(HTTP_REFERRER).unwrap(), "http://fox.com/");
        assert_eq!(channel.attributes.get(HTTP_USER_AGENT).unwrap(), "Mozilla");
        assert_eq!(channel.attributes.len(), 2);
    }

    #[test]
    fn test_blank_header_before_name_falls_back_to_name_token() {
        // The first referrer on the line is blank, so only the copy inside
        // the name supplies a value.
        let line = r#"#EXTINF:-1 http-referrer="",Fox News http-referrer="http://fox.com/""#;
        let channel = ExtInfExtractor::extract(line, 0);

        assert_eq!(channel.name, "Fox News");
        assert_eq!(channel.attributes.get(HTTP_REFERRER).unwrap(), "http://fox.com/");
        assert_eq!(channel.attributes.len(), 1);
    }

    #[test]
    fn test_unquoted_leaked_headers() {
        let line = "#EXTINF:-1,ABC http-referrer=http://abc.com/ http-user-agent=VLC/3.0";
        let channel = ExtInfExtractor::extract(line, 0);

        assert_eq!(channel.name, "ABC");
        assert_eq!(channel.attributes.get(HTTP_REFERRER).unwrap(), "http://abc.com/");
        assert_eq!(channel.attributes.get(HTTP_USER_AGENT).unwrap(), "VLC/3.0");
    }

    #[test]
    fn test_quoted_header_with_comma_stays_out_of_name() {
        let line =
            r#"#EXTINF:-1 http-user-agent="Mozilla/5.0 (KHTML, like Gecko)",NBC"#;
        let channel = ExtInfExtractor::extract(line, 0);

        assert_eq!(channel.name, "NBC");
        assert_eq!(
            channel.attributes.get(HTTP_USER_AGENT).unwrap(),
            "Mozilla/5.0 (KHTML, like Gecko)"
        );
    }

    #[test]
    fn test_geo_blocked_marker_survives_truncation() {
        let line = r#"#EXTINF:-1,CBS http-referrer="http://cbs.com/" [Geo-blocked]"#;
        let channel = ExtInfExtractor::extract(line, 0);
        assert_eq!(channel.name, "CBS [Geo-blocked]");

        let channel = ExtInfExtractor::extract("#EXTINF:-1,CBS   [Geo-blocked]", 0);
        assert_eq!(channel.name, "CBS [Geo-blocked]");
    }

    #[test]
    fn test_placeholder_name() {
        let channel = ExtInfExtractor::extract(r#"#EXTINF:-1 tvg-id="a""#, 4);
        assert_eq!(channel.name, "Channel 5");

        let channel = ExtInfExtractor::extract("#EXTINF:-1,   ", 0);
        assert_eq!(channel.name, "Channel 1");

        let channel = ExtInfExtractor::extract(r#"#EXTINF:-1,http-referrer="http://a/""#, 1);
        assert_eq!(channel.name, "Channel 2");
        assert_eq!(channel.attributes.get(HTTP_REFERRER).unwrap(), "http://a/");
    }

    #[test]
    fn test_vlc_options() {
        let rule = VlcHeaderRule;
        let mut channel = PendingChannel::new();

        rule.apply("#EXTVLCOPT:http-referrer=http://a.com/", &mut channel);
        rule.apply("#EXTVLCOPT:http-user-agent=Mozilla/5.0 (X11)", &mut channel);
        rule.apply("#EXTVLCOPT:http-Origin= http://a.com ", &mut channel);
        rule.apply("#EXTVLCOPT:network-caching=1000", &mut channel);

        assert_eq!(channel.attributes.get(HTTP_REFERRER).unwrap(), "http://a.com/");
        assert_eq!(
            channel.attributes.get(HTTP_USER_AGENT).unwrap(),
            "Mozilla/5.0 (X11)"
        );
        assert_eq!(
            channel.attributes.get("EXTVLCOPT:http-origin").unwrap(),
            "http://a.com"
        );
        assert_eq!(channel.attributes.len(), 3);
    }

    #[test]
    fn test_kodi_props() {
        let rule = KodiHeaderRule;
        let mut channel = PendingChannel::new();

        rule.apply(
            "#KODIPROP:inputstream.adaptive.stream_headers=Referer=http://k.tv/&User-Agent=Kodi",
            &mut channel,
        );

        assert_eq!(channel.attributes.get(HTTP_REFERRER).unwrap(), "http://k.tv/");
        assert_eq!(channel.attributes.get(HTTP_USER_AGENT).unwrap(), "Kodi");
    }

    #[test]
    fn test_rules_match_their_line_kind() {
        assert!(VlcHeaderRule.matches(&LineType::VlcOption));
        assert!(!VlcHeaderRule.matches(&LineType::KodiProp));
        assert!(KodiHeaderRule.matches(&LineType::KodiProp));
        assert!(!KodiHeaderRule.matches(&LineType::UriCandidate));
    }
}
