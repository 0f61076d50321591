use serde::Serialize;
use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
};

use super::{
    builder::ChannelBuilder,
    classifier::LineClassifier,
    directive::{default_option_rules, OptionRule},
};
use crate::channel::Channel;

/// Non-fatal notes about a parse pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A channel definition was never followed by a URI.
    UnterminatedDefinition { line: usize, name: String },
    /// The pass failed internally; its channels were discarded.
    Failed { reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedDefinition { line, name } => {
                write!(f, "line {}: definition '{}' has no stream URI", line, name)
            }
            Self::Failed { reason } => write!(f, "parse failed: {}", reason),
        }
    }
}

/// Result of parsing one playlist text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub channels: Vec<Channel>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseReport {
    pub fn failed(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::Failed { .. }))
    }
}

/// Drives classification, extraction and building over a playlist text.
pub struct PlaylistParser {
    rules: fn() -> Vec<Box<dyn OptionRule>>,
}

impl PlaylistParser {
    pub fn new() -> Self {
        Self {
            rules: default_option_rules,
        }
    }

    pub fn with_rules(rules: fn() -> Vec<Box<dyn OptionRule>>) -> Self {
        Self { rules }
    }

    /// Parse a playlist. Never fails: an internal fault yields no channels
    /// and a [`Diagnostic::Failed`].
    pub fn parse(&self, input: &str) -> ParseReport {
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(input))) {
            Ok(report) => report,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!("Error parsing M3U playlist: {}", reason);

                ParseReport {
                    channels: Vec::new(),
                    diagnostics: vec![Diagnostic::Failed { reason }],
                }
            }
        }
    }

    fn run(&self, input: &str) -> ParseReport {
        let mut builder = ChannelBuilder::new((self.rules)());
        let mut channels = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let line = line.trim();
            let line_type = LineClassifier::classify(line);
            if line_type.is_ignored() {
                continue;
            }

            if let Some(channel) = builder.feed(index + 1, line_type, line) {
                channels.push(channel);
            }
        }

        let diagnostics = builder
            .finish()
            .into_iter()
            .map(|dropped| Diagnostic::UnterminatedDefinition {
                line: dropped.line,
                name: dropped.name,
            })
            .collect();

        ParseReport {
            channels,
            diagnostics,
        }
    }
}

impl Default for PlaylistParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse with the default option rules.
pub fn parse_m3u(input: &str) -> ParseReport {
    PlaylistParser::new().parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        channel::{MediaType, HTTP_REFERRER, HTTP_USER_AGENT, VLC_HEADER_PREFIX},
        m3u::builder::PendingChannel,
        m3u::classifier::LineType,
    };

    #[test]
    fn test_parse_reference_channel() {
        let input = "#EXTM3U\n\
#EXTINF:-1 tvg-id=\"abc\" tvg-logo=\"http://x/y.png\" group-title=\"News\",CNN\n\
http://stream/cnn.m3u8\n";
        let report = parse_m3u(input);

        assert!(report.diagnostics.is_empty());
        assert_eq!(report.channels.len(), 1);

        let cnn = &report.channels[0];
        assert_eq!(cnn.name, "CNN");
        assert_eq!(cnn.duration, -1.0);
        assert_eq!(cnn.tvg.id.as_deref(), Some("abc"));
        assert_eq!(cnn.tvg.logo.as_deref(), Some("http://x/y.png"));
        assert_eq!(cnn.group.title.as_deref(), Some("News"));
        assert_eq!(cnn.url, "http://stream/cnn.m3u8");
        assert_eq!(cnn.media_type, MediaType::Hls);
    }

    #[test]
    fn test_parse_list_in_order() {
        let input = r#"#EXTM3U x-tvg-url="http://epg/guide.xml"

#EXTINF:-1 group-title="Sports",ESPN
http://a/espn.m3u8

#EXTINF:10,Radio One
http://a/radio.mp3
#EXTINF:-1,Movie
http://a/movie.mp4
"#;
        let report = parse_m3u(input);
        let names: Vec<_> = report.channels.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["ESPN", "Radio One", "Movie"]);
        assert_eq!(report.channels[1].media_type, MediaType::Mp3);
        assert_eq!(report.channels[1].duration, 10.0);
        assert_eq!(report.channels[2].media_type, MediaType::Mp4);
    }

    #[test]
    fn test_crlf_and_indentation() {
        let input = "#EXTM3U\r\n  #EXTINF:-1,CNN  \r\n   http://a/cnn.m3u8   \r\n";
        let report = parse_m3u(input);

        assert_eq!(report.channels.len(), 1);
        assert_eq!(report.channels[0].name, "CNN");
        assert_eq!(report.channels[0].url, "http://a/cnn.m3u8");
    }

    #[test]
    fn test_unterminated_definition_yields_nothing() {
        let report = parse_m3u("#EXTM3U\n#EXTINF:-1,Lost\n# trailing comment\n");

        assert!(report.channels.is_empty());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnterminatedDefinition {
                line: 2,
                name: "Lost".to_string()
            }]
        );
        assert!(!report.failed());
    }

    #[test]
    fn test_empty_input() {
        let report = parse_m3u("");
        assert!(report.channels.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_placeholder_counts_emitted_channels() {
        let input = "#EXTINF:-1,A\nhttp://a/1\n#EXTINF:-1\nhttp://a/2\n";
        let report = parse_m3u(input);

        assert_eq!(report.channels[1].name, "Channel 2");
    }

    #[test]
    fn test_every_channel_has_name_and_url() {
        let input = "#EXTINF:-1,\nhttp://a/1\n#EXTINF:-1,B\n#EXTINF:-1,C\nhttp://a/3\nhttp://a/orphan\n";
        let report = parse_m3u(input);

        assert_eq!(report.channels.len(), 2);
        for channel in &report.channels {
            assert!(!channel.name.is_empty());
            assert!(!channel.url.is_empty());
        }
    }

    #[test]
    fn test_only_documented_attribute_keys() {
        let input = r#"#EXTM3U
#EXTINF:-1 tvg-id="x" http-referrer="http://r/",A http-user-agent=UA
#EXTVLCOPT:http-origin=http://o/
#EXTVLCOPT:network-caching=1000
#KODIPROP:inputstream.adaptive.manifest_type=hls
#KODIPROP:inputstream.adaptive.stream_headers=User-Agent=Kodi
http://a/1.m3u8
"#;
        let report = parse_m3u(input);
        let channel = &report.channels[0];

        assert_eq!(channel.name, "A");
        for key in channel.attributes.keys() {
            assert!(
                key == HTTP_REFERRER || key == HTTP_USER_AGENT || key.starts_with(VLC_HEADER_PREFIX),
                "unexpected attribute key {key}"
            );
        }
        assert_eq!(channel.attributes.get(HTTP_USER_AGENT).unwrap(), "Kodi");
        assert_eq!(channel.attributes.get("EXTVLCOPT:http-origin").unwrap(), "http://o/");
    }

    struct ExplodingRule;

    impl OptionRule for ExplodingRule {
        fn matches(&self, line_type: &LineType) -> bool {
            *line_type == LineType::VlcOption
        }

        fn apply(&self, _line: &str, _channel: &mut PendingChannel) {
            panic!("boom");
        }
    }

    fn exploding_rules() -> Vec<Box<dyn OptionRule>> {
        vec![Box::new(ExplodingRule)]
    }

    #[test]
    fn test_internal_failure_is_contained() {
        let parser = PlaylistParser::with_rules(exploding_rules);
        let report = parser.parse("#EXTINF:-1,A\n#EXTVLCOPT:x=y\nhttp://a/1\n");

        assert!(report.channels.is_empty());
        assert!(report.failed());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::Failed {
                reason: "boom".to_string()
            }]
        );
    }
}
