/// Represents the kind of a line in an IPTV M3U playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Blank,
    /// `#EXTINF` channel definition.
    ChannelDefinition,
    /// `#EXTVLCOPT:` player option.
    VlcOption,
    /// `#KODIPROP:` or `#EXTKODIPROP:` property.
    KodiProp,
    /// Any other `#` line, including `#EXTM3U`.
    OtherComment,
    UriCandidate,
}

impl LineType {
    /// Directive kinds that mutate a channel being collected.
    pub fn is_option(&self) -> bool {
        matches!(self, Self::VlcOption | Self::KodiProp)
    }

    /// Kinds that never affect channel assembly.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Blank | Self::OtherComment)
    }
}

/// Classifier for playlist lines.
pub struct LineClassifier;

impl LineClassifier {
    /// Classify one line. Surrounding whitespace is ignored.
    pub fn classify(line: &str) -> LineType {
        let line = line.trim();

        if line.is_empty() {
            return LineType::Blank;
        }

        if !line.starts_with('#') {
            return LineType::UriCandidate;
        }

        if line.starts_with("#EXTINF") {
            LineType::ChannelDefinition
        } else if line.starts_with("#EXTVLCOPT:") {
            LineType::VlcOption
        } else if line.starts_with("#KODIPROP:") || line.starts_with("#EXTKODIPROP:") {
            LineType::KodiProp
        } else {
            LineType::OtherComment
        }
    }
}
