use serde::{Deserialize, Serialize};

/// Container/content hint for a channel stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    #[serde(rename = "application/x-mpegURL")]
    Hls,
    #[serde(rename = "video/mp4")]
    Mp4,
    #[serde(rename = "audio/mp3")]
    Mp3,
}

impl MediaType {
    /// Infer from the suffix of a stream URL. Anything unrecognized is HLS.
    pub fn from_url(url: &str) -> Self {
        if url.ends_with(".m3u8") {
            Self::Hls
        } else if url.ends_with(".mp4") {
            Self::Mp4
        } else if url.ends_with(".mp3") {
            Self::Mp3
        } else {
            Self::Hls
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Hls => "application/x-mpegURL",
            Self::Mp4 => "video/mp4",
            Self::Mp3 => "audio/mp3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        assert_eq!(MediaType::from_url("http://a/b.m3u8"), MediaType::Hls);
        assert_eq!(MediaType::from_url("http://a/b.mp4"), MediaType::Mp4);
        assert_eq!(MediaType::from_url("http://a/b.mp3"), MediaType::Mp3);
        assert_eq!(MediaType::from_url("http://a/live"), MediaType::Hls);
        assert_eq!(MediaType::from_url("http://a/b.ts"), MediaType::Hls);
    }

    #[test]
    fn test_serializes_as_mime() {
        let json = serde_json::to_string(&MediaType::Mp4).unwrap();
        assert_eq!(json, "\"video/mp4\"");
    }
}
