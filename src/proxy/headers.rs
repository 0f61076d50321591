use crate::{channel::Channel, Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::collections::HashMap;

/// Codec for the base64url JSON header maps carried in `/stream` links.
pub struct HeaderCodec;

impl HeaderCodec {
    pub fn decode(encoded: &str) -> Result<HashMap<String, String>> {
        let json_bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| Error::InvalidHeaderEncoding(e.to_string()))?;

        serde_json::from_slice(&json_bytes).map_err(|e| Error::InvalidHeaderEncoding(e.to_string()))
    }

    pub fn encode(headers: &HashMap<String, String>) -> Result<String> {
        let json =
            serde_json::to_vec(headers).map_err(|e| Error::InvalidHeaderEncoding(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(&json))
    }

    /// Empty map for a missing or empty parameter.
    pub fn decode_optional(encoded: Option<&str>) -> Result<HashMap<String, String>> {
        match encoded {
            Some(s) if !s.is_empty() => Self::decode(s),
            _ => Ok(HashMap::new()),
        }
    }

    /// Relative `/stream` link for a channel, with its transport headers
    /// attached when it has any.
    pub fn stream_link(channel: &Channel) -> Result<String> {
        let headers = channel.stream_headers();
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("url", &channel.url);
        if !headers.is_empty() {
            query.append_pair("h", &Self::encode(&headers)?);
        }
        Ok(format!("/stream?{}", query.finish()))
    }
}
