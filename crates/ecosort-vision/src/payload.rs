//! Encoded image payloads accepted by the classifier

use base64::{engine::general_purpose::STANDARD, Engine};
use ecosort_types::FailureCause;

/// MIME type assumed when the payload carries no data-URI header
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// A base64 image ready to be sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    data: String,
}

impl ImagePayload {
    /// Parse a data URI (`data:image/png;base64,...`) or a bare base64 string.
    ///
    /// The payload must decode to at least one byte. Image content itself is
    /// not inspected.
    pub fn parse(encoded: &str) -> Result<Self, FailureCause> {
        let encoded = encoded.trim();
        let (mime_type, body) = match encoded.strip_prefix("data:") {
            Some(rest) => split_data_uri(rest)?,
            None => (DEFAULT_MIME_TYPE.to_string(), encoded),
        };

        let data: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if data.is_empty() {
            return Err(FailureCause::InvalidImage("payload is empty".to_string()));
        }

        let decoded = STANDARD
            .decode(data.as_bytes())
            .map_err(|e| FailureCause::InvalidImage(format!("not valid base64: {}", e)))?;
        if decoded.is_empty() {
            return Err(FailureCause::InvalidImage("payload decodes to zero bytes".to_string()));
        }

        Ok(Self { mime_type, data })
    }

    /// Encode raw image bytes (e.g. a file read from disk)
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Result<Self, FailureCause> {
        if bytes.is_empty() {
            return Err(FailureCause::InvalidImage("image file is empty".to_string()));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 data without any prefix
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Split `image/<subtype>;base64,<data>` (the part after `data:`)
fn split_data_uri(rest: &str) -> Result<(String, &str), FailureCause> {
    let (header, body) = rest
        .split_once(',')
        .ok_or_else(|| FailureCause::InvalidImage("data URI has no payload".to_string()))?;

    let subtype = header
        .strip_prefix("image/")
        .and_then(|h| h.strip_suffix(";base64"))
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .ok_or_else(|| {
            FailureCause::InvalidImage(format!("unsupported data URI header: data:{}", header))
        })?;

    Ok((format!("image/{}", subtype), body))
}
