//! Data URL handling for in-memory image state
//!
//! Both session image slots hold their bytes as data URLs, the same
//! representation the service speaks: base64 text prefixed with a MIME type.

use crate::error::{ClientError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::Path;

/// An image held in memory as MIME type plus raw bytes, rendered to and from
/// `data:<mime>;base64,<payload>` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime: String,
    bytes: Vec<u8>,
}

impl DataUrl {
    /// Wrap raw bytes with an explicit MIME type
    pub fn new<S: Into<String>>(mime: S, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Wrap raw PNG bytes
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new("image/png", bytes)
    }

    /// Wrap raw bytes, sniffing the MIME type from a filename extension
    ///
    /// Unrecognized extensions fall back to `application/octet-stream`; the
    /// service decodes the actual container server-side.
    pub fn from_file_bytes<P: AsRef<Path>>(path: P, bytes: Vec<u8>) -> Self {
        let mime = match path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        };
        Self::new(mime, bytes)
    }

    /// Parse a `data:<mime>;base64,<payload>` string
    ///
    /// # Errors
    /// - Missing `data:` scheme or `;base64,` marker
    /// - Invalid base64 payload
    pub fn parse(input: &str) -> Result<Self> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| ClientError::processing("Data URL missing 'data:' scheme"))?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| ClientError::processing("Data URL missing ';base64,' marker"))?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| ClientError::processing(format!("Invalid base64 payload: {}", e)))?;
        Ok(Self::new(mime, bytes))
    }

    /// Decode a bare base64 payload as returned by the service, assuming PNG
    ///
    /// # Errors
    /// - Invalid base64 input
    pub fn from_base64_png(payload: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| ClientError::processing(format!("Invalid base64 image in response: {}", e)))?;
        Ok(Self::png(bytes))
    }

    /// MIME type of the contained bytes
    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw decoded bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the value, returning the raw bytes
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Byte length of the decoded payload
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bare base64 payload without the data-URL prefix
    ///
    /// This is the shape `POST /apply-effects` expects in its `image` field.
    #[must_use]
    pub fn base64_payload(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Render the full `data:<mime>;base64,<payload>` string
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let original = DataUrl::new("image/png", vec![1, 2, 3, 4]);
        let rendered = original.to_data_url();
        assert!(rendered.starts_with("data:image/png;base64,"));

        let parsed = DataUrl::parse(&rendered).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(DataUrl::parse("image/png;base64,AAAA").is_err());
        assert!(DataUrl::parse("data:image/png,AAAA").is_err());
        assert!(DataUrl::parse("data:image/png;base64,not*base64*").is_err());
    }

    #[test]
    fn test_mime_sniffing() {
        assert_eq!(
            DataUrl::from_file_bytes("photo.JPG", vec![0]).mime(),
            "image/jpeg"
        );
        assert_eq!(
            DataUrl::from_file_bytes("photo.webp", vec![0]).mime(),
            "image/webp"
        );
        assert_eq!(
            DataUrl::from_file_bytes("photo.xyz", vec![0]).mime(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_bare_payload_decoding() {
        let url = DataUrl::from_base64_png("AQIDBA==").unwrap();
        assert_eq!(url.bytes(), &[1, 2, 3, 4]);
        assert_eq!(url.mime(), "image/png");

        assert!(DataUrl::from_base64_png("@@@").is_err());
    }
}
