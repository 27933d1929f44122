//! Image modality.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use tracing::debug;

use super::ModelClassifier;
use super::prompt;
use crate::types::{Label, Modality};
use crate::{Result, TriageError};

/// Classifies a single image blob.
///
/// The blob is not decoded or validated; a malformed image only surfaces
/// as an error if the provider rejects it.
#[derive(Clone)]
pub struct ImageClassifier {
    model: ModelClassifier,
}

impl ImageClassifier {
    pub fn new(model: ModelClassifier) -> Self {
        Self { model }
    }

    /// Classify `image`, issuing one completion call.
    pub async fn classify(&self, image: &[u8]) -> Result<Label> {
        if image.is_empty() {
            return Err(TriageError::InvalidInput(
                "image to classify must not be empty".to_string(),
            ));
        }

        let uri = data_uri(image);
        let reply = self
            .model
            .invoke(Modality::Image, &prompt::image_messages(&uri))
            .await?;
        let label = Label::from_reply(&reply);
        debug!(%label, bytes = image.len(), "image classified");
        Ok(label)
    }
}

/// Encode `bytes` as a base64 `data:` URI.
pub fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        sniff_mime(bytes),
        BASE64_STANDARD.encode(bytes)
    )
}

/// Best-effort MIME type from magic bytes.
///
/// Anything unrecognised is declared as JPEG; vision endpoints sniff the
/// payload themselves and mostly use the declared type as a hint.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_is_detected() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(sniff_mime(png), "image/png");
    }

    #[test]
    fn gif_and_webp_are_detected() {
        assert_eq!(sniff_mime(b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(sniff_mime(b"RIFF\x24\0\0\0WEBPVP8 "), "image/webp");
    }

    #[test]
    fn unknown_bytes_default_to_jpeg() {
        assert_eq!(sniff_mime(b"\xff\xd8\xff\xe0"), "image/jpeg");
        assert_eq!(sniff_mime(b"not an image"), "image/jpeg");
    }

    #[test]
    fn data_uri_is_base64() {
        assert_eq!(data_uri(b"hello"), "data:image/jpeg;base64,aGVsbG8=");
    }
}
