//! Image payload decoding
//!
//! Clients submit images as strings. Two shapes are accepted:
//! - `data:image/png;base64,iVBORw0...` (what `canvas.toDataURL()` produces)
//! - bare standard-alphabet base64
//!
//! Line breaks and other ASCII whitespace inside the base64 body are ignored.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{PrintError, PrintResult};

/// Decoded image payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// MIME type declared by a data URL, if any
    pub mime: Option<String>,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    /// Sniff the image format from the magic bytes
    #[cfg(feature = "image")]
    pub fn format(&self) -> Option<image::ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }

    /// Reject payloads that are not a recognizable image
    #[cfg(feature = "image")]
    pub fn ensure_image(&self) -> PrintResult<()> {
        match self.format() {
            Some(_) => Ok(()),
            None => Err(PrintError::InvalidImage(
                "payload is not a recognized image format".to_string(),
            )),
        }
    }

    #[cfg(not(feature = "image"))]
    pub fn ensure_image(&self) -> PrintResult<()> {
        Ok(())
    }
}

/// Decode a client-submitted image string into bytes
pub fn decode_image_data(data: &str) -> PrintResult<ImagePayload> {
    let data = data.trim();
    if data.is_empty() {
        return Err(PrintError::InvalidImage("empty payload".to_string()));
    }

    let (mime, body) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest
                .split_once(',')
                .ok_or_else(|| PrintError::InvalidImage("malformed data URL".to_string()))?;
            let Some(mime) = header.strip_suffix(";base64") else {
                return Err(PrintError::InvalidImage(
                    "only base64 data URLs are supported".to_string(),
                ));
            };
            let mime = mime.split(';').next().unwrap_or_default();
            let mime = (!mime.is_empty()).then(|| mime.to_string());
            (mime, body)
        }
        None => (None, data),
    };

    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| PrintError::InvalidImage(format!("base64 decode failed: {}", e)))?;

    if bytes.is_empty() {
        return Err(PrintError::InvalidImage("empty image".to_string()));
    }

    Ok(ImagePayload { mime, bytes })
}
