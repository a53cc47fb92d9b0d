//! Prescription photos as sent to the model.

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image is empty")]
    Empty,

    #[error("Unsupported image format (expected PNG or JPEG)")]
    UnsupportedFormat,
}

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Encoded image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    bytes: Vec<u8>,
    mime: &'static str,
}

impl ImageInput {
    /// Wrap raw bytes, detecting PNG or JPEG from the file signature.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        let mime = if bytes.starts_with(PNG_MAGIC) {
            "image/png"
        } else if bytes.starts_with(JPEG_MAGIC) {
            "image/jpeg"
        } else {
            return Err(ImageError::UnsupportedFormat);
        };
        Ok(Self { bytes, mime })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(b"rest of file");
        bytes
    }

    #[test]
    fn test_detects_format() {
        assert_eq!(ImageInput::from_bytes(png_bytes()).unwrap().mime(), "image/png");
        let jpeg = ImageInput::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap();
        assert_eq!(jpeg.mime(), "image/jpeg");
        assert_eq!(jpeg.bytes().len(), 5);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(ImageInput::from_bytes(Vec::new()), Err(ImageError::Empty)));
        assert!(matches!(
            ImageInput::from_bytes(b"GIF89a".to_vec()),
            Err(ImageError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&png_bytes()).unwrap();
        let image = ImageInput::from_path(file.path()).unwrap();
        assert_eq!(image.mime(), "image/png");

        let missing = ImageInput::from_path("/nonexistent/prescription.png");
        assert!(matches!(missing, Err(ImageError::Read { .. })));
    }
}
