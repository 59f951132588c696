use image::ImageFormat;

use crate::domain::{models::ImageKind, ports::outbound::AvatarInspector};

/// Sniffs magic bytes with the `image` crate; nothing is decoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFormatInspector;

impl AvatarInspector for ImageFormatInspector {
    fn detect(&self, bytes: &[u8]) -> Option<ImageKind> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Gif => Some(ImageKind::Gif),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_accepted_formats() {
        let inspector = ImageFormatInspector;

        assert_eq!(
            inspector.detect(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"),
            Some(ImageKind::Png)
        );
        assert_eq!(inspector.detect(b"GIF89a\x01\x00"), Some(ImageKind::Gif));
        assert_eq!(inspector.detect(b"GIF87a\x01\x00"), Some(ImageKind::Gif));
        assert_eq!(
            inspector.detect(b"\xFF\xD8\xFF\xE0\0\x10JFIF"),
            Some(ImageKind::Jpeg)
        );
    }

    #[test]
    fn rejects_other_content() {
        let inspector = ImageFormatInspector;

        assert_eq!(inspector.detect(b"BM\0\0\0\0"), None);
        assert_eq!(inspector.detect(b"plain text"), None);
        assert_eq!(inspector.detect(b""), None);
    }
}
