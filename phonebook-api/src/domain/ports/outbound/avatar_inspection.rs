use crate::domain::models::ImageKind;

pub trait AvatarInspector: Send + Sync + 'static {
    /// Detect the image format from the leading bytes, if it is an accepted one.
    fn detect(&self, bytes: &[u8]) -> Option<ImageKind>;
}
