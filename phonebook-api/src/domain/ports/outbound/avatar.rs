use async_trait::async_trait;

use crate::domain::{models::AvatarFileName, ContactError};

/// Outbound port for the on-disk avatar image store.
#[async_trait]
pub trait AvatarStorage: Send + Sync + 'static {
    /// Write `bytes` under `file_name`. A partially written file is never
    /// visible under the final name.
    async fn persist(&self, file_name: &AvatarFileName, bytes: &[u8]) -> Result<(), ContactError>;

    /// Remove a stored avatar. A file that is already gone is not an error.
    async fn remove(&self, file_name: &str) -> Result<(), ContactError>;
}
