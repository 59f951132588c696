use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::domain::{models::AvatarFileName, ports::outbound::AvatarStorage, ContactError};

/// Avatar images stored as plain files directly under `root`.
pub struct FilesystemAvatarStore {
    root: PathBuf,
}

impl FilesystemAvatarStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), ContactError> {
        fs::create_dir_all(&self.root).await.map_err(|err| {
            ContactError::filesystem(format!("create_dir_all({:?}): {}", self.root, err))
        })
    }

    /// Resolve a stored name to its path, refusing anything but a single
    /// normal path component.
    fn path_for(&self, file_name: &str) -> Result<PathBuf, ContactError> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(file_name)),
            _ => Err(ContactError::filesystem(format!(
                "invalid avatar file name: {file_name:?}"
            ))),
        }
    }
}

#[async_trait]
impl AvatarStorage for FilesystemAvatarStore {
    async fn persist(&self, file_name: &AvatarFileName, bytes: &[u8]) -> Result<(), ContactError> {
        let target = self.path_for(file_name.as_str())?;
        self.ensure_root().await?;

        // Temp file + rename, so readers never see a half-written image.
        let temp = self.root.join(format!(".{file_name}.tmp"));
        tracing::debug!(path = %target.display(), size = bytes.len(), "writing avatar");

        let written = async {
            let mut file = fs::File::create(&temp).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp, &target).await
        }
        .await;

        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!("failed to clean up {}: {}", temp.display(), cleanup);
                }
            }
            return Err(ContactError::filesystem(format!(
                "write({:?}): {}",
                target, err
            )));
        }

        Ok(())
    }

    async fn remove(&self, file_name: &str) -> Result<(), ContactError> {
        let path = self.path_for(file_name)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed avatar");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "avatar already gone");
                Ok(())
            }
            Err(err) => Err(ContactError::filesystem(format!(
                "remove_file({:?}): {}",
                path, err
            ))),
        }
    }
}
