use std::{fmt, path::Path};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::ContactError;

const MAX_STEM_LEN: usize = 64;
const FALLBACK_STEM: &str = "avatar";

/// Image formats accepted as avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn canonical_extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    fn accepts_extension(&self, extension: &str) -> bool {
        match self {
            Self::Jpeg => matches!(extension, "jpg" | "jpeg" | "jpe" | "jfif"),
            Self::Png => extension == "png",
            Self::Gif => extension == "gif",
        }
    }
}

/// An uploaded avatar file, as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }
}

/// Name of a stored avatar file.
///
/// Always a single path component: `<stem>-<millis>-<token>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvatarFileName(String);

impl AvatarFileName {
    /// Derive a fresh, collision-resistant name from the uploaded file name.
    pub fn generate(original: &str, kind: ImageKind) -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let token = Uuid::new_v4().simple().to_string();
        Self::from_parts(original, kind, millis, &token[..12])
    }

    fn from_parts(original: &str, kind: ImageKind, millis: i128, token: &str) -> Self {
        let path = Path::new(original);

        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(sanitize_stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| FALLBACK_STEM.to_string());

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| kind.accepts_extension(ext))
            .unwrap_or_else(|| kind.canonical_extension().to_string());

        Self(format!("{stem}-{millis}-{token}.{extension}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AvatarFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_STEM_LEN)
        .collect()
}

/// Upload limits and the placeholder name that must never be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarPolicy {
    pub max_upload_bytes: usize,
    pub default_avatar: Option<String>,
}

impl Default for AvatarPolicy {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            default_avatar: None,
        }
    }
}

impl AvatarPolicy {
    /// Checks size and declared type, returning the kind the bytes must match.
    pub fn check_upload(&self, upload: &AvatarUpload) -> Result<ImageKind, ContactError> {
        if upload.bytes.len() > self.max_upload_bytes {
            return Err(ContactError::PayloadTooLarge);
        }

        let declared = upload.content_type.as_deref().unwrap_or_default();
        ImageKind::from_mime(declared)
            .ok_or_else(|| ContactError::UnsupportedMediaType(declared.to_string()))
    }

    /// The avatar file a contact owns on disk, if any.
    pub fn owned_file<'a>(&self, avatar: Option<&'a str>) -> Option<&'a str> {
        avatar
            .filter(|name| !name.trim().is_empty())
            .filter(|name| self.default_avatar.as_deref() != Some(*name))
    }
}
