/// Shared data structures for the application state
///
/// These structs flow between the capture step, the save pipeline and the
/// shared-storage media index.

use std::path::{Path, PathBuf};

/// MIME type of every entry this app registers
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// A JPEG photo on durable storage, created once per capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAsset {
    path: PathBuf,
}

impl PhotoAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name only (e.g., "IMG_20240101_120000.jpg")
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Metadata handed to the registrar when asking for a new entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaValues {
    pub display_name: String,
    pub mime_type: String,
    /// Collection path below the storage root (e.g., "Pictures")
    pub relative_path: String,
}

impl MediaValues {
    pub fn jpeg(display_name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mime_type: JPEG_MIME_TYPE.to_string(),
            relative_path: relative_path.into(),
        }
    }
}

/// A row in the shared media index
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEntry {
    /// Unique index row ID
    pub id: i64,
    /// Requested display name; the file on disk may carry a " (n)" suffix
    pub display_name: String,
    pub mime_type: String,
    pub relative_path: String,
    /// Where the bytes live
    pub path: PathBuf,
    /// Unix timestamp (seconds) of the registration
    pub date_added: i64,
    /// File status: 'exists' or 'deleted'
    pub file_status: String,
}

impl MediaEntry {
    /// Content URI for this entry
    pub fn uri(&self) -> String {
        format!("content://media/external/images/media/{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_file_name() {
        let asset = PhotoAsset::new("/tmp/pictures/IMG_20240102_030405.jpg");
        assert_eq!(asset.display_name(), "IMG_20240102_030405.jpg");
    }

    #[test]
    fn test_jpeg_values() {
        let values = MediaValues::jpeg("IMG_1.jpg", "Pictures");
        assert_eq!(values.mime_type, "image/jpeg");
        assert_eq!(values.relative_path, "Pictures");
    }
}
