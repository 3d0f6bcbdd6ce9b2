/// Capture naming and import
///
/// Photos land in the app's private pictures directory under a name derived
/// from the capture time: `IMG_<yyyyMMdd_HHmmss>.jpg`. On desktop there is no
/// camera intent, so "taking" a photo copies an existing JPEG into that slot.

use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::data::PhotoAsset;

/// Build the capture file name for a timestamp
pub fn image_file_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("IMG_{}.jpg", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Get the default private pictures directory
/// Returns ~/.local/share/brightness-editor/Pictures on Linux
pub fn default_private_dir() -> PathBuf {
    let mut path = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);

    path.push("brightness-editor");
    path.push("Pictures");
    path
}

/// Reserve an asset path for a capture taken at `now`
///
/// The directory is created if needed; the file itself is left for the
/// capture step to write.
pub fn create_image_file(dir: &Path, now: &DateTime<Local>) -> Result<PhotoAsset> {
    fs::create_dir_all(dir)?;
    Ok(PhotoAsset::new(dir.join(image_file_name(now))))
}

/// Copy an existing photo into a freshly named asset
pub fn import_photo(source: &Path, dir: &Path) -> Result<PhotoAsset> {
    let asset = create_image_file(dir, &Local::now())?;
    fs::copy(source, asset.path())?;

    log::info!("📸 Captured {} -> {}", source.display(), asset.path().display());
    Ok(asset)
}
