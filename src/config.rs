/// Application configuration
///
/// Stored as JSON at `<config_dir>/brightness-editor/config.json`. Missing
/// keys fall back to their defaults, a missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const APP_DIR: &str = "brightness-editor";
const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// JPEG quality used when saving (1..=100, 100 = best)
    pub jpeg_quality: u8,

    /// Collection under the shared storage root (e.g., "Pictures")
    pub relative_path: String,

    /// Box the live preview is decimated to fit
    pub preview_width: u32,
    pub preview_height: u32,

    /// Shared storage root; defaults to the home directory
    pub media_root: Option<PathBuf>,

    /// Media index database; defaults to the user data directory
    pub media_index_path: Option<PathBuf>,

    /// Where captured photos are kept before saving
    pub private_pictures_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 100,
            relative_path: "Pictures".to_string(),
            preview_width: 960,
            preview_height: 640,
            media_root: None,
            media_index_path: None,
            private_pictures_dir: None,
        }
    }
}

impl AppConfig {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);

        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        path
    }

    /// Load from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON; quality is clamped into 1..=100
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.jpeg_quality = config.jpeg_quality.clamp(1, 100);
        Ok(config)
    }
}
