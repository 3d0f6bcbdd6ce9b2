//! Brightness editor - library crate.
//!
//! Provides the brightness model, the background save pipeline and the
//! shared-storage media index used by the desktop application.

pub mod color;
pub mod config;
pub mod error;
pub mod photo;
pub mod state;

pub use color::{Color, ColorTransform};
pub use error::{Error, Result};
pub use photo::processor::SaveOptions;
pub use photo::saver::{ImageSaver, UiDispatcher, UiHandle};
pub use state::data::{MediaEntry, MediaValues, PhotoAsset};
pub use state::edit::{brightness_transform, BrightnessLevel};
pub use state::media_store::{MediaRegistrar, MediaStore};
pub use state::session::{EditSession, SaveOutcome, SaveRequest};
