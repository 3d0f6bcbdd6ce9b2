/// Editing session state
///
/// Everything the UI needs to remember between events: the captured photo,
/// the slider position, the transform derived from it and whether a save is
/// in flight.

use super::data::PhotoAsset;
use super::edit::BrightnessLevel;
use crate::color::ColorTransform;
use crate::error::Result;

/// A snapshot taken when a save starts. Later slider moves don't touch it.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub photo: PhotoAsset,
    pub transform: ColorTransform,
}

/// User-visible result of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    NotSaved,
}

impl SaveOutcome {
    pub fn message(self) -> &'static str {
        match self {
            SaveOutcome::Saved => "Photo saved",
            SaveOutcome::NotSaved => "Photo not saved",
        }
    }
}

impl From<bool> for SaveOutcome {
    fn from(result: bool) -> Self {
        if result {
            SaveOutcome::Saved
        } else {
            SaveOutcome::NotSaved
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    photo: Option<PhotoAsset>,
    brightness: BrightnessLevel,
    transform: ColorTransform,
    saving: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly captured photo and reset the slider to neutral
    pub fn photo_captured(&mut self, photo: PhotoAsset) {
        self.photo = Some(photo);
        self.brightness = BrightnessLevel::NEUTRAL;
        self.transform = ColorTransform::IDENTITY;
    }

    pub fn photo(&self) -> Option<&PhotoAsset> {
        self.photo.as_ref()
    }

    pub fn brightness(&self) -> BrightnessLevel {
        self.brightness
    }

    pub fn transform(&self) -> ColorTransform {
        self.transform
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Handle a slider move; returns the transform for the live preview
    pub fn set_brightness(&mut self, level: i32) -> Result<ColorTransform> {
        let level = BrightnessLevel::new(level)?;
        self.brightness = level;
        self.transform = level.transform();
        Ok(self.transform)
    }

    /// Save is allowed once a photo exists and no save is running
    pub fn can_save(&self) -> bool {
        self.photo.is_some() && !self.saving
    }

    /// Snapshot what to save and mark the save as running
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if !self.can_save() {
            return None;
        }

        let photo = self.photo.clone()?;
        self.saving = true;
        Some(SaveRequest {
            photo,
            transform: self.transform,
        })
    }

    /// Record the pipeline result and re-enable saving
    pub fn finish_save(&mut self, result: bool) -> SaveOutcome {
        self.saving = false;
        SaveOutcome::from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::Error;

    fn session_with_photo() -> EditSession {
        let mut session = EditSession::new();
        session.photo_captured(PhotoAsset::new("/tmp/IMG_20240101_000000.jpg"));
        session
    }

    #[test]
    fn test_cannot_save_without_photo() {
        let mut session = EditSession::new();
        assert!(!session.can_save());
        assert!(session.begin_save().is_none());
    }

    #[test]
    fn test_capture_resets_slider() {
        let mut session = session_with_photo();
        session.set_brightness(180).unwrap();

        session.photo_captured(PhotoAsset::new("/tmp/IMG_20240101_000001.jpg"));

        assert!(session.brightness().is_neutral());
        assert!(session.transform().is_identity());
    }

    #[test]
    fn test_invalid_level_keeps_previous_state() {
        let mut session = session_with_photo();
        session.set_brightness(60).unwrap();

        assert!(matches!(session.set_brightness(300), Err(Error::InvalidArgument(_))));
        assert_eq!(session.brightness().value(), 60);
    }

    #[test]
    fn test_save_snapshot_ignores_later_slider_moves() {
        let mut session = session_with_photo();
        session.set_brightness(150).unwrap();

        let request = session.begin_save().unwrap();
        session.set_brightness(20).unwrap();

        assert_eq!(request.transform.offset, Color::rgb(127, 127, 127));
        assert_eq!(session.transform().scale, Color::rgb(51, 51, 51));
    }

    #[test]
    fn test_save_in_flight_blocks_second_save() {
        let mut session = session_with_photo();

        assert!(session.begin_save().is_some());
        assert!(session.is_saving());
        assert!(session.begin_save().is_none());

        assert_eq!(session.finish_save(true), SaveOutcome::Saved);
        assert!(session.can_save());
    }

    #[test]
    fn test_outcome_messages() {
        let mut session = session_with_photo();
        session.begin_save();
        assert_eq!(session.finish_save(false).message(), "Photo not saved");
        assert_eq!(SaveOutcome::from(true).message(), "Photo saved");
    }
}
