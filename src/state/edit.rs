/// Brightness model
///
/// Maps the slider position (0..=200, 100 = unchanged) onto a lighting
/// `ColorTransform`. Below 100 the RGB channels are scaled down; above 100 a
/// constant is added to them. The mapping is pure and recomputed on every
/// slider change.

use crate::color::{Color, ColorTransform};
use crate::error::{Error, Result};

/// A validated slider position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BrightnessLevel(u8);

impl BrightnessLevel {
    pub const MIN: BrightnessLevel = BrightnessLevel(0);
    /// No change to the image
    pub const NEUTRAL: BrightnessLevel = BrightnessLevel(100);
    pub const MAX: BrightnessLevel = BrightnessLevel(200);

    /// Validate a raw slider value
    ///
    /// Returns `Error::InvalidArgument` outside 0..=200.
    pub fn new(level: i32) -> Result<Self> {
        if !(Self::MIN.value()..=Self::MAX.value()).contains(&level) {
            return Err(Error::InvalidArgument(format!(
                "brightness level {} is outside {}..={}",
                level,
                Self::MIN.value(),
                Self::MAX.value()
            )));
        }
        Ok(Self(level as u8))
    }

    pub fn value(self) -> i32 {
        self.0 as i32
    }

    pub fn is_neutral(self) -> bool {
        self == Self::NEUTRAL
    }

    pub fn transform(self) -> ColorTransform {
        brightness_transform(self)
    }
}

impl Default for BrightnessLevel {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Compute the lighting transform for a brightness level
///
/// - level > 100: offset = 255 * (level/100 - 1) on each channel, scale = opaque white
/// - level <= 100: scale = 255 * level/100 on each channel, offset = zero
///
/// Fractions are truncated toward zero, in single precision.
pub fn brightness_transform(level: BrightnessLevel) -> ColorTransform {
    let level = level.value() as f32;

    if level > 100.0 {
        let add = level / 100.0 - 1.0;
        let channel = (255.0 * add) as u8;
        ColorTransform::new(Color::WHITE, Color::rgb(channel, channel, channel))
    } else {
        let mult = level / 100.0;
        let channel = (255.0 * mult) as u8;
        ColorTransform::new(Color::rgb(channel, channel, channel), Color::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(value: i32) -> BrightnessLevel {
        BrightnessLevel::new(value).unwrap()
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(matches!(BrightnessLevel::new(-1), Err(Error::InvalidArgument(_))));
        assert!(matches!(BrightnessLevel::new(201), Err(Error::InvalidArgument(_))));
        assert!(BrightnessLevel::new(0).is_ok());
        assert!(BrightnessLevel::new(200).is_ok());
    }

    #[test]
    fn test_neutral_is_identity() {
        assert!(BrightnessLevel::default().is_neutral());
        assert!(!level(99).is_neutral());

        let transform = brightness_transform(BrightnessLevel::NEUTRAL);
        assert!(transform.is_identity());
        assert_eq!(transform.scale, Color::WHITE);
        assert_eq!(transform.offset, Color::TRANSPARENT);
    }

    #[test]
    fn test_darken_branch() {
        for value in 0..=100 {
            let transform = brightness_transform(level(value));
            let expected = (255.0 * (value as f32 / 100.0)) as u8;
            assert_eq!(transform.offset, Color::TRANSPARENT);
            assert_eq!(transform.scale, Color::rgb(expected, expected, expected));
        }
    }

    #[test]
    fn test_lighten_branch() {
        for value in 101..=200 {
            let transform = brightness_transform(level(value));
            let expected = (255.0 * (value as f32 / 100.0 - 1.0)) as u8;
            assert_eq!(transform.scale, Color::WHITE);
            assert_eq!(transform.offset, Color::rgb(expected, expected, expected));
        }
    }

    #[test]
    fn test_half_brightness_values() {
        let darker = brightness_transform(level(50));
        assert_eq!(darker.scale, Color::rgb(127, 127, 127));
        assert_eq!(darker.offset, Color::TRANSPARENT);

        let lighter = brightness_transform(level(150));
        assert_eq!(lighter.scale, Color::WHITE);
        assert_eq!(lighter.offset, Color::rgb(127, 127, 127));
    }

    #[test]
    fn test_extremes() {
        assert_eq!(brightness_transform(BrightnessLevel::MIN).scale, Color::rgb(0, 0, 0));
        assert_eq!(brightness_transform(BrightnessLevel::MAX).offset, Color::rgb(255, 255, 255));
    }

    #[test]
    fn test_model_is_repeatable() {
        for value in [0, 1, 37, 99, 100, 101, 163, 200] {
            assert_eq!(brightness_transform(level(value)), brightness_transform(level(value)));
        }
    }
}
