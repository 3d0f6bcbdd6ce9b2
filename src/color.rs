/// Lighting color filter
///
/// This module holds the two color values that describe a brightness edit
/// and the per-pixel math that applies them:
/// - `scale` multiplies each RGB channel (255 = x1.0)
/// - `offset` is added afterwards (0 = no change)
///
/// Alpha is never touched. The result of every channel is clamped to 0..=255.

use image::{Rgba, RgbaImage};

/// An ARGB color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Opaque white (identity scale)
    pub const WHITE: Color = Color::argb(255, 255, 255, 255);
    /// Opaque black
    pub const BLACK: Color = Color::argb(255, 0, 0, 0);
    /// All channels zero (identity offset)
    pub const TRANSPARENT: Color = Color::argb(0, 0, 0, 0);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(255, r, g, b)
    }

    /// Unpack from the `0xAARRGGBB` form
    pub const fn from_packed(value: u32) -> Self {
        Self {
            a: (value >> 24) as u8,
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    /// Pack into the `0xAARRGGBB` form
    pub const fn to_packed(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Multiply-then-add lighting transform applied to RGB channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorTransform {
    pub scale: Color,
    pub offset: Color,
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorTransform {
    /// Leaves every pixel unchanged
    pub const IDENTITY: ColorTransform = ColorTransform {
        scale: Color::WHITE,
        offset: Color::TRANSPARENT,
    };

    pub const fn new(scale: Color, offset: Color) -> Self {
        Self { scale, offset }
    }

    /// Check if this transform maps every pixel onto itself
    ///
    /// Only the RGB channels matter; alpha of either color is ignored.
    pub fn is_identity(&self) -> bool {
        let s = self.scale;
        let o = self.offset;
        s.r == 255 && s.g == 255 && s.b == 255 && o.r == 0 && o.g == 0 && o.b == 0
    }

    /// Transform a single pixel. Alpha passes through.
    pub fn apply_to_pixel(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        Rgba([
            apply_to_channel(r, self.scale.r, self.offset.r),
            apply_to_channel(g, self.scale.g, self.offset.g),
            apply_to_channel(b, self.scale.b, self.offset.b),
            a,
        ])
    }

    /// Render the transform into a new buffer of identical dimensions
    ///
    /// The source buffer is left as is. Cost is linear in the pixel count.
    pub fn apply_to_image(&self, source: &RgbaImage) -> RgbaImage {
        if self.is_identity() {
            return source.clone();
        }

        let mut output = RgbaImage::new(source.width(), source.height());
        for (dst, src) in output.pixels_mut().zip(source.pixels()) {
            *dst = self.apply_to_pixel(*src);
        }
        output
    }
}

/// `clamp(round(channel * scale / 255) + offset, 0, 255)`
///
/// Scale 255 with offset 0 returns `channel` exactly.
pub fn apply_to_channel(channel: u8, scale: u8, offset: u8) -> u8 {
    let scaled = (channel as u32 * scale as u32 + 127) / 255;
    (scaled + offset as u32).min(255) as u8
}
