/// Live preview generation
///
/// Decodes a decimated copy of the photo that fits the preview box, then
/// re-renders it in memory on every slider move. The full-resolution file
/// is only touched by the save pipeline.

use image::{imageops::FilterType, RgbaImage};
use std::path::Path;

use crate::color::ColorTransform;
use crate::error::{Error, Result};

/// Integer decimation factor for showing a photo in a view
///
/// `min(photo_w / view_w, photo_h / view_h)`, never below 1. A view that
/// has not been laid out yet (zero width or height) gets factor 1.
pub fn sample_size(photo_width: u32, photo_height: u32, view_width: u32, view_height: u32) -> u32 {
    if view_width == 0 || view_height == 0 {
        return 1;
    }

    let factor = (photo_width / view_width).min(photo_height / view_height);
    factor.max(1)
}

/// Load a decimated preview of the photo at `path`
pub fn load_preview(path: &Path, view_width: u32, view_height: u32) -> Result<RgbaImage> {
    // Read bounds only before decoding the pixels
    let (width, height) = image::image_dimensions(path).map_err(Error::Decode)?;
    let factor = sample_size(width, height, view_width, view_height);

    let img = image::open(path).map_err(Error::Decode)?;

    let preview = if factor > 1 {
        img.resize_exact(width / factor, height / factor, FilterType::Triangle)
    } else {
        img
    };

    log::debug!(
        "Preview {}x{} -> {}x{} (sample size {})",
        width,
        height,
        preview.width(),
        preview.height(),
        factor
    );

    Ok(preview.to_rgba8())
}

/// Apply the current transform to a preview. No I/O.
pub fn render_preview(thumbnail: &RgbaImage, transform: &ColorTransform) -> RgbaImage {
    transform.apply_to_image(thumbnail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use image::Rgba;

    #[test]
    fn test_sample_size() {
        assert_eq!(sample_size(4000, 3000, 1000, 1000), 3);
        assert_eq!(sample_size(4000, 3000, 2000, 1000), 2);
        // Photo smaller than the view
        assert_eq!(sample_size(400, 300, 1000, 1000), 1);
    }

    #[test]
    fn test_sample_size_guards_unmeasured_view() {
        assert_eq!(sample_size(4000, 3000, 0, 0), 1);
        assert_eq!(sample_size(4000, 3000, 0, 500), 1);
        assert_eq!(sample_size(4000, 3000, 500, 0), 1);
    }

    #[test]
    fn test_load_preview_decimates() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("photo.png");
        RgbaImage::from_pixel(64, 48, Rgba([10, 20, 30, 255])).save(&path).unwrap();

        let preview = load_preview(&path, 16, 16).unwrap();

        assert_eq!(preview.dimensions(), (21, 16));
    }

    #[test]
    fn test_load_preview_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let result = load_preview(&temp.path().join("gone.jpg"), 100, 100);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_render_preview_leaves_source_alone() {
        let thumbnail = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 255]));
        let transform = ColorTransform::new(Color::WHITE, Color::rgb(50, 50, 50));

        let rendered = render_preview(&thumbnail, &transform);

        assert_eq!(rendered.get_pixel(0, 0), &Rgba([150, 150, 150, 255]));
        assert_eq!(thumbnail.get_pixel(0, 0), &Rgba([100, 100, 100, 255]));
    }
}
