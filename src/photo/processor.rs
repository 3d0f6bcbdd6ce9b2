/// Save steps run on the worker thread
///
/// Decodes the original at full resolution, renders the transform into a
/// new buffer, registers a fresh shared-storage entry and writes the result
/// as JPEG. The source file is read, never written.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Write;

use crate::color::ColorTransform;
use crate::error::{Error, Result};
use crate::state::data::{MediaEntry, MediaValues, PhotoAsset};
use crate::state::media_store::MediaRegistrar;

/// Settings for one save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// 1..=100; 100 is the ceiling
    pub jpeg_quality: u8,
    /// Collection the entry is registered under
    pub relative_path: String,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 100,
            relative_path: "Pictures".to_string(),
        }
    }
}

impl From<&crate::config::AppConfig> for SaveOptions {
    fn from(config: &crate::config::AppConfig) -> Self {
        Self {
            jpeg_quality: config.jpeg_quality,
            relative_path: config.relative_path.clone(),
        }
    }
}

/// Write a brightness-altered copy of `photo` to a new media entry
pub fn save_altered_photo(
    photo: &PhotoAsset,
    transform: &ColorTransform,
    registrar: &dyn MediaRegistrar,
    options: &SaveOptions,
) -> Result<MediaEntry> {
    // Step 1: Decode the original, no downsampling
    let original = image::open(photo.path()).map_err(Error::Decode)?.to_rgba8();
    log::debug!(
        "Decoded {} ({}x{})",
        photo.display_name(),
        original.width(),
        original.height()
    );

    // Step 2 + 3: New buffer of the same size with the filter applied
    let altered = transform.apply_to_image(&original);

    // Step 4: Register a shared-storage entry and stream the JPEG into it
    let values = MediaValues::jpeg(photo.display_name(), options.relative_path.as_str());
    let entry = registrar.insert(&values)?;

    let mut stream = registrar.open_output_stream(&entry)?;
    write_jpeg(&mut stream, altered, options.jpeg_quality)?;
    stream.flush().map_err(Error::StreamIo)?;
    // `stream` is closed when it goes out of scope, on every path

    log::info!("💾 Saved {} as {}", photo.display_name(), entry.path.display());
    Ok(entry)
}

/// Encode as JPEG. Alpha is dropped since JPEG cannot carry it.
fn write_jpeg(writer: &mut dyn Write, image: image::RgbaImage, quality: u8) -> Result<()> {
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));

    rgb.write_with_encoder(encoder).map_err(|e| match e {
        image::ImageError::IoError(io) => Error::StreamIo(io),
        other => Error::Encode(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::media_store::MediaStore;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::io;

    fn write_test_photo(dir: &std::path::Path) -> PhotoAsset {
        let path = dir.join("IMG_20240101_120000.jpg");
        let img = RgbImage::from_fn(32, 24, |x, y| Rgb([(x * 8) as u8, (y * 10) as u8, 128]));
        img.save(&path).unwrap();
        PhotoAsset::new(path)
    }

    /// Registrar whose stream rejects every write
    struct BrokenStream;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl MediaRegistrar for BrokenStream {
        fn insert(&self, values: &MediaValues) -> Result<MediaEntry> {
            Ok(MediaEntry {
                id: 1,
                display_name: values.display_name.clone(),
                mime_type: values.mime_type.clone(),
                relative_path: values.relative_path.clone(),
                path: "/dev/null".into(),
                date_added: 0,
                file_status: "exists".to_string(),
            })
        }

        fn open_output_stream(&self, _entry: &MediaEntry) -> Result<Box<dyn Write + Send>> {
            Ok(Box::new(FailingWriter))
        }
    }

    #[test]
    fn test_identity_save_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let photo = write_test_photo(temp.path());
        let store = MediaStore::open_in_memory(temp.path().join("shared")).unwrap();
        let source = image::open(photo.path()).unwrap().to_rgb8();

        let entry =
            save_altered_photo(&photo, &ColorTransform::IDENTITY, &store, &SaveOptions::default())
                .unwrap();

        let saved = image::open(&entry.path).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), source.dimensions());
        for (a, b) in saved.pixels().zip(source.pixels()) {
            for c in 0..3 {
                assert!((a[c] as i32 - b[c] as i32).abs() <= 12, "{:?} vs {:?}", a, b);
            }
        }
        assert_eq!(entry.display_name, photo.display_name());
        assert_eq!(entry.mime_type, "image/jpeg");
        assert!(entry.path.starts_with(temp.path().join("shared").join("Pictures")));
    }

    #[test]
    fn test_source_file_is_not_modified() {
        let temp = tempfile::tempdir().unwrap();
        let photo = write_test_photo(temp.path());
        let before = fs::read(photo.path()).unwrap();
        let store = MediaStore::open_in_memory(temp.path().join("shared")).unwrap();
        let darker = crate::state::edit::BrightnessLevel::new(30).unwrap().transform();

        save_altered_photo(&photo, &darker, &store, &SaveOptions::default()).unwrap();

        assert_eq!(fs::read(photo.path()).unwrap(), before);
    }

    #[test]
    fn test_darkened_output_is_darker() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("IMG_flat.jpg");
        RgbImage::from_pixel(16, 16, Rgb([200, 200, 200])).save(&path).unwrap();
        let photo = PhotoAsset::new(path);
        let store = MediaStore::open_in_memory(temp.path().join("shared")).unwrap();
        let half = crate::state::edit::BrightnessLevel::new(50).unwrap().transform();

        let entry = save_altered_photo(&photo, &half, &store, &SaveOptions::default()).unwrap();

        let saved = image::open(&entry.path).unwrap().to_rgb8();
        let pixel = saved.get_pixel(8, 8);
        assert!((pixel[0] as i32 - 100).abs() <= 4, "{:?}", pixel);
    }

    #[test]
    fn test_undecodable_source_fails_before_registering() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("IMG_bad.jpg");
        fs::write(&path, b"definitely not a jpeg").unwrap();
        let store = MediaStore::open_in_memory(temp.path().join("shared")).unwrap();

        let result = save_altered_photo(
            &PhotoAsset::new(path),
            &ColorTransform::IDENTITY,
            &store,
            &SaveOptions::default(),
        );

        assert!(matches!(result, Err(Error::Decode(_))));
        assert_eq!(store.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_write_failure_is_stream_error() {
        let temp = tempfile::tempdir().unwrap();
        let photo = write_test_photo(temp.path());

        let result =
            save_altered_photo(&photo, &ColorTransform::IDENTITY, &BrokenStream, &SaveOptions::default());

        assert!(matches!(result, Err(Error::StreamIo(_))));
    }
}
