//! # Image Normalizer Module
//!
//! Questo modulo normalizza una singola immagine: conversione in JPEG e
//! ridimensionamento con aspect ratio preservato, con contabilità dei byte.
//!
//! ## Pipeline di Normalizzazione
//!
//! 1. **Dimensione iniziale**: letta dal filesystem
//! 2. **Decodifica**: `image` crate, formato rilevato dal contenuto
//! 3. **Conversione** (solo PNG/BMP): pixel in RGB (alpha perso), scrittura di
//!    `<stem>.jpg`, dimensione dopo conversione, cancellazione dell'originale
//! 4. **Resize** (solo se il lato lungo supera `max_length`): sovrascrive il
//!    file di lavoro, dimensione dopo resize
//!
//! ## Invarianti
//!
//! - L'originale PNG/BMP viene cancellato **solo dopo** che il JPEG è stato
//!   scritto e rinominato con successo
//! - Ogni scrittura passa per un file temporaneo nella stessa directory,
//!   rinominato sulla destinazione solo a encoding completato
//! - Le dimensioni non sono mai in cache: ogni misura rilegge il filesystem
//! - Il risparmio può essere negativo (JPEG più grande del PNG originale)
//!
//! ## Esempio
//! ```rust,ignore
//! let normalizer = ImageNormalizer::new(1920)?;
//! let result = normalizer.normalize(Path::new("/photos/scan.png"))?;
//! if result.resized {
//!     println!("saved {} bytes", result.resize_savings);
//! }
//! ```

use crate::config::JPEG_QUALITY;
use crate::error::NormalizeError;
use crate::file_manager::{FileManager, SourceFormat};
use crate::optimizer::path_resolver::PathResolver;
use crate::resize::{Dimensions, ResizeTarget};
use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Outcome of normalizing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationResult {
    /// Path of the file after normalization (the `.jpg` for converted images)
    pub path: PathBuf,
    /// Whether the image was downscaled
    pub resized: bool,
    /// Bytes saved by re-encoding PNG/BMP as JPEG (0 for JPEG input)
    pub conversion_savings: i64,
    /// Bytes saved against the original size after resizing (0 if not resized)
    pub resize_savings: i64,
    /// Dimensions before resizing
    pub original_dimensions: Dimensions,
    /// Dimensions of the file left on disk
    pub final_dimensions: Dimensions,
}

/// Converts and downsizes single images
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    max_length: u32,
    jpeg_quality: u8,
}

impl ImageNormalizer {
    /// Creates a normalizer for the given longer-edge limit.
    ///
    /// # Errors
    /// `Validation` if `max_length` is 0.
    pub fn new(max_length: u32) -> Result<Self, NormalizeError> {
        if max_length == 0 {
            return Err(NormalizeError::Validation(
                "Maximum image length must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            max_length,
            jpeg_quality: JPEG_QUALITY,
        })
    }

    /// Normalizes a single image file.
    ///
    /// PNG and BMP files are replaced by a JPEG with the same stem; JPEG files are
    /// only rewritten when they need to be downscaled. The decoded image is dropped
    /// before this returns, on success and on failure.
    ///
    /// # Errors
    /// - `UnsupportedFormat` if the extension is not recognized
    /// - `Io` if the file cannot be read, written or deleted
    /// - `Decode` if the content is not a valid image
    /// - `Encode` if the JPEG encoder rejects the pixels
    pub fn normalize(&self, path: &Path) -> Result<NormalizationResult, NormalizeError> {
        let format = SourceFormat::from_path(path)
            .ok_or_else(|| NormalizeError::UnsupportedFormat(path.display().to_string()))?;

        info!("Image: {}", path.display());

        let size_before = FileManager::file_size(path)?;
        let decoded = Self::decode(path)?;

        let (working_path, image, size_after_convert) = if format.needs_conversion() {
            let (converted_path, rgb) = self.convert(path, format, decoded)?;
            let size_after_convert = FileManager::file_size(&converted_path)?;
            info!(
                "Converted {} to JPEG ({:.2}% | {:.2} MB => {:.2} MB)",
                format,
                FileManager::calculate_reduction(size_before, size_after_convert),
                crate::accountant::bytes_to_megabytes(size_before as i64),
                crate::accountant::bytes_to_megabytes(size_after_convert as i64),
            );
            (converted_path, rgb, size_after_convert)
        } else {
            (path.to_path_buf(), decoded, size_before)
        };

        let conversion_savings = size_before as i64 - size_after_convert as i64;
        let original_dimensions = Dimensions::of(&image);

        let Some(target) = ResizeTarget::compute(original_dimensions, self.max_length) else {
            info!("Size OK ({}), skipping resize", original_dimensions);
            return Ok(NormalizationResult {
                path: working_path,
                resized: false,
                conversion_savings,
                resize_savings: 0,
                original_dimensions,
                final_dimensions: original_dimensions,
            });
        };

        let resized = target.apply(&image);
        drop(image);
        self.write_jpeg(&resized, &working_path, &working_path)?;

        let size_after_resize = FileManager::file_size(&working_path)?;
        info!(
            "Resized from {} to {} ({:.2}% | {:.2} MB => {:.2} MB)",
            original_dimensions,
            target.dimensions(),
            FileManager::calculate_reduction(size_before, size_after_resize),
            crate::accountant::bytes_to_megabytes(size_before as i64),
            crate::accountant::bytes_to_megabytes(size_after_resize as i64),
        );

        Ok(NormalizationResult {
            path: working_path,
            resized: true,
            conversion_savings,
            resize_savings: size_before as i64 - size_after_resize as i64,
            original_dimensions,
            final_dimensions: target.dimensions(),
        })
    }

    /// Decodes an image, sniffing the format from its content
    fn decode(path: &Path) -> Result<DynamicImage, NormalizeError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        reader.decode().map_err(NormalizeError::decode)
    }

    /// Writes `decoded` as `<stem>.jpg` and removes the original afterwards
    fn convert(
        &self,
        path: &Path,
        format: SourceFormat,
        decoded: DynamicImage,
    ) -> Result<(PathBuf, DynamicImage), NormalizeError> {
        let converted_path = PathResolver::converted_path(path)?;
        if converted_path.exists() {
            error!(
                "{} already exists and will be overwritten by the converted {}",
                converted_path.display(),
                path.display()
            );
        }

        // Transparency is dropped here
        let rgb = match decoded {
            DynamicImage::ImageLuma8(gray) => DynamicImage::ImageLuma8(gray),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };

        self.write_jpeg(&rgb, &converted_path, path)?;
        debug!("Wrote {} from {} source", converted_path.display(), format);

        fs::remove_file(path)?;
        debug!("Removed original {}", path.display());

        Ok((converted_path, rgb))
    }

    /// Encodes `image` as JPEG into a temp file next to `destination`, then renames it
    /// over `destination`. Permissions are copied from `permissions_from`.
    fn write_jpeg(
        &self,
        image: &DynamicImage,
        destination: &Path,
        permissions_from: &Path,
    ) -> Result<(), NormalizeError> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::Builder::new()
            .prefix(".normalize-")
            .suffix(".tmp")
            .tempfile_in(parent)?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            Self::encode_jpeg(image, &mut writer, self.jpeg_quality)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        if let Ok(metadata) = fs::metadata(permissions_from) {
            fs::set_permissions(temp.path(), metadata.permissions())?;
        }

        temp.persist(destination).map_err(|e| NormalizeError::Io(e.error))?;
        Ok(())
    }

    /// Grayscale stays grayscale, everything else is encoded as RGB8
    fn encode_jpeg<W: Write>(image: &DynamicImage, writer: W, quality: u8) -> Result<(), NormalizeError> {
        let mut encoder = JpegEncoder::new_with_quality(writer, quality);
        match image {
            DynamicImage::ImageLuma8(gray) => encoder
                .encode(gray.as_raw(), gray.width(), gray.height(), ColorType::L8)
                .map_err(NormalizeError::encode),
            other => {
                let rgb = other.to_rgb8();
                encoder
                    .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
                    .map_err(NormalizeError::encode)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn dimensions_on_disk(path: &Path) -> (u32, u32) {
        image::image_dimensions(path).unwrap()
    }

    #[test]
    fn test_rejects_zero_max_length() {
        assert!(matches!(
            ImageNormalizer::new(0),
            Err(NormalizeError::Validation(_))
        ));
    }

    #[test]
    fn test_small_jpeg_is_left_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("small.jpg");
        gradient(50, 50).save(&path).unwrap();
        let before = fs::read(&path).unwrap();

        let result = ImageNormalizer::new(1920).unwrap().normalize(&path).unwrap();

        assert!(!result.resized);
        assert_eq!(result.conversion_savings, 0);
        assert_eq!(result.resize_savings, 0);
        assert_eq!(result.path, path);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_png_is_converted_and_resized() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("holiday.png");
        gradient(400, 300).save(&path).unwrap();
        let size_before = fs::metadata(&path).unwrap().len() as i64;

        let result = ImageNormalizer::new(192).unwrap().normalize(&path).unwrap();

        let jpg = temp_dir.path().join("holiday.jpg");
        assert!(!path.exists());
        assert!(jpg.exists());
        assert_eq!(result.path, jpg);
        assert!(result.resized);
        assert_eq!(result.original_dimensions, Dimensions::new(400, 300));
        assert_eq!(result.final_dimensions, Dimensions::new(192, 144));
        assert_eq!(dimensions_on_disk(&jpg), (192, 144));

        let size_after = fs::metadata(&jpg).unwrap().len() as i64;
        assert_eq!(result.resize_savings, size_before - size_after);
    }

    #[test]
    fn test_uppercase_bmp_becomes_lowercase_jpg() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("SCAN.BMP");
        gradient(40, 30).save_with_format(&path, image::ImageFormat::Bmp).unwrap();

        let result = ImageNormalizer::new(1920).unwrap().normalize(&path).unwrap();

        assert!(!path.exists());
        assert_eq!(result.path, temp_dir.path().join("SCAN.jpg"));
        assert!(result.path.exists());
        assert!(!result.resized);
        assert_eq!(result.resize_savings, 0);
    }

    #[test]
    fn test_conversion_savings_may_be_negative() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dot.png");
        // A solid 8x8 PNG is far smaller than any JPEG header
        RgbImage::from_pixel(8, 8, Rgb([200, 10, 10])).save(&path).unwrap();
        let size_before = fs::metadata(&path).unwrap().len() as i64;

        let result = ImageNormalizer::new(1920).unwrap().normalize(&path).unwrap();

        let size_after = fs::metadata(&result.path).unwrap().len() as i64;
        assert_eq!(result.conversion_savings, size_before - size_after);
        assert!(result.conversion_savings < 0);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logo.png");
        RgbaImage::from_pixel(16, 16, Rgba([0, 0, 255, 10])).save(&path).unwrap();

        let result = ImageNormalizer::new(1920).unwrap().normalize(&path).unwrap();

        let reopened = image::open(&result.path).unwrap();
        assert!(!reopened.color().has_alpha());
        assert_eq!(reopened.dimensions(), (16, 16));
    }

    #[test]
    fn test_portrait_jpeg_is_resized_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tall.jpeg");
        gradient(300, 400).save_with_format(&path, image::ImageFormat::Jpeg).unwrap();

        let result = ImageNormalizer::new(100).unwrap().normalize(&path).unwrap();

        assert!(result.resized);
        assert_eq!(result.path, path);
        assert_eq!(result.conversion_savings, 0);
        assert_eq!(dimensions_on_disk(&path), (75, 100));
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wide.png");
        gradient(600, 200).save(&path).unwrap();
        let normalizer = ImageNormalizer::new(300).unwrap();

        let first = normalizer.normalize(&path).unwrap();
        assert!(first.resized);
        let bytes_after_first = fs::read(&first.path).unwrap();

        let second = normalizer.normalize(&first.path).unwrap();
        assert!(!second.resized);
        assert_eq!(second.conversion_savings, 0);
        assert_eq!(second.resize_savings, 0);
        assert_eq!(fs::read(&first.path).unwrap(), bytes_after_first);
    }

    #[test]
    fn test_corrupt_png_keeps_original() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.png");
        fs::write(&path, b"definitely not an image").unwrap();

        let err = ImageNormalizer::new(1920).unwrap().normalize(&path).unwrap_err();

        assert!(matches!(err, NormalizeError::Decode(_)));
        assert!(path.exists());
        assert!(!temp_dir.path().join("broken.jpg").exists());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ImageNormalizer::new(1920)
            .unwrap()
            .normalize(&temp_dir.path().join("gone.jpg"))
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Io(_)));
    }

    #[test]
    fn test_failed_jpeg_write_keeps_original() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.png");
        gradient(40, 30).save(&path).unwrap();
        // The converted file cannot replace a directory
        fs::create_dir(temp_dir.path().join("a.jpg")).unwrap();

        let err = ImageNormalizer::new(1920).unwrap().normalize(&path).unwrap_err();

        assert!(matches!(err, NormalizeError::Io(_)));
        assert!(path.exists());
        assert!(temp_dir.path().join("a.jpg").is_dir());
        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {:?}", leftovers);
    }

    #[test]
    fn test_unrecognized_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        let err = ImageNormalizer::new(1920).unwrap().normalize(&path).unwrap_err();
        assert!(matches!(err, NormalizeError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        gradient(400, 300).save(temp_dir.path().join("a.png")).unwrap();

        ImageNormalizer::new(100)
            .unwrap()
            .normalize(&temp_dir.path().join("a.png"))
            .unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg".to_string()]);
    }
}
