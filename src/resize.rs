//! # Image Resize Module
//!
//! Questo modulo calcola le dimensioni di destinazione e ridimensiona le immagini
//! in memoria.
//!
//! ## Caratteristiche
//! - **Aspect ratio preservato**: il lato lungo diventa esattamente `max_length`,
//!   il lato corto è `round(corto / lungo * max_length)`
//! - **Immagini quadrate**: entrambi i lati diventano `max_length`
//! - **Solo riduzione**: immagini già entro il limite non vengono toccate
//! - **Filtro bicubico**: Catmull-Rom, buon bilanciamento qualità/velocità
//!
//! ## Esempio
//! ```text
//! 4000x3000, max 1920 → 1920x1440
//! 3000x4000, max 1920 → 1440x1920
//! 2000x2000, max 1920 → 1920x1920
//!  500x500,  max 1920 → nessun resize
//! ```

use image::imageops::FilterType;
use image::DynamicImage;
use serde::Serialize;
use std::fmt;

/// Filter used for every downscale
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Pixel dimensions of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(image: &DynamicImage) -> Self {
        Self::new(image.width(), image.height())
    }

    pub fn longer_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn shorter_edge(&self) -> u32 {
        self.width.min(self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Target size for an image whose longer edge exceeds the maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTarget(pub Dimensions);

impl ResizeTarget {
    /// Compute the target for `source`, or `None` when it already fits in `max_length`
    pub fn compute(source: Dimensions, max_length: u32) -> Option<Self> {
        if source.longer_edge() <= max_length {
            return None;
        }

        if source.width == source.height {
            return Some(Self(Dimensions::new(max_length, max_length)));
        }

        let ratio = source.shorter_edge() as f64 / source.longer_edge() as f64;
        // A 0px edge cannot be encoded
        let short = ((ratio * max_length as f64).round() as u32).max(1);

        let target = if source.width > source.height {
            Dimensions::new(max_length, short)
        } else {
            Dimensions::new(short, max_length)
        };
        Some(Self(target))
    }

    pub fn dimensions(&self) -> Dimensions {
        self.0
    }

    /// Resize `image` to exactly this target
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        image.resize_exact(self.0.width, self.0.height, RESIZE_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_landscape_target() {
        let target = ResizeTarget::compute(Dimensions::new(4000, 3000), 1920).unwrap();
        assert_eq!(target.dimensions(), Dimensions::new(1920, 1440));
    }

    #[test]
    fn test_portrait_target() {
        let target = ResizeTarget::compute(Dimensions::new(3000, 4000), 1920).unwrap();
        assert_eq!(target.dimensions(), Dimensions::new(1440, 1920));
    }

    #[test]
    fn test_square_target() {
        let target = ResizeTarget::compute(Dimensions::new(2500, 2500), 1920).unwrap();
        assert_eq!(target.dimensions(), Dimensions::new(1920, 1920));
    }

    #[test]
    fn test_no_target_when_within_limit() {
        assert_eq!(ResizeTarget::compute(Dimensions::new(500, 500), 1920), None);
        assert_eq!(ResizeTarget::compute(Dimensions::new(1920, 1080), 1920), None);
    }

    #[test]
    fn test_shorter_edge_is_rounded() {
        // 1000/3000 * 100 = 33.33
        let target = ResizeTarget::compute(Dimensions::new(3000, 1000), 100).unwrap();
        assert_eq!(target.dimensions(), Dimensions::new(100, 33));

        // 2000/3000 * 100 = 66.67
        let target = ResizeTarget::compute(Dimensions::new(2000, 3000), 100).unwrap();
        assert_eq!(target.dimensions(), Dimensions::new(67, 100));
    }

    #[test]
    fn test_shorter_edge_never_collapses_to_zero() {
        let target = ResizeTarget::compute(Dimensions::new(10_000, 1), 100).unwrap();
        assert_eq!(target.dimensions(), Dimensions::new(100, 1));
    }

    #[test]
    fn test_aspect_ratio_error_within_one_pixel() {
        for (w, h, max) in [(4032, 3024, 1920), (1234, 987, 500), (777, 3001, 640), (5000, 17, 300)] {
            let target = ResizeTarget::compute(Dimensions::new(w, h), max).unwrap().dimensions();
            assert_eq!(target.longer_edge(), max);

            let exact = w.min(h) as f64 / w.max(h) as f64 * max as f64;
            assert!((target.shorter_edge() as f64 - exact).abs() <= 1.0);
        }
    }

    #[test]
    fn test_apply_resizes_image() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(400, 300));
        let target = ResizeTarget::compute(Dimensions::of(&image), 200).unwrap();
        let resized = target.apply(&image);
        assert_eq!(Dimensions::of(&resized), Dimensions::new(200, 150));
    }

    #[test]
    fn test_dimensions_display() {
        assert_eq!(Dimensions::new(1920, 1080).to_string(), "1920x1080");
    }
}
