//! Building image features with the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::feature::{ImageFeature, PixelFormat};
use crate::util::{UltraFaceError, UltraFaceResult};
use std::path::Path;

/// Copies an RGB image buffer into a feature.
pub fn feature_from_rgb_image(img: &image::RgbImage) -> UltraFaceResult<ImageFeature> {
    ImageFeature::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
        PixelFormat::Rgb8,
    )
}

/// Copies an RGBA image buffer into a feature.
pub fn feature_from_rgba_image(img: &image::RgbaImage) -> UltraFaceResult<ImageFeature> {
    ImageFeature::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
        PixelFormat::Rgba8,
    )
}

/// Converts any dynamic image to RGB and wraps it.
pub fn feature_from_dynamic_image(img: &image::DynamicImage) -> UltraFaceResult<ImageFeature> {
    feature_from_rgb_image(&img.to_rgb8())
}

/// Loads an image from disk as an RGB feature.
pub fn load_image_feature<P: AsRef<Path>>(path: P) -> UltraFaceResult<ImageFeature> {
    let img = image::open(path).map_err(|err| UltraFaceError::ImageIo {
        reason: err.to_string(),
    })?;
    feature_from_dynamic_image(&img)
}
