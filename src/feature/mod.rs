//! Predictor inputs.
//!
//! A [`Feature`] is either a pixel image with optional placement metadata or
//! a pre-built tensor tagged with its declared type. Only image-typed
//! features can be fed to the face predictor.

use crate::geometry::AspectMode;
use crate::model::Normalization;
use crate::tensor::Tensor;
use crate::util::{UltraFaceError, UltraFaceResult};

#[cfg(feature = "image-io")]
pub mod io;
pub(crate) mod resample;

/// Interleaved 8-bit pixel formats accepted by [`ImageFeature`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Owned pixel image plus the metadata needed to place it into a model input.
///
/// `normalization` and `aspect_mode` override the model's defaults when set.
#[derive(Clone, Debug)]
pub struct ImageFeature {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
    format: PixelFormat,
    normalization: Option<Normalization>,
    aspect_mode: Option<AspectMode>,
}

impl ImageFeature {
    /// Wraps a tightly packed interleaved pixel buffer.
    pub fn new(
        pixels: Vec<u8>,
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> UltraFaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(UltraFaceError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(format.channels()))
            .ok_or(UltraFaceError::InvalidDimensions { width, height })?;
        if pixels.len() < expected {
            return Err(UltraFaceError::BufferTooSmall {
                needed: expected,
                got: pixels.len(),
            });
        }
        if pixels.len() > expected {
            return Err(UltraFaceError::BufferLength {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            format,
            normalization: None,
            aspect_mode: None,
        })
    }

    /// Sets the per-channel normalization to apply.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }

    /// Sets how the image is placed into the model input.
    pub fn with_aspect_mode(mut self, mode: AspectMode) -> Self {
        self.aspect_mode = Some(mode);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn normalization(&self) -> Option<Normalization> {
        self.normalization
    }

    pub fn aspect_mode(&self) -> Option<AspectMode> {
        self.aspect_mode
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGB value at `(x, y)`, if within bounds.
    pub fn rgb(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.format.channels();
        let px = self.pixels.get(start..start + 3)?;
        Some([px[0], px[1], px[2]])
    }
}

/// Declared element type of an [`ArrayFeature`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayType {
    /// The tensor already holds a normalized image in the model's input layout.
    Image,
    /// Arbitrary numeric data.
    Generic,
}

/// A pre-built tensor tagged with its declared type.
#[derive(Clone, Debug)]
pub struct ArrayFeature {
    tensor: Tensor,
    kind: ArrayType,
}

impl ArrayFeature {
    /// Declares `tensor` as a model-ready image.
    pub fn image(tensor: Tensor) -> Self {
        Self {
            tensor,
            kind: ArrayType::Image,
        }
    }

    /// Wraps `tensor` as untyped numeric data.
    pub fn generic(tensor: Tensor) -> Self {
        Self {
            tensor,
            kind: ArrayType::Generic,
        }
    }

    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    pub fn kind(&self) -> ArrayType {
        self.kind
    }
}

/// A single predictor input.
#[derive(Clone, Debug)]
pub enum Feature {
    Image(ImageFeature),
    Array(ArrayFeature),
}

impl Feature {
    /// Returns true for features the face predictor can consume.
    pub fn is_image(&self) -> bool {
        match self {
            Feature::Image(_) => true,
            Feature::Array(array) => array.kind == ArrayType::Image,
        }
    }
}

impl From<ImageFeature> for Feature {
    fn from(value: ImageFeature) -> Self {
        Feature::Image(value)
    }
}

impl From<ArrayFeature> for Feature {
    fn from(value: ArrayFeature) -> Self {
        Feature::Array(value)
    }
}
