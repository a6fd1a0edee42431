//! The inference backend seam and its input metadata.
//!
//! The detector network itself is not part of this crate. A backend
//! implements [`FaceModel`], describing the input it expects through
//! [`ModelInputSpec`] and returning the raw output tensors of one forward
//! pass. Output order is fixed: index [`SCORES_OUTPUT`] holds the
//! `(1, P, 2)` class scores and index [`BOXES_OUTPUT`] the `(1, P, 4)` boxes.

use crate::geometry::AspectMode;
use crate::tensor::{Tensor, TensorView};
use crate::util::{InferenceError, UltraFaceError, UltraFaceResult};

/// Output slot holding class scores.
pub const SCORES_OUTPUT: usize = 0;
/// Output slot holding box regressions.
pub const BOXES_OUTPUT: usize = 1;

/// Memory layout of the model's image input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TensorLayout {
    /// `(1, 3, H, W)`
    #[default]
    Nchw,
    /// `(1, H, W, 3)`
    Nhwc,
}

/// Per-channel normalization applied to RGB values scaled to `[0, 1]`:
/// `(value - mean) / std`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for Normalization {
    /// UltraFace normalization, `(pixel - 127) / 128` on 8-bit values.
    fn default() -> Self {
        Self {
            mean: [127.0 / 255.0; 3],
            std: [128.0 / 255.0; 3],
        }
    }
}

impl Normalization {
    /// Rejects non-finite means and zero or non-finite deviations.
    pub fn validate(&self) -> UltraFaceResult<()> {
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(UltraFaceError::InvalidArgument(
                "normalization mean must be finite",
            ));
        }
        if self.std.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(UltraFaceError::InvalidArgument(
                "normalization std must be finite and non-zero",
            ));
        }
        Ok(())
    }

    /// Normalizes one 8-bit channel value.
    #[inline]
    pub fn apply(&self, channel: usize, value: f32) -> f32 {
        (value / 255.0 - self.mean[channel]) / self.std[channel]
    }
}

/// Input description published by a model backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelInputSpec {
    /// Input width in pixels.
    pub width: usize,
    /// Input height in pixels.
    pub height: usize,
    pub layout: TensorLayout,
    /// Default normalization when the feature does not carry its own.
    pub normalization: Normalization,
    /// Default aspect handling when the feature does not carry its own.
    pub aspect_mode: AspectMode,
}

impl Default for ModelInputSpec {
    /// The 320x240 UltraFace RFB/slim input.
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            layout: TensorLayout::Nchw,
            normalization: Normalization::default(),
            aspect_mode: AspectMode::ScaleToFit,
        }
    }
}

impl ModelInputSpec {
    /// Returns the input tensor shape for the configured layout.
    pub fn input_shape(&self) -> [usize; 4] {
        match self.layout {
            TensorLayout::Nchw => [1, 3, self.height, self.width],
            TensorLayout::Nhwc => [1, self.height, self.width, 3],
        }
    }

    /// Validates dimensions and normalization.
    pub fn validate(&self) -> UltraFaceResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(UltraFaceError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.normalization.validate()
    }
}

/// An opaque face detector backend.
///
/// Implementations must be safe to call through `&self`; a backend that
/// cannot run concurrent forward passes should serialize internally or not
/// be shared across threads.
pub trait FaceModel {
    /// Describes the input tensor the backend expects.
    fn input_spec(&self) -> ModelInputSpec;

    /// Runs one forward pass and returns `[scores, boxes, ..]`.
    fn infer(&self, input: TensorView<'_>) -> Result<Vec<Tensor>, InferenceError>;
}

impl<M: FaceModel + ?Sized> FaceModel for &M {
    fn input_spec(&self) -> ModelInputSpec {
        (**self).input_spec()
    }

    fn infer(&self, input: TensorView<'_>) -> Result<Vec<Tensor>, InferenceError> {
        (**self).infer(input)
    }
}

impl<M: FaceModel + ?Sized> FaceModel for Box<M> {
    fn input_spec(&self) -> ModelInputSpec {
        (**self).input_spec()
    }

    fn infer(&self, input: TensorView<'_>) -> Result<Vec<Tensor>, InferenceError> {
        (**self).infer(input)
    }
}

impl<M: FaceModel + ?Sized> FaceModel for std::sync::Arc<M> {
    fn input_spec(&self) -> ModelInputSpec {
        (**self).input_spec()
    }

    fn infer(&self, input: TensorView<'_>) -> Result<Vec<Tensor>, InferenceError> {
        (**self).infer(input)
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelInputSpec, Normalization, TensorLayout};

    #[test]
    fn default_normalization_matches_ultraface_constants() {
        let norm = Normalization::default();
        let v = norm.apply(0, 255.0);
        assert!((v - 1.0).abs() < 1e-5);
        let v = norm.apply(2, 127.0);
        assert!(v.abs() < 1e-6);
    }

    #[test]
    fn input_shape_follows_layout() {
        let mut spec = ModelInputSpec::default();
        assert_eq!(spec.input_shape(), [1, 3, 240, 320]);
        spec.layout = TensorLayout::Nhwc;
        assert_eq!(spec.input_shape(), [1, 240, 320, 3]);
    }

    #[test]
    fn zero_std_is_rejected() {
        let spec = ModelInputSpec {
            normalization: Normalization {
                mean: [0.0; 3],
                std: [1.0, 0.0, 1.0],
            },
            ..ModelInputSpec::default()
        };
        assert!(spec.validate().is_err());
    }
}
