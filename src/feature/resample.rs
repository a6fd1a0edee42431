//! Conversion of predictor inputs into the model's input tensor.
//!
//! Image features are resampled with bilinear interpolation. Each
//! destination pixel center is mapped through the letterbox transform into
//! normalized image coordinates; samples that fall outside the image become
//! black padding. Interpolation clamps indices to the valid image range.

use crate::feature::{Feature, ImageFeature};
use crate::geometry::CoordinateTransform;
use crate::model::{ModelInputSpec, TensorLayout};
use crate::tensor::Tensor;
use crate::util::{UltraFaceError, UltraFaceResult};
use std::borrow::Cow;

/// Model-ready input plus the transform that maps detections back to the source.
pub(crate) struct PreparedInput<'a> {
    pub(crate) tensor: Cow<'a, Tensor>,
    pub(crate) transform: CoordinateTransform,
}

pub(crate) fn prepare_input<'a>(
    feature: &'a Feature,
    spec: &ModelInputSpec,
) -> UltraFaceResult<PreparedInput<'a>> {
    match feature {
        Feature::Image(image) => {
            let (tensor, transform) = image_to_tensor(image, spec)?;
            Ok(PreparedInput {
                tensor: Cow::Owned(tensor),
                transform,
            })
        }
        Feature::Array(array) => {
            if array.tensor().shape() != spec.input_shape() {
                return Err(UltraFaceError::InvalidShape {
                    context: "image array feature",
                    expected: "the model input shape",
                    got: array.tensor().shape().to_vec(),
                });
            }
            Ok(PreparedInput {
                tensor: Cow::Borrowed(array.tensor()),
                transform: CoordinateTransform::Identity,
            })
        }
    }
}

/// Resamples and normalizes an image into the tensor `spec` describes.
///
/// The feature's own normalization and aspect mode take precedence over the
/// model defaults. The returned transform maps normalized model-space
/// rectangles back onto the source image.
pub fn image_to_tensor(
    image: &ImageFeature,
    spec: &ModelInputSpec,
) -> UltraFaceResult<(Tensor, CoordinateTransform)> {
    spec.validate()?;
    let norm = image.normalization().unwrap_or(spec.normalization);
    norm.validate()?;
    let mode = image.aspect_mode().unwrap_or(spec.aspect_mode);

    let (dst_w, dst_h) = (spec.width, spec.height);
    let (src_w, src_h) = (image.width(), image.height());
    let transform = CoordinateTransform::letterbox(mode, (src_w, src_h), (dst_w, dst_h))?;
    let (ox, oy, kx, ky) = transform.params();

    let overflow = || UltraFaceError::InvalidDimensions {
        width: dst_w,
        height: dst_h,
    };
    let plane = dst_w.checked_mul(dst_h).ok_or_else(overflow)?;
    let len = plane.checked_mul(3).ok_or_else(overflow)?;
    let mut data = vec![0.0f32; len];
    for dy in 0..dst_h {
        let ny = ((dy as f32 + 0.5) / dst_h as f32 - oy) / ky;
        for dx in 0..dst_w {
            let nx = ((dx as f32 + 0.5) / dst_w as f32 - ox) / kx;
            let rgb = if (0.0..=1.0).contains(&nx) && (0.0..=1.0).contains(&ny) {
                sample_bilinear(image, nx * src_w as f32 - 0.5, ny * src_h as f32 - 0.5)
            } else {
                [0.0; 3]
            };
            for (c, &value) in rgb.iter().enumerate() {
                let idx = match spec.layout {
                    TensorLayout::Nchw => c * plane + dy * dst_w + dx,
                    TensorLayout::Nhwc => (dy * dst_w + dx) * 3 + c,
                };
                data[idx] = norm.apply(c, value);
            }
        }
    }

    let tensor = Tensor::new(data, spec.input_shape().to_vec())?;
    Ok((tensor, transform))
}

fn sample_bilinear(image: &ImageFeature, x: f32, y: f32) -> [f32; 3] {
    let width = image.width();
    let height = image.height();
    let x = x.clamp(0.0, (width - 1) as f32);
    let y = y.clamp(0.0, (height - 1) as f32);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let a = image.rgb(x0, y0).unwrap_or_default();
    let b = image.rgb(x1, y0).unwrap_or_default();
    let c = image.rgb(x0, y1).unwrap_or_default();
    let d = image.rgb(x1, y1).unwrap_or_default();

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let mut out = [0.0f32; 3];
    for (k, slot) in out.iter_mut().enumerate() {
        *slot = a[k] as f32 * w00 + b[k] as f32 * w10 + c[k] as f32 * w01 + d[k] as f32 * w11;
    }
    out
}
