//! Mapping rectangles between model input space and source image space.
//!
//! The model sees a fixed-size input. A source image of a different aspect
//! ratio is placed into it according to an [`AspectMode`]: stretched,
//! scaled to fit with padding, or scaled to fill with cropping. In
//! normalized model coordinates the image content then occupies the span
//! `[offset, offset + scale]` on each axis (`offset` is negative and
//! `scale > 1` when the image was cropped). Mapping a rectangle back to the
//! source image is `(v - offset) / scale`.

use crate::geometry::Rect;
use crate::util::{UltraFaceError, UltraFaceResult};

/// How a source image is placed into the model input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AspectMode {
    /// Stretch the image to the model input, ignoring aspect ratio.
    #[default]
    ScaleToFit,
    /// Scale until the image covers the input; the excess is cropped.
    AspectFill,
    /// Scale until the image fits inside the input; the remainder is padded.
    AspectFit,
}

/// Maps rectangles from normalized model space into a caller's output space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CoordinateTransform {
    /// Rectangles pass through unchanged.
    #[default]
    Identity,
    /// Undo letterbox padding or cropping.
    Letterbox {
        offset_x: f32,
        offset_y: f32,
        scale_x: f32,
        scale_y: f32,
    },
}

impl CoordinateTransform {
    /// Builds the transform that undoes placing a `source` image of
    /// `(width, height)` pixels into a `model` input of `(width, height)`.
    pub fn letterbox(
        mode: AspectMode,
        source: (usize, usize),
        model: (usize, usize),
    ) -> UltraFaceResult<Self> {
        let (src_w, src_h) = source;
        let (dst_w, dst_h) = model;
        if src_w == 0 || src_h == 0 {
            return Err(UltraFaceError::InvalidDimensions {
                width: src_w,
                height: src_h,
            });
        }
        if dst_w == 0 || dst_h == 0 {
            return Err(UltraFaceError::InvalidDimensions {
                width: dst_w,
                height: dst_h,
            });
        }

        let ratio_x = dst_w as f32 / src_w as f32;
        let ratio_y = dst_h as f32 / src_h as f32;
        let ratio = match mode {
            AspectMode::ScaleToFit => return Ok(Self::Identity),
            AspectMode::AspectFit => ratio_x.min(ratio_y),
            AspectMode::AspectFill => ratio_x.max(ratio_y),
        };

        let scale_x = src_w as f32 * ratio / dst_w as f32;
        let scale_y = src_h as f32 * ratio / dst_h as f32;
        let offset_x = (1.0 - scale_x) * 0.5;
        let offset_y = (1.0 - scale_y) * 0.5;
        if scale_x == 1.0 && scale_y == 1.0 {
            return Ok(Self::Identity);
        }
        Ok(Self::Letterbox {
            offset_x,
            offset_y,
            scale_x,
            scale_y,
        })
    }

    /// Returns `(offset_x, offset_y, scale_x, scale_y)`.
    pub fn params(&self) -> (f32, f32, f32, f32) {
        match *self {
            Self::Identity => (0.0, 0.0, 1.0, 1.0),
            Self::Letterbox {
                offset_x,
                offset_y,
                scale_x,
                scale_y,
            } => (offset_x, offset_y, scale_x, scale_y),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Maps a normalized model-space point into output space.
    pub fn apply_point(&self, x: f32, y: f32) -> (f32, f32) {
        let (ox, oy, sx, sy) = self.params();
        ((x - ox) / sx, (y - oy) / sy)
    }

    /// Maps a normalized output-space point back into model space.
    pub fn invert_point(&self, x: f32, y: f32) -> (f32, f32) {
        let (ox, oy, sx, sy) = self.params();
        (x * sx + ox, y * sy + oy)
    }

    /// Maps a model-space rectangle into output space.
    pub fn apply(&self, rect: Rect) -> Rect {
        if self.is_identity() {
            return rect;
        }
        let (x0, y0) = self.apply_point(rect.x_min(), rect.y_min());
        let (x1, y1) = self.apply_point(rect.x_max(), rect.y_max());
        Rect::from_min_max(x0, y0, x1, y1)
    }

    /// Maps an output-space rectangle back into model space.
    pub fn invert(&self, rect: Rect) -> Rect {
        if self.is_identity() {
            return rect;
        }
        let (x0, y0) = self.invert_point(rect.x_min(), rect.y_min());
        let (x1, y1) = self.invert_point(rect.x_max(), rect.y_max());
        Rect::from_min_max(x0, y0, x1, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::{AspectMode, CoordinateTransform};
    use crate::geometry::Rect;

    #[test]
    fn scale_to_fit_is_identity() {
        let t = CoordinateTransform::letterbox(AspectMode::ScaleToFit, (640, 480), (320, 240))
            .unwrap();
        assert!(t.is_identity());
    }

    #[test]
    fn matching_aspect_is_identity() {
        let t = CoordinateTransform::letterbox(AspectMode::AspectFit, (640, 480), (320, 240))
            .unwrap();
        assert!(t.is_identity());
    }

    #[test]
    fn aspect_fit_pads_the_short_axis() {
        // 200x100 into 100x100: content is 100x50, padded by 25 rows top and bottom.
        let t =
            CoordinateTransform::letterbox(AspectMode::AspectFit, (200, 100), (100, 100)).unwrap();
        let (ox, oy, sx, sy) = t.params();
        assert_eq!((ox, sx), (0.0, 1.0));
        assert!((oy - 0.25).abs() < 1e-6);
        assert!((sy - 0.5).abs() < 1e-6);

        let mapped = t.apply(Rect::from_min_max(0.0, 0.25, 1.0, 0.75));
        assert!(mapped.y_min().abs() < 1e-6);
        assert!((mapped.y_max() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn aspect_fill_crops_the_long_axis() {
        // 200x100 into 100x100: content is 200x100, 50 columns cropped each side.
        let t =
            CoordinateTransform::letterbox(AspectMode::AspectFill, (200, 100), (100, 100)).unwrap();
        let (ox, _, sx, _) = t.params();
        assert!((ox + 0.5).abs() < 1e-6);
        assert!((sx - 2.0).abs() < 1e-6);

        let mapped = t.apply(Rect::from_min_max(0.0, 0.0, 1.0, 1.0));
        assert!((mapped.x_min() - 0.25).abs() < 1e-6);
        assert!((mapped.x_max() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn invert_undoes_apply() {
        let t =
            CoordinateTransform::letterbox(AspectMode::AspectFit, (300, 500), (320, 240)).unwrap();
        let rect = Rect::from_min_max(0.1, 0.2, 0.4, 0.9);
        let back = t.invert(t.apply(rect));
        assert!((back.x_min() - rect.x_min()).abs() < 1e-5);
        assert!((back.y_min() - rect.y_min()).abs() < 1e-5);
        assert!((back.x_max() - rect.x_max()).abs() < 1e-5);
        assert!((back.y_max() - rect.y_max()).abs() < 1e-5);
    }

    #[test]
    fn zero_sized_source_is_rejected() {
        assert!(CoordinateTransform::letterbox(AspectMode::AspectFit, (0, 10), (10, 10)).is_err());
    }
}
