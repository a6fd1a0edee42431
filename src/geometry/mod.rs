//! Axis-aligned rectangles in normalized coordinates.

use crate::util::math::ratio_or_zero;

mod transform;

pub use transform::{AspectMode, CoordinateTransform};

/// Axis-aligned rectangle stored as min/max corners.
///
/// Coordinates are normalized to `[0, 1]` relative to whichever space the
/// rectangle was produced in. Construction orders each axis so that
/// `x_min <= x_max` and `y_min <= y_max`; NaN coordinates are kept as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

impl Rect {
    /// Builds a rectangle from two corners on each axis.
    pub fn from_min_max(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        let (x_min, x_max) = ordered(x_min, x_max);
        let (y_min, y_max) = ordered(y_min, y_max);
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Builds a rectangle from its top-left origin and size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_min_max(x, y, x + width, y + height)
    }

    pub fn x_min(&self) -> f32 {
        self.x_min
    }

    pub fn y_min(&self) -> f32 {
        self.y_min
    }

    pub fn x_max(&self) -> f32 {
        self.x_max
    }

    pub fn y_max(&self) -> f32 {
        self.y_max
    }

    /// Returns `(x_min, y_min)`.
    pub fn origin(&self) -> (f32, f32) {
        (self.x_min, self.y_min)
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (f32, f32) {
        (self.width(), self.height())
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Returns the rectangle center.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x_min + self.x_max) * 0.5,
            (self.y_min + self.y_max) * 0.5,
        )
    }

    /// Returns the area, clamped at zero.
    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Returns true when the rectangle has no positive area.
    pub fn is_degenerate(&self) -> bool {
        let area = self.area();
        area <= 0.0 || area.is_nan()
    }

    /// Returns the area shared with `other`.
    ///
    /// Degenerate rectangles, including those with NaN corners, share no area.
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        if self.is_degenerate() || other.is_degenerate() {
            return 0.0;
        }
        let w = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let h = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);
        w * h
    }

    /// Intersection-over-union with `other`.
    ///
    /// Always within `[0, 1]`. Returns 0 when either rectangle is degenerate
    /// or the union is zero, so zero-area and NaN-cornered rectangles never
    /// overlap anything.
    pub fn iou(&self, other: &Rect) -> f32 {
        let inter = self.intersection_area(other);
        let union = self.area() + other.area() - inter;
        ratio_or_zero(inter, union)
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}
