//! Decoding score/box tensors into thresholded candidates.

use crate::geometry::{CoordinateTransform, Rect};
use crate::tensor::{BoxTensor, ScoreTensor};
use crate::trace::{trace_event, trace_span};
use crate::util::{UltraFaceError, UltraFaceResult};

/// One box row as emitted by the detector: `[x_min, y_min_inv, x_max, y_max_inv]`.
///
/// The model encodes the vertical axis flipped, so `y_min_inv` is
/// `1 - y_max` and `y_max_inv` is `1 - y_min` in image orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawBox {
    pub x_min: f32,
    pub y_min_inv: f32,
    pub x_max: f32,
    pub y_max_inv: f32,
}

impl RawBox {
    /// Reads a tensor row in model order.
    pub fn from_row(row: [f32; 4]) -> Self {
        Self {
            x_min: row[0],
            y_min_inv: row[1],
            x_max: row[2],
            y_max_inv: row[3],
        }
    }

    /// Encodes an image-oriented rectangle in the model's flipped layout.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x_min: rect.x_min(),
            y_min_inv: 1.0 - rect.y_max(),
            x_max: rect.x_max(),
            y_max_inv: 1.0 - rect.y_min(),
        }
    }

    /// Returns the row in model order.
    pub fn to_row(self) -> [f32; 4] {
        [self.x_min, self.y_min_inv, self.x_max, self.y_max_inv]
    }

    /// Decodes into an image-oriented rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::from_min_max(
            self.x_min,
            1.0 - self.y_max_inv,
            self.x_max,
            1.0 - self.y_min_inv,
        )
    }
}

/// A thresholded detection before suppression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Rectangle in the transform's output space.
    pub rect: Rect,
    /// Face-class score.
    pub score: f32,
    /// Anchor index in the source tensors.
    pub index: usize,
}

/// Decodes every anchor whose face score reaches `min_score`.
///
/// Candidates are returned in anchor order. Scores that are NaN never reach
/// the threshold. Box coordinates are decoded without validation; degenerate
/// rectangles are left for suppression to handle.
pub fn decode(
    scores: ScoreTensor<'_>,
    boxes: BoxTensor<'_>,
    min_score: f32,
    transform: &CoordinateTransform,
) -> UltraFaceResult<Vec<Candidate>> {
    let count = scores.num_candidates();
    if boxes.num_candidates() != count {
        return Err(UltraFaceError::ShapeMismatch {
            scores: count,
            boxes: boxes.num_candidates(),
        });
    }

    let _span = trace_span!("decode", anchors = count).entered();

    let mut out = Vec::new();
    for index in 0..count {
        let score = scores.face_score(index)?;
        if score.is_nan() || score < min_score {
            continue;
        }
        let rect = transform.apply(boxes.raw_box(index)?.to_rect());
        out.push(Candidate { rect, score, index });
    }

    trace_event!("decoded_candidates", count = out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::RawBox;
    use crate::geometry::Rect;

    #[test]
    fn raw_box_flips_vertical_axis() {
        let rect = RawBox::from_row([0.1, 0.7, 0.3, 0.9]).to_rect();
        assert!((rect.x_min() - 0.1).abs() < 1e-6);
        assert!((rect.x_max() - 0.3).abs() < 1e-6);
        assert!((rect.y_min() - 0.1).abs() < 1e-6);
        assert!((rect.y_max() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn encode_decode_round_trip() {
        let rect = Rect::from_min_max(0.15, 0.4, 0.55, 0.95);
        let back = RawBox::from_rect(rect).to_rect();
        assert!((back.x_min() - rect.x_min()).abs() < 1e-6);
        assert!((back.y_min() - rect.y_min()).abs() < 1e-6);
        assert!((back.x_max() - rect.x_max()).abs() < 1e-6);
        assert!((back.y_max() - rect.y_max()).abs() < 1e-6);
    }
}
