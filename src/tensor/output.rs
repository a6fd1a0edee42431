//! Typed views over the two detector output tensors.

use crate::candidate::RawBox;
use crate::tensor::TensorView;
use crate::util::{UltraFaceError, UltraFaceResult};

/// Class index of the face score along the last axis of the score tensor.
pub const FACE_CLASS: usize = 1;

/// Classification scores with shape `(1, P, 2)`: `[background, face]` per anchor.
#[derive(Copy, Clone, Debug)]
pub struct ScoreTensor<'a> {
    view: TensorView<'a>,
}

impl<'a> ScoreTensor<'a> {
    /// Wraps a view after checking it has shape `(1, P, 2)`.
    pub fn new(view: TensorView<'a>) -> UltraFaceResult<Self> {
        check_layout(view, 2, "score tensor", "(1, P, 2)")?;
        Ok(Self { view })
    }

    /// Returns the number of candidate positions `P`.
    pub fn num_candidates(&self) -> usize {
        self.view.shape()[1]
    }

    /// Returns the face-class score for candidate `index`.
    pub fn face_score(&self, index: usize) -> UltraFaceResult<f32> {
        self.view
            .get(&[0, index, FACE_CLASS])
            .ok_or(UltraFaceError::IndexOutOfBounds {
                index,
                len: self.num_candidates(),
                context: "score tensor",
            })
    }

    /// Returns the underlying view.
    pub fn view(&self) -> TensorView<'a> {
        self.view
    }
}

/// Raw box regressions with shape `(1, P, 4)`.
#[derive(Copy, Clone, Debug)]
pub struct BoxTensor<'a> {
    view: TensorView<'a>,
}

impl<'a> BoxTensor<'a> {
    /// Wraps a view after checking it has shape `(1, P, 4)`.
    pub fn new(view: TensorView<'a>) -> UltraFaceResult<Self> {
        check_layout(view, 4, "box tensor", "(1, P, 4)")?;
        Ok(Self { view })
    }

    /// Returns the number of candidate positions `P`.
    pub fn num_candidates(&self) -> usize {
        self.view.shape()[1]
    }

    /// Returns the raw encoded box for candidate `index`.
    pub fn raw_box(&self, index: usize) -> UltraFaceResult<RawBox> {
        let mut row = [0.0f32; 4];
        for (k, slot) in row.iter_mut().enumerate() {
            *slot = self
                .view
                .get(&[0, index, k])
                .ok_or(UltraFaceError::IndexOutOfBounds {
                    index,
                    len: self.num_candidates(),
                    context: "box tensor",
                })?;
        }
        Ok(RawBox::from_row(row))
    }

    /// Returns the underlying view.
    pub fn view(&self) -> TensorView<'a> {
        self.view
    }
}

fn check_layout(
    view: TensorView<'_>,
    width: usize,
    context: &'static str,
    expected: &'static str,
) -> UltraFaceResult<()> {
    let shape = view.shape();
    if shape.len() != 3 || shape[0] != 1 || shape[2] != width {
        return Err(UltraFaceError::InvalidShape {
            context,
            expected,
            got: shape.to_vec(),
        });
    }
    Ok(())
}
