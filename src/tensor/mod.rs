//! Flat `f32` tensors with explicit shape and strides.
//!
//! `TensorView` borrows a 1D buffer and describes it with up to
//! [`MAX_RANK`] dimensions. Strides count elements between consecutive
//! indices along each axis, so a view may describe padded or permuted data
//! without copying. Element access is always bounds-checked against the
//! shape, and construction checks that the buffer covers every addressable
//! element.

use crate::util::{UltraFaceError, UltraFaceResult};

mod output;

pub use output::{BoxTensor, ScoreTensor, FACE_CLASS};

/// Highest tensor rank supported by views.
pub const MAX_RANK: usize = 4;

/// Borrowed strided view over a flat `f32` buffer.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    rank: usize,
    shape: [usize; MAX_RANK],
    strides: [usize; MAX_RANK],
}

impl<'a> TensorView<'a> {
    /// Creates a row-major contiguous view.
    pub fn from_slice(data: &'a [f32], shape: &[usize]) -> UltraFaceResult<Self> {
        let strides = contiguous_strides(shape)?;
        Self::new(data, shape, &strides[..shape.len()])
    }

    /// Creates a view with explicit per-axis strides.
    pub fn new(data: &'a [f32], shape: &[usize], strides: &[usize]) -> UltraFaceResult<Self> {
        check_rank(shape)?;
        if strides.len() != shape.len() {
            return Err(UltraFaceError::InvalidShape {
                context: "tensor strides",
                expected: "one stride per axis",
                got: strides.to_vec(),
            });
        }
        let needed = required_len(shape, strides)?;
        if data.len() < needed {
            return Err(UltraFaceError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }

        let mut shape_arr = [0usize; MAX_RANK];
        let mut strides_arr = [0usize; MAX_RANK];
        shape_arr[..shape.len()].copy_from_slice(shape);
        strides_arr[..strides.len()].copy_from_slice(strides);
        Ok(Self {
            data,
            rank: shape.len(),
            shape: shape_arr,
            strides: strides_arr,
        })
    }

    /// Returns the number of axes.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the extent of every axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape[..self.rank]
    }

    /// Returns the element stride of every axis.
    pub fn strides(&self) -> &[usize] {
        &self.strides[..self.rank]
    }

    /// Returns the extent of `axis`, if it exists.
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.shape().get(axis).copied()
    }

    /// Returns the backing slice, including any padding between elements.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the buffer offset of `index`, if every coordinate is in bounds.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.rank {
            return None;
        }
        let mut offset = 0usize;
        for ((&i, &dim), &stride) in index.iter().zip(self.shape()).zip(self.strides()) {
            if i >= dim {
                return None;
            }
            offset = offset.checked_add(i.checked_mul(stride)?)?;
        }
        Some(offset)
    }

    /// Returns the element at `index`, if it is within bounds.
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        let offset = self.offset(index)?;
        self.data.get(offset).copied()
    }
}

/// Owned contiguous row-major tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Vec<usize>,
}

impl Tensor {
    /// Wraps a buffer whose length matches the product of `shape` exactly.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> UltraFaceResult<Self> {
        check_rank(&shape)?;
        let expected = element_count(&shape)?;
        if data.len() < expected {
            return Err(UltraFaceError::BufferTooSmall {
                needed: expected,
                got: data.len(),
            });
        }
        if data.len() > expected {
            return Err(UltraFaceError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Allocates a zero-filled tensor.
    pub fn zeros(shape: Vec<usize>) -> UltraFaceResult<Self> {
        check_rank(&shape)?;
        let len = element_count(&shape)?;
        Ok(Self {
            data: vec![0.0; len],
            shape,
        })
    }

    /// Returns the tensor shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the contiguous element buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the tensor and returns its buffer.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Returns a borrowed view of the tensor.
    pub fn view(&self) -> TensorView<'_> {
        let mut shape = [0usize; MAX_RANK];
        shape[..self.shape.len()].copy_from_slice(&self.shape);
        TensorView {
            data: &self.data,
            rank: self.shape.len(),
            shape,
            strides: row_major_strides(&self.shape),
        }
    }
}

fn check_rank(shape: &[usize]) -> UltraFaceResult<()> {
    if shape.is_empty() || shape.len() > MAX_RANK {
        return Err(UltraFaceError::InvalidShape {
            context: "tensor",
            expected: "rank between 1 and 4",
            got: shape.to_vec(),
        });
    }
    Ok(())
}

fn element_count(shape: &[usize]) -> UltraFaceResult<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| UltraFaceError::InvalidShape {
            context: "tensor",
            expected: "element count that fits in usize",
            got: shape.to_vec(),
        })
}

fn contiguous_strides(shape: &[usize]) -> UltraFaceResult<[usize; MAX_RANK]> {
    check_rank(shape)?;
    element_count(shape)?;
    Ok(row_major_strides(shape))
}

/// Row-major strides for a shape already checked by `check_rank`.
fn row_major_strides(shape: &[usize]) -> [usize; MAX_RANK] {
    let mut strides = [0usize; MAX_RANK];
    let mut acc = 1usize;
    for axis in (0..shape.len()).rev() {
        strides[axis] = acc;
        acc = acc.saturating_mul(shape[axis]);
    }
    strides
}

/// Smallest buffer length that covers every in-bounds index.
fn required_len(shape: &[usize], strides: &[usize]) -> UltraFaceResult<usize> {
    if shape.contains(&0) {
        return Ok(0);
    }
    let overflow = || UltraFaceError::InvalidShape {
        context: "tensor",
        expected: "addressable extent that fits in usize",
        got: shape.to_vec(),
    };
    let mut last = 0usize;
    for (&dim, &stride) in shape.iter().zip(strides) {
        let span = (dim - 1).checked_mul(stride).ok_or_else(overflow)?;
        last = last.checked_add(span).ok_or_else(overflow)?;
    }
    last.checked_add(1).ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::{required_len, Tensor, TensorView};

    #[test]
    fn required_len_covers_last_element() {
        assert_eq!(required_len(&[1, 3, 2], &[6, 2, 1]).unwrap(), 6);
        assert_eq!(required_len(&[2, 2], &[4, 1]).unwrap(), 6);
        assert_eq!(required_len(&[1, 0, 4], &[0, 4, 1]).unwrap(), 0);
    }

    #[test]
    fn owned_view_uses_row_major_strides() {
        let tensor = Tensor::new((0..24).map(|v| v as f32).collect(), vec![1, 2, 3, 4]).unwrap();
        let view = tensor.view();
        assert_eq!(view.strides(), &[24, 12, 4, 1]);
        assert_eq!(view.get(&[0, 1, 2, 3]), Some(23.0));
        assert_eq!(view.get(&[0, 2, 0, 0]), None);
    }

    #[test]
    fn transposed_strides_read_column_major_data() {
        // 2x3 matrix stored column-major.
        let data = [0.0f32, 3.0, 1.0, 4.0, 2.0, 5.0];
        let view = TensorView::new(&data, &[2, 3], &[1, 2]).unwrap();
        assert_eq!(view.get(&[0, 2]), Some(2.0));
        assert_eq!(view.get(&[1, 0]), Some(3.0));
        assert_eq!(view.get(&[1, 2]), Some(5.0));
    }
}
