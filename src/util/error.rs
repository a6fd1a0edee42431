//! Error types for ultraface.

use thiserror::Error;

/// Result alias for ultraface operations.
pub type UltraFaceResult<T> = std::result::Result<T, UltraFaceError>;

/// Error raised by an external inference backend.
///
/// The predictor never inspects or retries it; it is handed back to the
/// caller as the `source` of [`UltraFaceError::Inference`].
pub type InferenceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while decoding detector outputs or running a predictor.
#[derive(Debug, Error)]
pub enum UltraFaceError {
    /// A caller precondition failed (input count, input type).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A tensor does not have the layout an operation requires.
    #[error("invalid shape for {context}: expected {expected}, got {got:?}")]
    InvalidShape {
        context: &'static str,
        expected: &'static str,
        got: Vec<usize>,
    },
    /// Score and box tensors disagree on the number of candidates.
    #[error("score tensor has {scores} candidates but box tensor has {boxes}")]
    ShapeMismatch { scores: usize, boxes: usize },
    /// The buffer backing a tensor or image is smaller than its shape implies.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The buffer backing a tensor or image is larger than its shape implies.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLength { expected: usize, got: usize },
    /// An index was outside the valid range for a container.
    #[error("index {index} out of bounds for {context} (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// Width or height is zero or overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A threshold lies outside `[0, 1]` or is NaN.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// The model returned fewer outputs than the decoder needs.
    #[error("model output {index} missing (model returned {got} outputs)")]
    MissingOutput { index: usize, got: usize },
    /// The external inference call failed.
    #[error("inference failed: {0}")]
    Inference(#[source] InferenceError),
    /// Image decoding or loading failed.
    #[cfg(feature = "image-io")]
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
