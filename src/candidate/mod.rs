//! Candidate extraction and pruning.
//!
//! Includes raw box decoding, score thresholding and IoU-based
//! non-maximum suppression.

mod decoder;
mod suppression;

pub use decoder::{decode, Candidate, RawBox};
pub use suppression::{non_max_suppression, suppress};
