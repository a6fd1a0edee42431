//! Individual pipeline stages for custom post-processing.
//!
//! These expose decoding, suppression and input preparation separately from
//! [`UltraFacePredictor`](crate::UltraFacePredictor). Most users should call
//! the predictor or [`decode_and_suppress`](crate::decode_and_suppress).

pub use crate::candidate::{decode, non_max_suppression, suppress, Candidate, RawBox};
pub use crate::feature::resample::image_to_tensor;
pub use crate::model::{BOXES_OUTPUT, SCORES_OUTPUT};
pub use crate::tensor::FACE_CLASS;
