//! UltraFace turns the raw outputs of the UltraFace lightweight face
//! detector into a clean list of face rectangles.
//!
//! The network itself is an injected [`FaceModel`]. This crate covers what
//! happens around it: preparing an image feature as model input, decoding
//! the `(1, P, 2)` score and `(1, P, 4)` box tensors, mapping boxes back
//! through aspect-fit/fill letterboxing, and greedy IoU non-maximum
//! suppression. Optional features add `rayon` batch prediction, `image`
//! crate loaders (`image-io`) and `tracing` spans.

mod candidate;
pub mod feature;
pub mod geometry;
pub mod lowlevel;
pub mod model;
mod predictor;
pub mod tensor;
mod trace;
pub mod util;

pub use candidate::{Candidate, RawBox};
pub use feature::{ArrayFeature, ArrayType, Feature, ImageFeature, PixelFormat};
pub use geometry::{AspectMode, CoordinateTransform, Rect};
pub use model::{FaceModel, ModelInputSpec, Normalization, TensorLayout};
pub use predictor::{decode_and_suppress, Detection, PredictorConfig, UltraFacePredictor};
pub use tensor::{BoxTensor, ScoreTensor, Tensor, TensorView};
pub use util::{InferenceError, UltraFaceError, UltraFaceResult};

#[cfg(feature = "image-io")]
pub use feature::io;
