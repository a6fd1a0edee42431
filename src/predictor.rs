//! The face predictor: validation, inference and post-processing.
//!
//! [`UltraFacePredictor`] owns a [`FaceModel`] and a [`PredictorConfig`].
//! Each `predict` call validates its single input, converts it into the
//! model's input tensor, runs inference, decodes candidates above
//! `min_score` and suppresses overlaps above `max_iou`. Calls share nothing
//! but the immutable model and config.

use crate::candidate::{decode, suppress};
use crate::feature::resample::prepare_input;
use crate::feature::Feature;
use crate::geometry::{CoordinateTransform, Rect};
use crate::model::{FaceModel, BOXES_OUTPUT, SCORES_OUTPUT};
use crate::tensor::{BoxTensor, ScoreTensor, Tensor};
use crate::trace::{trace_event, trace_span};
use crate::util::math::check_unit_interval;
use crate::util::{UltraFaceError, UltraFaceResult};

/// Thresholds for candidate filtering and overlap removal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictorConfig {
    /// Minimum face score for a candidate to be decoded.
    pub min_score: f32,
    /// Maximum IoU a lower-scoring box may have with a kept box.
    pub max_iou: f32,
    /// Optional cap on the number of returned faces, applied after suppression.
    pub max_detections: Option<usize>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_score: 0.5,
            max_iou: 0.5,
            max_detections: None,
        }
    }
}

impl PredictorConfig {
    /// Checks both thresholds lie in `[0, 1]`.
    pub fn validate(&self) -> UltraFaceResult<()> {
        check_unit_interval("min_score", self.min_score)?;
        check_unit_interval("max_iou", self.max_iou)?;
        Ok(())
    }
}

/// A kept face with its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub rect: Rect,
    pub score: f32,
}

/// Decodes, suppresses and caps raw detector outputs.
///
/// This is the model-free half of [`UltraFacePredictor::predict`], for
/// callers that run inference themselves. Detections are returned highest
/// score first.
pub fn decode_and_suppress(
    scores: ScoreTensor<'_>,
    boxes: BoxTensor<'_>,
    cfg: &PredictorConfig,
    transform: &CoordinateTransform,
) -> UltraFaceResult<Vec<Detection>> {
    cfg.validate()?;
    let candidates = decode(scores, boxes, cfg.min_score, transform)?;
    let keep = suppress(&candidates, cfg.max_iou)?;
    let limit = cfg.max_detections.unwrap_or(usize::MAX);
    Ok(keep
        .into_iter()
        .take(limit)
        .map(|idx| Detection {
            rect: candidates[idx].rect,
            score: candidates[idx].score,
        })
        .collect())
}

/// UltraFace face detector front end.
pub struct UltraFacePredictor<M> {
    model: M,
    cfg: PredictorConfig,
}

impl<M: FaceModel> UltraFacePredictor<M> {
    /// Creates a predictor with the default thresholds.
    pub fn new(model: M) -> Self {
        Self {
            model,
            cfg: PredictorConfig::default(),
        }
    }

    /// Replaces the thresholds.
    pub fn with_config(mut self, cfg: PredictorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.cfg
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Detects faces and returns their rectangles, highest score first.
    ///
    /// Rectangles are normalized to the source image when the input is an
    /// image feature, and to the model input otherwise.
    pub fn predict(&self, inputs: &[Feature]) -> UltraFaceResult<Vec<Rect>> {
        Ok(self
            .predict_detections(inputs)?
            .into_iter()
            .map(|det| det.rect)
            .collect())
    }

    /// Like [`predict`](Self::predict) but keeps the face scores.
    pub fn predict_detections(&self, inputs: &[Feature]) -> UltraFaceResult<Vec<Detection>> {
        let _span = trace_span!("predict").entered();

        let input = match inputs {
            [single] => single,
            _ => {
                return Err(UltraFaceError::InvalidArgument(
                    "UltraFace predictor expects a single feature",
                ))
            }
        };
        if !input.is_image() {
            return Err(UltraFaceError::InvalidArgument(
                "UltraFace predictor expects an array or image feature",
            ));
        }
        self.cfg.validate()?;

        let spec = self.model.input_spec();
        let prepared = prepare_input(input, &spec)?;
        let outputs = self
            .model
            .infer(prepared.tensor.view())
            .map_err(UltraFaceError::Inference)?;

        let scores = ScoreTensor::new(output_at(&outputs, SCORES_OUTPUT)?.view())?;
        let boxes = BoxTensor::new(output_at(&outputs, BOXES_OUTPUT)?.view())?;
        let detections = decode_and_suppress(scores, boxes, &self.cfg, &prepared.transform)?;

        trace_event!("faces", count = detections.len());
        Ok(detections)
    }

    /// Runs an independent single-feature prediction for every feature in parallel.
    #[cfg(feature = "rayon")]
    pub fn predict_batch(&self, features: &[Feature]) -> Vec<UltraFaceResult<Vec<Rect>>>
    where
        M: Sync,
    {
        use rayon::prelude::*;

        features
            .par_iter()
            .map(|feature| self.predict(std::slice::from_ref(feature)))
            .collect()
    }
}

fn output_at(outputs: &[Tensor], index: usize) -> UltraFaceResult<&Tensor> {
    outputs.get(index).ok_or(UltraFaceError::MissingOutput {
        index,
        got: outputs.len(),
    })
}
