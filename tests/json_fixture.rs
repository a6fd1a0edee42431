use serde::Deserialize;
use ultraface::{
    decode_and_suppress, BoxTensor, CoordinateTransform, PredictorConfig, ScoreTensor, Tensor,
};

const FIXTURE: &str = r#"{
  "min_score": 0.6,
  "max_iou": 0.4,
  "scores": {
    "shape": [1, 5, 2],
    "data": [0.2, 0.8,  0.1, 0.9,  0.7, 0.3,  0.35, 0.65,  0.05, 0.95]
  },
  "boxes": {
    "shape": [1, 5, 4],
    "data": [
      0.10, 0.60, 0.30, 0.80,
      0.11, 0.61, 0.31, 0.81,
      0.50, 0.50, 0.60, 0.60,
      0.70, 0.10, 0.90, 0.30,
      0.40, 0.40, 0.55, 0.55
    ]
  },
  "expected": [
    { "score": 0.95, "rect": [0.40, 0.45, 0.55, 0.60] },
    { "score": 0.9,  "rect": [0.11, 0.19, 0.31, 0.39] },
    { "score": 0.65, "rect": [0.70, 0.70, 0.90, 0.90] }
  ]
}"#;

#[derive(Deserialize)]
struct TensorFixture {
    shape: Vec<usize>,
    data: Vec<f32>,
}

#[derive(Deserialize)]
struct ExpectedFace {
    score: f32,
    rect: [f32; 4],
}

#[derive(Deserialize)]
struct Fixture {
    min_score: f32,
    max_iou: f32,
    scores: TensorFixture,
    boxes: TensorFixture,
    expected: Vec<ExpectedFace>,
}

#[test]
fn dumped_outputs_match_expected_faces() {
    let fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
    let scores = Tensor::new(fixture.scores.data, fixture.scores.shape).unwrap();
    let boxes = Tensor::new(fixture.boxes.data, fixture.boxes.shape).unwrap();
    let cfg = PredictorConfig {
        min_score: fixture.min_score,
        max_iou: fixture.max_iou,
        max_detections: None,
    };

    let faces = decode_and_suppress(
        ScoreTensor::new(scores.view()).unwrap(),
        BoxTensor::new(boxes.view()).unwrap(),
        &cfg,
        &CoordinateTransform::Identity,
    )
    .unwrap();

    assert_eq!(faces.len(), fixture.expected.len());
    for (face, expected) in faces.iter().zip(&fixture.expected) {
        assert_eq!(face.score, expected.score);
        let got = [
            face.rect.x_min(),
            face.rect.y_min(),
            face.rect.x_max(),
            face.rect.y_max(),
        ];
        for (g, e) in got.iter().zip(expected.rect) {
            assert!((g - e).abs() < 1e-5, "expected {:?}, got {got:?}", expected.rect);
        }
    }
}
