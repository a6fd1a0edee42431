#![cfg(feature = "rayon")]

use ultraface::{
    ArrayFeature, FaceModel, Feature, ImageFeature, InferenceError, ModelInputSpec, PixelFormat,
    Tensor, TensorView, UltraFaceError, UltraFacePredictor,
};

/// Emits one face per bright input: the box follows the mean input value.
struct BrightnessModel {
    spec: ModelInputSpec,
}

impl FaceModel for BrightnessModel {
    fn input_spec(&self) -> ModelInputSpec {
        self.spec
    }

    fn infer(&self, input: TensorView<'_>) -> Result<Vec<Tensor>, InferenceError> {
        let data = input.as_slice();
        let mean = data.iter().sum::<f32>() / data.len() as f32;
        let offset = (mean.abs() * 0.1).min(0.5);
        let scores = Tensor::new(vec![0.1, 0.9, 0.6, 0.4], vec![1, 2, 2])?;
        let boxes = Tensor::new(
            vec![
                offset,
                offset,
                offset + 0.2,
                offset + 0.2,
                0.5,
                0.5,
                0.6,
                0.6,
            ],
            vec![1, 2, 4],
        )?;
        Ok(vec![scores, boxes])
    }
}

#[test]
fn batch_matches_sequential_predictions() {
    let spec = ModelInputSpec {
        width: 16,
        height: 12,
        ..ModelInputSpec::default()
    };
    let predictor = UltraFacePredictor::new(BrightnessModel { spec });

    let mut features: Vec<Feature> = (0..12u8)
        .map(|k| {
            let value = k.wrapping_mul(21);
            ImageFeature::new(vec![value; 20 * 10 * 3], 20, 10, PixelFormat::Rgb8)
                .unwrap()
                .into()
        })
        .collect();
    features.push(ArrayFeature::generic(Tensor::zeros(vec![1, 4]).unwrap()).into());

    let batch = predictor.predict_batch(&features);
    assert_eq!(batch.len(), features.len());
    for (feature, result) in features.iter().zip(batch) {
        let sequential = predictor.predict(std::slice::from_ref(feature));
        match (result, sequential) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
            (a, b) => panic!("batch {a:?} differs from sequential {b:?}"),
        }
    }
    assert!(matches!(
        predictor.predict_batch(&features[12..])[0],
        Err(UltraFaceError::InvalidArgument(_))
    ));
}
