use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use ultraface::lowlevel::{decode, image_to_tensor, suppress};
use ultraface::{
    decode_and_suppress, BoxTensor, CoordinateTransform, ImageFeature, ModelInputSpec,
    PixelFormat, PredictorConfig, ScoreTensor, Tensor,
};

/// Anchor count of the 320x240 UltraFace models.
const ANCHORS: usize = 4420;

/// Deterministic anchors with clustered high scores, similar to real output.
fn make_outputs(count: usize) -> (Tensor, Tensor) {
    let mut scores = Vec::with_capacity(count * 2);
    let mut boxes = Vec::with_capacity(count * 4);
    for i in 0..count {
        let cluster = (i % 17) as f32 / 17.0;
        let jitter = ((i * 31) % 97) as f32 / 970.0;
        let face = if i % 5 == 0 { 0.6 + jitter * 3.0 } else { jitter };
        scores.extend_from_slice(&[1.0 - face, face]);
        let x = cluster * 0.8 + jitter * 0.1;
        let y = ((i % 13) as f32 / 13.0) * 0.8;
        boxes.extend_from_slice(&[x, 1.0 - (y + 0.15), x + 0.15, 1.0 - y]);
    }
    (
        Tensor::new(scores, vec![1, count, 2]).unwrap(),
        Tensor::new(boxes, vec![1, count, 4]).unwrap(),
    )
}

fn bench_postprocess(c: &mut Criterion) {
    let (scores, boxes) = make_outputs(ANCHORS);
    let score_view = ScoreTensor::new(scores.view()).unwrap();
    let box_view = BoxTensor::new(boxes.view()).unwrap();
    let cfg = PredictorConfig::default();

    c.bench_function("decode_4420", |b| {
        b.iter(|| {
            black_box(
                decode(
                    score_view,
                    box_view,
                    cfg.min_score,
                    &CoordinateTransform::Identity,
                )
                .unwrap(),
            )
        });
    });

    let candidates = decode(
        score_view,
        box_view,
        cfg.min_score,
        &CoordinateTransform::Identity,
    )
    .unwrap();
    c.bench_function("suppress_decoded", |b| {
        b.iter(|| black_box(suppress(&candidates, cfg.max_iou).unwrap()));
    });

    c.bench_function("decode_and_suppress_4420", |b| {
        b.iter(|| {
            black_box(
                decode_and_suppress(score_view, box_view, &cfg, &CoordinateTransform::Identity)
                    .unwrap(),
            )
        });
    });
}

fn bench_preprocess(c: &mut Criterion) {
    let (width, height) = (640usize, 480usize);
    let pixels: Vec<u8> = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
    let image = ImageFeature::new(pixels, width, height, PixelFormat::Rgb8).unwrap();
    let spec = ModelInputSpec::default();

    c.bench_function("image_to_tensor_640x480_to_320x240", |b| {
        b.iter(|| black_box(image_to_tensor(&image, &spec).unwrap()));
    });
}

criterion_group!(benches, bench_postprocess, bench_preprocess);
criterion_main!(benches);
