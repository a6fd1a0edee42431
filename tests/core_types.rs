use ultraface::{BoxTensor, Rect, ScoreTensor, Tensor, TensorView, UltraFaceError};

#[test]
fn tensor_view_rejects_invalid_rank() {
    let data = [0.0f32; 4];

    let err = TensorView::from_slice(&data, &[]).err().unwrap();
    assert!(matches!(err, UltraFaceError::InvalidShape { .. }));

    let err = TensorView::from_slice(&data, &[1, 1, 1, 2, 2]).err().unwrap();
    assert!(matches!(err, UltraFaceError::InvalidShape { .. }));
}

#[test]
fn tensor_view_rejects_small_buffer() {
    let data = [0.0f32; 5];
    let err = TensorView::from_slice(&data, &[1, 3, 2]).err().unwrap();
    assert!(matches!(
        err,
        UltraFaceError::BufferTooSmall { needed: 6, got: 5 }
    ));
}

#[test]
fn tensor_view_rejects_mismatched_strides() {
    let data = [0.0f32; 6];
    let err = TensorView::new(&data, &[1, 3, 2], &[6, 2]).err().unwrap();
    assert!(matches!(err, UltraFaceError::InvalidShape { .. }));
}

#[test]
fn padded_rows_are_skipped_by_strides() {
    // Two rows of two values, each row padded to three elements.
    let data = [1.0f32, 2.0, -1.0, 3.0, 4.0, -1.0];
    let view = TensorView::new(&data, &[2, 2], &[3, 1]).unwrap();
    assert_eq!(view.get(&[0, 1]), Some(2.0));
    assert_eq!(view.get(&[1, 0]), Some(3.0));
    assert_eq!(view.get(&[1, 2]), None);
    assert_eq!(view.get(&[0]), None);
}

#[test]
fn owned_tensor_requires_exact_length() {
    let err = Tensor::new(vec![0.0; 7], vec![1, 3, 2]).err().unwrap();
    assert!(matches!(
        err,
        UltraFaceError::BufferLength {
            expected: 6,
            got: 7
        }
    ));
    let zeros = Tensor::zeros(vec![1, 3, 2]).unwrap();
    assert_eq!(zeros.data().len(), 6);
}

#[test]
fn score_tensor_checks_layout() {
    let tensor = Tensor::new(vec![0.0; 9], vec![1, 3, 3]).unwrap();
    let err = ScoreTensor::new(tensor.view()).err().unwrap();
    match err {
        UltraFaceError::InvalidShape { context, got, .. } => {
            assert_eq!(context, "score tensor");
            assert_eq!(got, vec![1, 3, 3]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let tensor = Tensor::new(vec![0.0; 12], vec![2, 3, 2]).unwrap();
    assert!(ScoreTensor::new(tensor.view()).is_err());
}

#[test]
fn box_tensor_reads_rows() {
    let tensor = Tensor::new(
        vec![0.1, 0.7, 0.3, 0.9, 0.6, 0.1, 0.8, 0.3],
        vec![1, 2, 4],
    )
    .unwrap();
    let boxes = BoxTensor::new(tensor.view()).unwrap();
    assert_eq!(boxes.num_candidates(), 2);
    assert_eq!(boxes.raw_box(1).unwrap().to_row(), [0.6, 0.1, 0.8, 0.3]);
    assert!(matches!(
        boxes.raw_box(2).err().unwrap(),
        UltraFaceError::IndexOutOfBounds {
            index: 2,
            len: 2,
            ..
        }
    ));
}

#[test]
fn empty_candidate_axis_is_valid() {
    let tensor = Tensor::new(Vec::new(), vec![1, 0, 2]).unwrap();
    let scores = ScoreTensor::new(tensor.view()).unwrap();
    assert_eq!(scores.num_candidates(), 0);
}

#[test]
fn rect_keeps_min_max_invariant() {
    let rect = Rect::from_origin_size(0.5, 0.5, -0.25, -0.5);
    assert_eq!(rect.x_min(), 0.25);
    assert_eq!(rect.x_max(), 0.5);
    assert_eq!(rect.y_min(), 0.0);
    assert_eq!(rect.y_max(), 0.5);
    assert!(rect.width() >= 0.0 && rect.height() >= 0.0);
}
