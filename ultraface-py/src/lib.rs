//! Python bindings for the UltraFace post-processing library.
//!
//! Exposes decoding and suppression of raw detector outputs over NumPy
//! arrays. Inference itself stays on the Python side.

use numpy::{PyReadonlyArray1, PyReadonlyArray2, PyReadonlyArray3, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use ultraface::lowlevel::non_max_suppression as rust_nms;
use ultraface::{
    decode_and_suppress, AspectMode, BoxTensor, CoordinateTransform, Detection, PredictorConfig,
    Rect as RustRect, ScoreTensor, Tensor, UltraFaceError,
};

fn to_py_err(err: UltraFaceError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_aspect_mode(mode: &str) -> PyResult<AspectMode> {
    match mode.to_lowercase().as_str() {
        "scale_to_fit" => Ok(AspectMode::ScaleToFit),
        "aspect_fit" => Ok(AspectMode::AspectFit),
        "aspect_fill" => Ok(AspectMode::AspectFill),
        _ => Err(PyValueError::new_err(
            "aspect_mode must be 'scale_to_fit', 'aspect_fit' or 'aspect_fill'",
        )),
    }
}

/// Axis-aligned rectangle in normalized image coordinates.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Rect {
    inner: RustRect,
}

#[pymethods]
impl Rect {
    /// Create a rectangle from two corners. Corners are reordered so that
    /// min <= max on both axes.
    #[new]
    fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            inner: RustRect::from_min_max(x_min, y_min, x_max, y_max),
        }
    }

    #[getter]
    fn x_min(&self) -> f32 {
        self.inner.x_min()
    }

    #[getter]
    fn y_min(&self) -> f32 {
        self.inner.y_min()
    }

    #[getter]
    fn x_max(&self) -> f32 {
        self.inner.x_max()
    }

    #[getter]
    fn y_max(&self) -> f32 {
        self.inner.y_max()
    }

    #[getter]
    fn width(&self) -> f32 {
        self.inner.width()
    }

    #[getter]
    fn height(&self) -> f32 {
        self.inner.height()
    }

    fn area(&self) -> f32 {
        self.inner.area()
    }

    /// Intersection over union with another rectangle.
    fn iou(&self, other: &Rect) -> f32 {
        self.inner.iou(&other.inner)
    }

    fn __repr__(&self) -> String {
        format!(
            "Rect(x_min={:.4}, y_min={:.4}, x_max={:.4}, y_max={:.4})",
            self.inner.x_min(),
            self.inner.y_min(),
            self.inner.x_max(),
            self.inner.y_max()
        )
    }
}

/// A detected face: rectangle plus face score.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Face {
    rect: RustRect,
    /// Face-class score in [0, 1].
    #[pyo3(get)]
    score: f32,
}

#[pymethods]
impl Face {
    #[getter]
    fn rect(&self) -> Rect {
        Rect { inner: self.rect }
    }

    fn __repr__(&self) -> String {
        format!(
            "Face(x_min={:.4}, y_min={:.4}, x_max={:.4}, y_max={:.4}, score={:.4})",
            self.rect.x_min(),
            self.rect.y_min(),
            self.rect.x_max(),
            self.rect.y_max(),
            self.score
        )
    }
}

impl From<Detection> for Face {
    fn from(d: Detection) -> Self {
        Self {
            rect: d.rect,
            score: d.score,
        }
    }
}

fn tensor_from_array(array: &PyReadonlyArray3<'_, f32>) -> PyResult<Tensor> {
    let shape = array.shape().to_vec();
    let data = array.as_slice()?.to_vec();
    Tensor::new(data, shape).map_err(to_py_err)
}

/// Decode and suppress raw UltraFace outputs.
///
/// Args:
///     scores: float32 array of shape (1, P, 2), softmax class scores
///     boxes: float32 array of shape (1, P, 4), raw box rows
///     min_score: Minimum face score (default: 0.5)
///     max_iou: Maximum overlap between kept faces (default: 0.5)
///     max_detections: Optional cap on returned faces (default: None)
///     source_size: Optional (width, height) of the source image; faces are
///         then mapped into source coordinates
///     model_size: (width, height) of the model input (default: (320, 240))
///     aspect_mode: "scale_to_fit", "aspect_fit" or "aspect_fill"
///
/// Returns:
///     List of Face, highest score first
#[pyfunction]
#[pyo3(signature = (
    scores,
    boxes,
    min_score = 0.5,
    max_iou = 0.5,
    max_detections = None,
    source_size = None,
    model_size = (320, 240),
    aspect_mode = "scale_to_fit"
))]
#[allow(clippy::too_many_arguments)]
fn decode_faces(
    scores: PyReadonlyArray3<'_, f32>,
    boxes: PyReadonlyArray3<'_, f32>,
    min_score: f32,
    max_iou: f32,
    max_detections: Option<usize>,
    source_size: Option<(usize, usize)>,
    model_size: (usize, usize),
    aspect_mode: &str,
) -> PyResult<Vec<Face>> {
    let aspect_mode = parse_aspect_mode(aspect_mode)?;
    let scores = tensor_from_array(&scores)?;
    let boxes = tensor_from_array(&boxes)?;
    let score_view = ScoreTensor::new(scores.view()).map_err(to_py_err)?;
    let box_view = BoxTensor::new(boxes.view()).map_err(to_py_err)?;

    let transform = match source_size {
        Some(source) => {
            CoordinateTransform::letterbox(aspect_mode, source, model_size).map_err(to_py_err)?
        }
        None => CoordinateTransform::Identity,
    };
    let cfg = PredictorConfig {
        min_score,
        max_iou,
        max_detections,
    };
    let detections =
        decode_and_suppress(score_view, box_view, &cfg, &transform).map_err(to_py_err)?;
    Ok(detections.into_iter().map(Face::from).collect())
}

/// Greedy non-maximum suppression.
///
/// Args:
///     boxes: float32 array of shape (N, 4) as (x_min, y_min, x_max, y_max)
///     scores: float32 array of shape (N,)
///     max_iou: Boxes overlapping a kept box by more than this are dropped
///
/// Returns:
///     Indices of kept boxes, highest score first
#[pyfunction]
#[pyo3(signature = (boxes, scores, max_iou = 0.5))]
fn non_max_suppression(
    boxes: PyReadonlyArray2<'_, f32>,
    scores: PyReadonlyArray1<'_, f32>,
    max_iou: f32,
) -> PyResult<Vec<usize>> {
    let shape = boxes.shape();
    if shape[1] != 4 {
        return Err(PyValueError::new_err("boxes must have shape (N, 4)"));
    }
    let data = boxes.as_slice()?;
    let rects: Vec<RustRect> = data
        .chunks_exact(4)
        .map(|row| RustRect::from_min_max(row[0], row[1], row[2], row[3]))
        .collect();
    let scores = scores.as_slice()?;
    rust_nms(&rects, scores, max_iou).map_err(to_py_err)
}

/// Python module for UltraFace post-processing.
#[pymodule]
fn _ultraface(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Rect>()?;
    m.add_class::<Face>()?;
    m.add_function(wrap_pyfunction!(decode_faces, m)?)?;
    m.add_function(wrap_pyfunction!(non_max_suppression, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
