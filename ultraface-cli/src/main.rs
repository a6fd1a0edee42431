use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ultraface::{
    decode_and_suppress, AspectMode, BoxTensor, CoordinateTransform, Detection, PredictorConfig,
    ScoreTensor, Tensor,
};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "UltraFace post-processing CLI (JSON config driven)"
)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
enum AspectModeConfig {
    #[default]
    ScaleToFit,
    AspectFit,
    AspectFill,
}

impl From<AspectModeConfig> for AspectMode {
    fn from(value: AspectModeConfig) -> Self {
        match value {
            AspectModeConfig::ScaleToFit => AspectMode::ScaleToFit,
            AspectModeConfig::AspectFit => AspectMode::AspectFit,
            AspectModeConfig::AspectFill => AspectMode::AspectFill,
        }
    }
}

/// A dumped model output: row-major data plus its shape.
#[derive(Debug, Deserialize)]
struct TensorJson {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl TensorJson {
    fn into_tensor(self) -> ultraface::UltraFaceResult<Tensor> {
        Tensor::new(self.data, self.shape)
    }
}

#[derive(Debug, Deserialize)]
struct OutputsJson {
    scores: TensorJson,
    boxes: TensorJson,
}

#[derive(Debug, Deserialize)]
struct SizeJson {
    width: usize,
    height: usize,
}

/// Source image geometry; when present, faces are mapped into source space.
#[derive(Debug, Deserialize)]
struct SourceJson {
    width: usize,
    height: usize,
    #[serde(default)]
    aspect_mode: AspectModeConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PostprocessJson {
    min_score: f32,
    max_iou: f32,
    max_detections: Option<usize>,
}

impl Default for PostprocessJson {
    fn default() -> Self {
        let cfg = PredictorConfig::default();
        Self {
            min_score: cfg.min_score,
            max_iou: cfg.max_iou,
            max_detections: cfg.max_detections,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    outputs_path: String,
    output_path: Option<String>,
    postprocess: PostprocessJson,
    model_input: SizeJson,
    source: Option<SourceJson>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            outputs_path: String::new(),
            output_path: None,
            postprocess: PostprocessJson::default(),
            model_input: SizeJson {
                width: 320,
                height: 240,
            },
            source: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FaceRecord {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
    score: f32,
}

impl From<Detection> for FaceRecord {
    fn from(value: Detection) -> Self {
        Self {
            x_min: value.rect.x_min(),
            y_min: value.rect.y_min(),
            x_max: value.rect.x_max(),
            y_max: value.rect.y_max(),
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    candidates: usize,
    faces: Vec<FaceRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("ultraface=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.outputs_path.is_empty() {
        return Err("outputs_path must be set in the config".into());
    }

    let outputs_text = fs::read_to_string(&config.outputs_path)?;
    let outputs: OutputsJson = serde_json::from_str(&outputs_text)?;
    let scores = outputs.scores.into_tensor()?;
    let boxes = outputs.boxes.into_tensor()?;
    let score_view = ScoreTensor::new(scores.view())?;
    let box_view = BoxTensor::new(boxes.view())?;

    let transform = match &config.source {
        Some(source) => CoordinateTransform::letterbox(
            source.aspect_mode.into(),
            (source.width, source.height),
            (config.model_input.width, config.model_input.height),
        )?,
        None => CoordinateTransform::Identity,
    };

    let cfg = PredictorConfig {
        min_score: config.postprocess.min_score,
        max_iou: config.postprocess.max_iou,
        max_detections: config.postprocess.max_detections,
    };
    let detections = decode_and_suppress(score_view, box_view, &cfg, &transform)?;

    tracing::info!(
        candidates = score_view.num_candidates(),
        faces = detections.len(),
        "post-processed {}",
        config.outputs_path
    );

    let output = Output {
        candidates: score_view.num_candidates(),
        faces: detections.into_iter().map(FaceRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
