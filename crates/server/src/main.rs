mod api;
mod server;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use facematch_core::acquisition::infrastructure::http_downloader::HttpDownloader;
use facematch_core::acquisition::input_acquirer::InputAcquirer;
use facematch_core::evaluation::match_evaluator::MatchEvaluator;
use facematch_core::pipeline::compare_faces_use_case::CompareFacesUseCase;
use facematch_core::sampling::frame_sampler::FrameSampler;
use facematch_core::shared::constants::{
    ARCFACE_MODEL_NAME, ARCFACE_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use facematch_core::verification::domain::face_verifier::FaceVerifier;
use facematch_core::verification::infrastructure::embedding_face_verifier::EmbeddingFaceVerifier;
use facematch_core::verification::infrastructure::model_resolver;
use facematch_core::verification::infrastructure::onnx_arcface_embedder::OnnxArcFaceEmbedder;
use facematch_core::verification::infrastructure::onnx_yolo_face_locator::OnnxYoloFaceLocator;
use facematch_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use facematch_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// HTTP service that checks whether the face in a reference image appears
/// in a video.
#[derive(Parser)]
#[command(name = "facematch-server")]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Keep every Nth video frame.
    #[arg(long, env = "SAMPLE_INTERVAL", default_value = "10")]
    sample_interval: usize,

    /// Stop sampling after this many frames.
    #[arg(long, env = "MAX_SAMPLED_FRAMES")]
    max_sampled_frames: Option<usize>,

    /// Cosine distance at or below which two faces match (0.0-2.0).
    #[arg(long, env = "MATCH_THRESHOLD", default_value = "0.68")]
    threshold: f64,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, env = "DETECTION_CONFIDENCE", default_value = "0.25")]
    confidence: f64,

    /// Fail a frame when no face is detected instead of comparing the
    /// whole image.
    #[arg(long, env = "ENFORCE_DETECTION")]
    enforce_detection: bool,

    /// Directory for downloads and sampled frames [default: <tmp>/facematch].
    #[arg(long, env = "WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// Base directory for relative local paths in requests.
    #[arg(long, env = "MEDIA_ROOT")]
    media_root: Option<PathBuf>,

    /// Directory holding pre-downloaded ONNX models.
    #[arg(long, env = "MODELS_DIR")]
    models_dir: Option<PathBuf>,

    /// Timeout in seconds for fetching remote media.
    #[arg(long, env = "DOWNLOAD_TIMEOUT_SECS")]
    download_timeout: Option<u64>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let work_dir = cli
        .work_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("facematch"));
    std::fs::create_dir_all(&work_dir).map_err(|e| {
        format!(
            "Cannot create work directory {}: {e}",
            work_dir.display()
        )
    })?;

    let verifier = build_verifier(&cli)?;
    let mut use_case = build_use_case(&cli, verifier, work_dir)?;

    let addr = format!("{}:{}", cli.host, cli.port);
    server::serve(&addr, &mut use_case)?;
    Ok(())
}

fn build_use_case(
    cli: &Cli,
    verifier: Box<dyn FaceVerifier>,
    work_dir: PathBuf,
) -> Result<CompareFacesUseCase, Box<dyn std::error::Error>> {
    let downloader = HttpDownloader::new(cli.download_timeout.map(Duration::from_secs))?;
    let acquirer = InputAcquirer::new(downloader, work_dir.clone(), cli.media_root.clone());
    let sampler = FrameSampler::new(
        Box::new(FfmpegReader::new()),
        Box::new(ImageFileWriter::new()),
        cli.sample_interval,
        cli.max_sampled_frames,
        work_dir.clone(),
    )?;
    log::info!(
        "Sampling every {} frames into {}",
        sampler.interval(),
        work_dir.display()
    );
    Ok(CompareFacesUseCase::new(
        acquirer,
        sampler,
        MatchEvaluator::new(verifier),
        work_dir,
    ))
}

fn build_verifier(cli: &Cli) -> Result<Box<dyn FaceVerifier>, Box<dyn std::error::Error>> {
    let locator_path = resolve_model(YOLO_MODEL_NAME, YOLO_MODEL_URL, cli.models_dir.as_deref())?;
    let embedder_path =
        resolve_model(ARCFACE_MODEL_NAME, ARCFACE_MODEL_URL, cli.models_dir.as_deref())?;

    let locator = OnnxYoloFaceLocator::new(&locator_path, cli.confidence)?;
    let embedder = OnnxArcFaceEmbedder::new(&embedder_path)?;
    Ok(Box::new(
        EmbeddingFaceVerifier::new(Box::new(locator), Box::new(embedder))
            .with_threshold(cli.threshold)
            .with_enforce_detection(cli.enforce_detection),
    ))
}

fn resolve_model(
    name: &'static str,
    url: &str,
    models_dir: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let path = model_resolver::resolve(
        name,
        url,
        models_dir,
        Some(Box::new(move |downloaded, total| {
            download_progress(name, downloaded, total)
        })),
    )?;
    log::info!("Using {}", path.display());
    Ok(path)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.sample_interval < 1 {
        return Err(format!(
            "Sample interval must be at least 1, got {}",
            cli.sample_interval
        )
        .into());
    }
    if cli.max_sampled_frames == Some(0) {
        return Err("Max sampled frames must be at least 1".into());
    }
    if !(0.0..=2.0).contains(&cli.threshold) {
        return Err(format!(
            "Threshold must be between 0.0 and 2.0, got {}",
            cli.threshold
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if let Some(root) = &cli.media_root {
        if !root.is_dir() {
            return Err(format!("Media root is not a directory: {}", root.display()).into());
        }
    }
    Ok(())
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
}
