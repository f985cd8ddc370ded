use std::path::Path;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;

/// Opens an ONNX model with the platform's preferred execution provider,
/// falling back to CPU when that provider is unavailable.
pub(crate) fn build_session(model_path: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let intra_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_inter_threads(1)?
        .with_intra_threads(intra_threads)?
        .with_execution_providers(preferred_execution_providers())?
        .commit_from_file(model_path)?;
    Ok(session)
}

/// Fails when a run produced no output tensors, so callers can index the
/// first output safely.
pub(crate) fn require_outputs(count: usize, model: &str) -> Result<(), Box<dyn std::error::Error>> {
    if count == 0 {
        return Err(format!("{model} model produced no outputs").into());
    }
    Ok(())
}

/// Square NCHW input side length declared by the model, if static.
pub(crate) fn square_input_size(session: &Session) -> Option<usize> {
    session.inputs().first().and_then(|input| {
        if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
            if shape.len() >= 4 && shape[2] > 0 {
                return Some(shape[2] as usize);
            }
        }
        None
    })
}

fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}
