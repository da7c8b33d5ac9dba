//! Model export: re-saves the newest checkpoint as a portable
//! full-precision artifact plus a JSON sidecar describing the model.

use crate::checkpoint::CheckpointStore;
use crate::error::{Error, Result};
use crate::model::Classifier;
use burn::backend::ndarray::{NdArray, NdArrayDevice};
use burn::module::Module;
use burn::record::{BinFileRecorder, FullPrecisionSettings, Recorder};
use std::path::{Path, PathBuf};

/// Exports the latest checkpoint to `<output>.bin` and `<output>.json`.
///
/// # Errors
/// * `Error::CheckpointNotFound` when no training run has produced weights.
pub fn export_model<P: AsRef<Path>>(store: &CheckpointStore, output: P) -> Result<PathBuf> {
    let output = output.as_ref();
    let device = NdArrayDevice::Cpu;

    let config = store.load_model_config()?;
    let vocab = store.load_vocab()?;
    let model: Classifier<NdArray> = store.load_model(&config, &device)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(Error::IoError)?;
        }
    }

    BinFileRecorder::<FullPrecisionSettings>::new()
        .record(model.into_record(), output.to_path_buf())
        .map_err(|e| {
            Error::CheckpointError(format!(
                "failed to export weights to '{}': {}",
                output.display(),
                e
            ))
        })?;

    let sidecar = serde_json::json!({
        "model": config,
        "classes": vocab,
    });
    std::fs::write(output.with_extension("json"), serde_json::to_string_pretty(&sidecar)?)
        .map_err(Error::IoError)?;

    Ok(output.with_extension("bin"))
}
