//! Checkpoint persistence: timestamped model-weight blobs plus JSON sidecars
//! for the class vocabulary, the architecture config and run-state mappings.
//!
//! File naming convention inside the artifacts directory:
//!   checkpoint-20250114-093012.mpk   <- model weights (CompactRecorder)
//!   latest.json                      <- stem of the newest weight file
//!   classes.json                     <- class vocabulary
//!   model_config.json                <- architecture hyperparameters
//!   checkpoint-20250114-093012-state.json  <- run metadata / final metrics
//!
//! Lifecycle is create-on-save, read-on-load; nothing is ever deleted.

use crate::dataset::ClassVocab;
use crate::error::{Error, Result};
use crate::model::{Classifier, ClassifierConfig};
use burn::module::Module;
use burn::record::{CompactRecorder, Recorder};
use burn::tensor::backend::Backend;
use chrono::Utc;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

const LATEST_FILE: &str = "latest.json";
const VOCAB_FILE: &str = "classes.json";
const MODEL_CONFIG_FILE: &str = "model_config.json";

/// Run-state mapping saved next to the weights (final metrics, run metadata).
pub type StateMap = IndexMap<String, serde_json::Value>;

/// Manages saving and loading of checkpoints under one artifacts directory.
pub struct CheckpointStore {
    dir: PathBuf,
    prefix: String,
}

impl CheckpointStore {
    /// Creates a store rooted at `dir`, creating the directory if needed.
    pub fn new<P: Into<PathBuf>>(dir: P, prefix: &str) -> Self {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).ok();
        Self { dir, prefix: prefix.to_string() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn timestamp() -> String {
        Utc::now().format("%Y%m%d-%H%M%S").to_string()
    }

    /// Saves model weights as `<prefix>-<timestamp>.mpk` and updates the
    /// `latest.json` pointer.
    pub fn save_model<B: Backend>(&self, model: &Classifier<B>) -> Result<PathBuf> {
        let stem = format!("{}-{}", self.prefix, Self::timestamp());
        let path = self.dir.join(&stem);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .map_err(|e| {
                Error::CheckpointError(format!(
                    "failed to save weights to '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        let latest = self.dir.join(LATEST_FILE);
        std::fs::write(&latest, serde_json::to_string(&stem)?)
            .map_err(Error::IoError)?;

        log::debug!("Saved checkpoint '{}'", stem);
        Ok(path.with_extension("mpk"))
    }

    /// Restores the newest weights into a freshly built model.
    pub fn load_model<B: Backend>(
        &self,
        config: &ClassifierConfig,
        device: &B::Device,
    ) -> Result<Classifier<B>> {
        let stem = self.latest_stem()?;
        let path = self.dir.join(&stem);

        if !path.with_extension("mpk").exists() {
            return Err(Error::CheckpointNotFound { path: path.with_extension("mpk") });
        }

        let record = CompactRecorder::new().load(path.clone(), device).map_err(|e| {
            Error::CheckpointError(format!(
                "cannot load checkpoint '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(config.init(device).load_record(record))
    }

    /// Reads `latest.json`; a missing pointer means no training has run yet.
    fn latest_stem(&self) -> Result<String> {
        let path = self.dir.join(LATEST_FILE);
        if !path.exists() {
            return Err(Error::CheckpointNotFound { path });
        }
        let contents = std::fs::read_to_string(&path).map_err(Error::IoError)?;
        serde_json::from_str(&contents).map_err(Error::JsonError)
    }

    /// Whether a latest-checkpoint pointer exists.
    pub fn has_checkpoint(&self) -> bool {
        self.dir.join(LATEST_FILE).exists()
    }

    pub fn save_vocab(&self, vocab: &ClassVocab) -> Result<()> {
        let path = self.dir.join(VOCAB_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(vocab)?)
            .map_err(Error::IoError)
    }

    pub fn load_vocab(&self) -> Result<ClassVocab> {
        let path = self.dir.join(VOCAB_FILE);
        if !path.exists() {
            return Err(Error::CheckpointNotFound { path });
        }
        let contents = std::fs::read_to_string(&path).map_err(Error::IoError)?;
        serde_json::from_str(&contents).map_err(Error::JsonError)
    }

    pub fn save_model_config(&self, config: &ClassifierConfig) -> Result<()> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(config)?)
            .map_err(Error::IoError)
    }

    pub fn load_model_config(&self) -> Result<ClassifierConfig> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        if !path.exists() {
            return Err(Error::CheckpointNotFound { path });
        }
        let contents = std::fs::read_to_string(&path).map_err(Error::IoError)?;
        serde_json::from_str(&contents).map_err(Error::JsonError)
    }

    /// Saves a run-state mapping to a timestamped JSON file.
    pub fn save_state(&self, state: &StateMap) -> Result<PathBuf> {
        let path = self
            .dir
            .join(format!("{}-{}-state.json", self.prefix, Self::timestamp()));
        std::fs::write(&path, serde_json::to_string_pretty(state)?)
            .map_err(Error::IoError)?;
        Ok(path)
    }

    /// Loads a run-state mapping back from disk.
    ///
    /// # Errors
    /// * `Error::CheckpointNotFound` when the path does not exist.
    pub fn load_state<P: AsRef<Path>>(path: P) -> Result<StateMap> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::CheckpointNotFound { path: path.to_path_buf() });
        }
        let contents = std::fs::read_to_string(path).map_err(Error::IoError)?;
        serde_json::from_str(&contents).map_err(Error::JsonError)
    }
}
