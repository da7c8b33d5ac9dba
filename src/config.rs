//! Experiment configuration for the generated training skeleton.
//! One YAML document per run supplies data paths, batch size, optimizer
//! hyperparameters and the epoch count; the CLI can override the scalars.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_batch_size() -> usize {
    32
}

fn default_num_workers() -> usize {
    4
}

fn default_image_size() -> u32 {
    224
}

fn default_device() -> String {
    "cpu".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct TrainDataSection {
    root: PathBuf,
    #[serde(default = "default_batch_size")]
    batch_size: usize,
    #[serde(default = "default_num_workers")]
    num_workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelSection {
    #[serde(default = "ModelSection::default_backbone")]
    backbone: String,
    num_classes: usize,
    #[serde(default = "default_image_size")]
    image_size: u32,
}

impl ModelSection {
    fn default_backbone() -> String {
        "tinyconv".to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OptimizerSection {
    lr: f64,
    #[serde(default)]
    weight_decay: f64,
}

/// On-disk layout of `configs/training.yaml`.
#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    train_data: TrainDataSection,
    model: ModelSection,
    optimizer: OptimizerSection,
    max_epochs: usize,
    #[serde(default = "default_device")]
    device: String,
}

/// Flattened experiment configuration used by training, export and serving.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub data_root: PathBuf,
    pub batch_size: usize,
    pub num_workers: usize,
    pub backbone: String,
    pub num_classes: usize,
    pub image_size: u32,
    pub lr: f64,
    pub weight_decay: f64,
    pub max_epochs: usize,
    pub device: String,
}

impl ExperimentConfig {
    /// Loads and flattens a YAML configuration document.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parses a YAML configuration document from a string.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(contents).map_err(Error::YamlError)?;
        Ok(Self {
            data_root: raw.train_data.root,
            batch_size: raw.train_data.batch_size,
            num_workers: raw.train_data.num_workers,
            backbone: raw.model.backbone,
            num_classes: raw.model.num_classes,
            image_size: raw.model.image_size,
            lr: raw.optimizer.lr,
            weight_decay: raw.optimizer.weight_decay,
            max_epochs: raw.max_epochs,
            device: raw.device,
        })
    }

    /// Applies scalar CLI overrides on top of the loaded document.
    pub fn with_overrides(
        mut self,
        epochs: Option<usize>,
        lr: Option<f64>,
        batch_size: Option<usize>,
    ) -> Self {
        if let Some(epochs) = epochs {
            self.max_epochs = epochs;
        }
        if let Some(lr) = lr {
            self.lr = lr;
        }
        if let Some(batch_size) = batch_size {
            self.batch_size = batch_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
train_data:
  root: data/images
  batch_size: 16
model:
  num_classes: 3
  image_size: 64
optimizer:
  lr: 0.0003
  weight_decay: 0.05
max_epochs: 5
"#;

    #[test]
    fn test_parse_with_defaults() {
        let cfg = ExperimentConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cfg.data_root, PathBuf::from("data/images"));
        assert_eq!(cfg.batch_size, 16);
        assert_eq!(cfg.num_workers, 4);
        assert_eq!(cfg.backbone, "tinyconv");
        assert_eq!(cfg.num_classes, 3);
        assert_eq!(cfg.max_epochs, 5);
        assert_eq!(cfg.device, "cpu");
    }

    #[test]
    fn test_overrides() {
        let cfg = ExperimentConfig::from_yaml_str(SAMPLE)
            .unwrap()
            .with_overrides(Some(2), Some(0.01), None);
        assert_eq!(cfg.max_epochs, 2);
        assert_eq!(cfg.lr, 0.01);
        assert_eq!(cfg.batch_size, 16);
    }

    #[test]
    fn test_missing_required_field() {
        assert!(ExperimentConfig::from_yaml_str("max_epochs: 3").is_err());
    }
}
