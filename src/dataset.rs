//! ImageFolder-style dataset and batching.
//!
//! Layout: `root/{train,val}/<class_name>/*.{jpg,jpeg,png}`. Classes are the
//! sorted subdirectory names of the train split; the resulting vocabulary is
//! persisted alongside checkpoints so serving can label predictions.

use crate::error::{Error, Result};
use crate::vision;
use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use burn::tensor::{backend::Backend, Int, Tensor, TensorData};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Ordered mapping between class names and label indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassVocab {
    classes: Vec<String>,
}

impl ClassVocab {
    /// Builds a vocabulary from the subdirectory names of a split.
    pub fn scan<P: AsRef<Path>>(root: P, split: &str) -> Result<Self> {
        let split_dir = root.as_ref().join(split);
        let entries = std::fs::read_dir(&split_dir).map_err(|e| {
            Error::DatasetError(format!("cannot read '{}': {}", split_dir.display(), e))
        })?;

        let mut classes: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        classes.sort();

        if classes.is_empty() {
            return Err(Error::DatasetError(format!(
                "no class directories found under '{}'",
                split_dir.display()
            )));
        }
        Ok(Self { classes })
    }

    pub fn from_classes(mut classes: Vec<String>) -> Self {
        classes.sort();
        Self { classes }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == name)
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One training sample: an image path and its class index.
#[derive(Debug, Clone)]
pub struct ImageItem {
    pub path: PathBuf,
    pub label: usize,
}

/// Dataset over one split of an ImageFolder tree.
pub struct ImageFolderDataset {
    items: Vec<ImageItem>,
}

impl ImageFolderDataset {
    /// Collects every image under `root/<split>/<class>/`, labelled by the
    /// vocabulary. Files with unknown extensions are skipped.
    pub fn from_split<P: AsRef<Path>>(
        root: P,
        split: &str,
        vocab: &ClassVocab,
    ) -> Result<Self> {
        let split_dir = root.as_ref().join(split);
        let mut items = Vec::new();

        for class in &vocab.classes {
            let label = vocab.index_of(class).unwrap_or_default();
            let class_dir = split_dir.join(class);
            for entry in WalkDir::new(&class_dir).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_file() && has_image_extension(path) {
                    items.push(ImageItem { path: path.to_path_buf(), label });
                }
            }
        }

        if items.is_empty() {
            return Err(Error::DatasetError(format!(
                "no images found under '{}'",
                split_dir.display()
            )));
        }
        Ok(Self { items })
    }

    pub fn sample_count(&self) -> usize {
        self.items.len()
    }
}

impl Dataset<ImageItem> for ImageFolderDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// A batch of images ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Preprocessed images, shape `[batch_size, 3, size, size]`
    pub images: Tensor<B, 4>,
    /// Class indices, shape `[batch_size]`
    pub targets: Tensor<B, 1, Int>,
}

/// Loads and preprocesses images on the target device.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    device: B::Device,
    image_size: u32,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device, image_size: u32) -> Self {
        Self { device, image_size }
    }
}

impl<B: Backend> Batcher<ImageItem, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageItem>) -> ImageBatch<B> {
        let size = self.image_size as usize;
        let mut images = Vec::with_capacity(items.len());
        let mut targets = Vec::with_capacity(items.len());

        for item in &items {
            let tensor = match vision::load_image(&item.path) {
                Ok(img) => vision::preprocess::<B>(&img, self.image_size, &self.device),
                Err(e) => {
                    // An unreadable file must not abort the epoch; feed a
                    // blank image so batch and target stay aligned.
                    log::warn!("{}", e);
                    Tensor::zeros([3, size, size], &self.device)
                }
            };
            images.push(tensor);
            targets.push(item.label as i64);
        }

        let batch_size = items.len();
        ImageBatch {
            images: Tensor::stack(images, 0),
            targets: Tensor::from_data(TensorData::new(targets, [batch_size]), &self.device),
        }
    }
}
