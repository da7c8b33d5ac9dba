//! Training loop: AdamW over cross-entropy, one train and one validation
//! pass per epoch, reporting per-epoch losses through a callback.
//!
//! Training runs on `Autodiff<NdArray>`; validation uses `model.valid()` on
//! the inner backend so it pays no autodiff overhead.

use crate::checkpoint::{CheckpointStore, StateMap};
use crate::config::ExperimentConfig;
use crate::dataset::{ClassVocab, ImageBatcher, ImageFolderDataset};
use crate::error::{Error, Result};
use crate::model::ClassifierConfig;
use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};
use burn::data::dataloader::DataLoaderBuilder;
use burn::module::AutodiffModule;
use burn::nn::loss::CrossEntropyLossConfig;
use burn::optim::{AdamWConfig, GradientsParams, Optimizer};
use burn::tensor::ElementConversion;
use serde::Serialize;

type TrainBackend = Autodiff<NdArray>;
type ValidBackend = NdArray;

/// Losses observed during one epoch.
#[derive(Debug, Clone, Serialize)]
pub struct EpochReport {
    pub epoch: usize,
    pub train_loss: f64,
    pub val_loss: f64,
}

/// Maps the configured device name onto the ndarray backend.
///
/// The backend is CPU-only; anything else falls back with a warning rather
/// than failing the run.
pub fn resolve_device(name: &str) -> NdArrayDevice {
    if name != "cpu" {
        log::warn!(
            "Device '{}' is not available with the ndarray backend; using cpu.",
            name
        );
    }
    NdArrayDevice::Cpu
}

/// Runs the full training loop and persists the final model, the class
/// vocabulary, the architecture config and a final-metrics state file.
pub fn train(
    cfg: &ExperimentConfig,
    store: &CheckpointStore,
    mut on_epoch: impl FnMut(&EpochReport),
) -> Result<Vec<EpochReport>> {
    let device = resolve_device(&cfg.device);

    let vocab = ClassVocab::scan(&cfg.data_root, "train")?;
    if vocab.len() > cfg.num_classes {
        return Err(Error::DatasetError(format!(
            "found {} classes but the model head has {} outputs",
            vocab.len(),
            cfg.num_classes
        )));
    }
    let train_dataset = ImageFolderDataset::from_split(&cfg.data_root, "train", &vocab)?;
    let val_dataset = ImageFolderDataset::from_split(&cfg.data_root, "val", &vocab)?;
    log::info!(
        "Dataset ready: {} train / {} val samples, {} classes",
        train_dataset.sample_count(),
        val_dataset.sample_count(),
        vocab.len()
    );

    if cfg.backbone != "tinyconv" {
        log::warn!("Unknown backbone '{}'; using the built-in tinyconv.", cfg.backbone);
    }
    let model_cfg = ClassifierConfig::new(cfg.num_classes);
    let mut model = model_cfg.init::<TrainBackend>(&device);

    let mut optim = AdamWConfig::new().with_weight_decay(cfg.weight_decay as f32).init();

    let train_criterion = CrossEntropyLossConfig::new().init(&device);
    let val_criterion = CrossEntropyLossConfig::new().init(&device);

    let train_loader = DataLoaderBuilder::new(ImageBatcher::<TrainBackend>::new(
        device.clone(),
        cfg.image_size,
    ))
    .batch_size(cfg.batch_size)
    .shuffle(42)
    .num_workers(cfg.num_workers)
    .build(train_dataset);

    let val_loader = DataLoaderBuilder::new(ImageBatcher::<ValidBackend>::new(
        device.clone(),
        cfg.image_size,
    ))
    .batch_size(cfg.batch_size)
    .num_workers(cfg.num_workers)
    .build(val_dataset);

    let mut reports = Vec::with_capacity(cfg.max_epochs);

    for epoch in 1..=cfg.max_epochs {
        let mut train_loss_sum = 0.0f64;
        let mut train_batches = 0usize;

        for batch in train_loader.iter() {
            let logits = model.forward(batch.images);
            let loss = train_criterion.forward(logits, batch.targets);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let val_model = model.valid();
        let mut val_loss_sum = 0.0f64;
        let mut val_batches = 0usize;

        for batch in val_loader.iter() {
            let logits = val_model.forward(batch.images);
            let loss = val_criterion.forward(logits, batch.targets);
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches += 1;
        }

        let report = EpochReport {
            epoch,
            train_loss: train_loss_sum / train_batches.max(1) as f64,
            val_loss: val_loss_sum / val_batches.max(1) as f64,
        };
        on_epoch(&report);
        reports.push(report);
    }

    let final_model = model.valid();
    let weights_path = store.save_model(&final_model)?;
    store.save_vocab(&vocab)?;
    store.save_model_config(&model_cfg)?;

    let mut state = StateMap::new();
    state.insert("epochs".into(), serde_json::json!(cfg.max_epochs));
    if let Some(last) = reports.last() {
        state.insert("final_train_loss".into(), serde_json::json!(last.train_loss));
        state.insert("final_val_loss".into(), serde_json::json!(last.val_loss));
    }
    store.save_state(&state)?;

    log::info!("Training finished; weights saved to '{}'", weights_path.display());
    Ok(reports)
}
