//! visionbake is a computer-vision project template: generation-time hooks
//! that finalize a scaffolded project tree, plus the starter training,
//! export and inference-serving skeleton the template produces.

/// Checkpoint persistence: timestamped weight blobs plus JSON sidecars
pub mod checkpoint;

/// Command-line interface for the train/export/serve subcommands
pub mod cli;

/// Experiment configuration loaded from a YAML document
pub mod config;

/// Hook payload parsing and feature-flag interpretation
pub mod context;

/// ImageFolder-style dataset scanning and batching
pub mod dataset;

/// Error types and handling for the whole crate
pub mod error;

/// Export of the latest checkpoint to a portable artifact
pub mod export;

/// Pre and post generation hook processing
/// Handles the logic behind:
/// - the pre-gen-project binary
/// - the post-gen-project binary
pub mod hooks;

/// Logger configuration
pub mod logger;

/// The convolutional classifier and its configuration
pub mod model;

/// User input and interaction handling
pub mod prompt;

/// HTTP inference service (health check + prediction endpoint)
pub mod service;

/// Training loop over the burn autodiff backend
pub mod training;

/// Image loading and preprocessing
pub mod vision;
