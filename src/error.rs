//! Error handling for visionbake.
//! Defines the error types and results used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for visionbake operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors in the hook payload or configuration values
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// The user declined the final configuration confirmation
    #[error("Generation aborted: configuration was not confirmed.")]
    Declined,

    /// Represents errors in the training dataset layout
    #[error("Dataset error: {0}.")]
    DatasetError(String),

    /// A checkpoint file or pointer is missing
    #[error("Checkpoint '{path}' does not exist.")]
    CheckpointNotFound { path: PathBuf },

    /// Represents errors while recording or restoring model weights
    #[error("Checkpoint error: {0}.")]
    CheckpointError(String),

    /// Represents errors while decoding or preprocessing images
    #[error("Image error: {0}.")]
    ImageError(#[from] image::ImageError),

    /// Represents errors reported by libgit2 during repository init
    #[error("Git error: {0}.")]
    GitError(#[from] git2::Error),

    /// Represents errors while parsing a YAML configuration document
    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    /// Represents errors while reading or writing JSON payloads
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents errors during interactive prompting
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

/// Convenience type alias for Results with visionbake's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{}", err);
    std::process::exit(1);
}
