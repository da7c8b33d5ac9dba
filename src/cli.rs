//! Command-line interface for the generated project skeleton.
//! Provides the train, export and serve subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for visionbake.
#[derive(Parser, Debug)]
#[command(author, version, about = "visionbake: computer-vision project starter", long_about = None)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Train the classifier using a YAML config
    Train {
        /// Path to the training configuration document
        #[arg(long, default_value = "configs/training.yaml")]
        config: PathBuf,

        /// Override the number of epochs from the config
        #[arg(long)]
        epochs: Option<usize>,

        /// Override the learning rate from the config
        #[arg(long)]
        lr: Option<f64>,

        /// Override the batch size from the config
        #[arg(long)]
        batch_size: Option<usize>,

        /// Directory for checkpoints and run state
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,
    },

    /// Export the latest checkpoint as a portable artifact
    Export {
        /// Directory holding the checkpoints
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,

        /// Output path (extension is added per format)
        #[arg(long, default_value = "artifacts/latest")]
        output: PathBuf,
    },

    /// Serve the inference API
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 8080)]
        port: u16,

        /// Directory holding the checkpoints
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,

        /// Edge length images are resized to before inference
        #[arg(long, default_value_t = 224)]
        image_size: u32,
    },
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
