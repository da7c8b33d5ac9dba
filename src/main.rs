//! visionbake's main application entry point: dispatches the train, export
//! and serve subcommands of the generated project skeleton.

use visionbake::checkpoint::CheckpointStore;
use visionbake::cli::{get_args, Args, Command};
use visionbake::config::ExperimentConfig;
use visionbake::error::{default_error_handler, Result};
use visionbake::logger::init_logger;
use visionbake::service::{run_server, LazyClassifier, ServiceState};
use visionbake::{export, training};

/// Filename prefix for model checkpoints.
const CHECKPOINT_PREFIX: &str = "checkpoint";

fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Train { config, epochs, lr, batch_size, artifacts_dir } => {
            let cfg = ExperimentConfig::from_yaml_file(&config)?
                .with_overrides(epochs, lr, batch_size);
            let store = CheckpointStore::new(artifacts_dir, CHECKPOINT_PREFIX);

            training::train(&cfg, &store, |report| {
                println!(
                    "epoch={} train_loss={:.4} val_loss={:.4}",
                    report.epoch, report.train_loss, report.val_loss
                );
            })?;
            Ok(())
        }
        Command::Export { artifacts_dir, output } => {
            let store = CheckpointStore::new(artifacts_dir, CHECKPOINT_PREFIX);
            let path = export::export_model(&store, &output)?;
            println!("Saved exported artifact to '{}'", path.display());
            Ok(())
        }
        Command::Serve { host, port, artifacts_dir, image_size } => {
            let store = CheckpointStore::new(artifacts_dir, CHECKPOINT_PREFIX);
            let state =
                ServiceState { classifier: LazyClassifier::new(store), image_size };
            run_server(&host, port, state)
        }
    }
}
