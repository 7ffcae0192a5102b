use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use image_dataset_loader::{
    print_dataset_info, DataLoader, DataLoaderConfig, DataLoaderError, DatasetSplit, DirectoryImageLoader,
    MultithreadedDataLoaderIterator,
};

/// Index a `root/<split>/<class>/<file>` image dataset and run one epoch of
/// every split it contains.
#[derive(Parser, Debug)]
#[command(name = "image_dataset_loader", version)]
struct Args {
    /// Dataset root holding the train, validation and test directories
    root: PathBuf,

    /// Samples per batch
    #[arg(default_value_t = 32)]
    batch_size: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("image_dataset_loader=info")),
        )
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "dataset pipeline failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), DataLoaderError> {
    let config = DataLoaderConfig {
        batch_size: args.batch_size,
        ..Default::default()
    };
    let dl = DirectoryImageLoader::new(&args.root, Some(config))?;
    print_dataset_info(&dl);
    println!("Seed: {}", dl.shuffle_seed());

    for split in DatasetSplit::ALL {
        if !dl.is_indexed(split) {
            continue;
        }

        let mut samples = 0;
        for batch in dl.par_iter(split)? {
            let batch = batch?;
            samples += batch.samples_in_batch;
        }
        tracing::info!(%split, samples, "drained split");
    }

    Ok(())
}
