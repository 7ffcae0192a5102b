use thiserror::Error;

use super::dataloader::DatasetSplit;

#[derive(Error, Debug)]
pub enum DataLoaderError {
    // IO and filesystem errors
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // Dataset consistency errors
    #[error("{split} split has {found} samples, expected {expected}")]
    CountMismatch {
        split: DatasetSplit,
        expected: usize,
        found: usize,
    },

    #[error("Unknown label '{label}' for {path}")]
    UnknownLabel { label: String, path: String },

    #[error("Class directory name is not valid UTF-8: {0}")]
    InvalidClassName(String),

    #[error("No class directories found in {0}")]
    NoClasses(String),

    #[error("The {0} split was not indexed")]
    SplitNotIndexed(DatasetSplit),

    // Decode errors
    #[error("Failed to decode {path}: {source}")]
    DecodeFailure {
        path: String,
        #[source]
        source: image::ImageError,
    },

    // Configuration and runtime errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to acquire lock on RNG")]
    RngLockError,

    #[error("Worker pool stopped before batch {0} completed")]
    WorkerDisconnected(usize),
}
