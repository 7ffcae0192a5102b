use std::fmt;

use crate::thread_pool::worker::{WorkResult, WorkType};

use super::config::DataLoaderConfig;
use super::error::DataLoaderError;
use super::label_space::LabelSpace;
use super::sample::{DecodedImage, Sample};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DatasetSplit {
    Train,
    Validation,
    Test,
}

impl DatasetSplit {
    pub const ALL: [DatasetSplit; 3] = [DatasetSplit::Train, DatasetSplit::Validation, DatasetSplit::Test];

    /// Name of the split's directory under the dataset root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Validation => "validation",
            DatasetSplit::Test => "test",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            DatasetSplit::Train => 0,
            DatasetSplit::Validation => 1,
            DatasetSplit::Test => 2,
        }
    }

    /// Only the training split is reshuffled every epoch.
    pub fn shuffles(&self) -> bool {
        matches!(self, DatasetSplit::Train)
    }

    /// Test keeps its final partial batch so every sample is evaluated once.
    pub fn drop_last(&self) -> bool {
        !matches!(self, DatasetSplit::Test)
    }
}

impl fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

pub trait DataLoader {
    /// Samples making up `batch_number` of an epoch walking `order`, or `None`
    /// once the epoch is exhausted.
    fn get_batch_reference(&self, split: DatasetSplit, order: &[usize], batch_number: usize) -> Option<Vec<Sample>>;
    fn epoch_order(&self, split: DatasetSplit) -> Result<Vec<usize>, DataLoaderError>;
    fn is_indexed(&self, split: DatasetSplit) -> bool;
    fn split_len(&self, split: DatasetSplit) -> usize;
    fn len(&self) -> usize;
    fn label_space(&self) -> &LabelSpace;
    fn get_config(&self) -> &DataLoaderConfig;

    fn create_sample_work(&self, sample: Sample) -> WorkType;
    fn process_work_result(&self, result: WorkResult) -> Result<DecodedImage, DataLoaderError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn num_batches(&self, split: DatasetSplit) -> usize {
        let split_size = self.split_len(split);
        let batch_size = self.get_config().batch_size;
        if split.drop_last() {
            split_size / batch_size
        } else {
            split_size.div_ceil(batch_size)
        }
    }
}
