pub mod dataloader;
pub mod thread_pool;

pub use dataloader::config::{DataLoaderConfig, ExpectedCounts};
pub use dataloader::data_batch::DataBatch;
pub use dataloader::dataloader::{DataLoader, DatasetSplit};
pub use dataloader::error::DataLoaderError;
pub use dataloader::for_imagesdir::DirectoryImageLoader;
pub use dataloader::image_loader::{load_sample, DecodeSpec};
pub use dataloader::info::{print_dataset_info, DatasetInfo};
pub use dataloader::label_space::LabelSpace;
pub use dataloader::par_iter::{MultithreadedDataLoaderIterator, MultithreadedIterator};
pub use dataloader::sample::{DecodedImage, Sample};
