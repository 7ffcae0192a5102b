pub mod config;
pub mod data_batch;
pub mod dataloader;
pub mod error;
pub mod for_imagesdir;
pub mod image_loader;
pub mod info;
pub mod label_space;
pub mod par_iter;
pub mod sample;
