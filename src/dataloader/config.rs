use image::ColorType;

use super::dataloader::DatasetSplit;
use super::error::DataLoaderError;
use super::image_loader::DecodeSpec;

/// Sample counts the caller expects on disk for each split.
/// A split left as `None` is indexed without a count check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpectedCounts {
    pub train: Option<usize>,
    pub validation: Option<usize>,
    pub test: Option<usize>,
}

impl ExpectedCounts {
    pub fn get(&self, split: DatasetSplit) -> Option<usize> {
        match split {
            DatasetSplit::Train => self.train,
            DatasetSplit::Validation => self.validation,
            DatasetSplit::Test => self.test,
        }
    }

    pub fn with(mut self, split: DatasetSplit, count: usize) -> Self {
        match split {
            DatasetSplit::Train => self.train = Some(count),
            DatasetSplit::Validation => self.validation = Some(count),
            DatasetSplit::Test => self.test = Some(count),
        }
        self
    }
}

#[derive(Clone, Debug)]
pub struct DataLoaderConfig {
    pub expected_counts: ExpectedCounts,
    pub image_width: u32,
    pub image_height: u32,
    pub color_type: ColorType,
    pub batch_size: usize,
    pub prefetch_count: usize,
    pub threads: usize,
    pub shuffle_seed: Option<u64>,
    pub filter_extensions: bool,
}

impl DataLoaderConfig {
    pub fn build(self) -> Result<Self, DataLoaderError> {
        check_nonzero("batch_size", self.batch_size)?;
        check_nonzero("prefetch_count", self.prefetch_count)?;
        check_nonzero("threads", self.threads)?;
        check_nonzero("image_width", self.image_width as usize)?;
        check_nonzero("image_height", self.image_height as usize)?;
        check_color_type(self.color_type)?;

        Ok(self)
    }

    pub fn decode_spec(&self) -> DecodeSpec {
        DecodeSpec {
            width: self.image_width,
            height: self.image_height,
            color_type: self.color_type,
        }
    }

    pub fn bytes_per_image(&self) -> usize {
        self.decode_spec().bytes_per_image()
    }
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            expected_counts: ExpectedCounts::default(),
            image_width: 256,
            image_height: 256,
            color_type: ColorType::Rgb8,
            batch_size: 32,
            prefetch_count: 4,
            threads: num_cpus::get(),
            shuffle_seed: None,
            filter_extensions: false,
        }
    }
}

fn check_nonzero(name: &str, value: usize) -> Result<(), DataLoaderError> {
    if value == 0 {
        return Err(DataLoaderError::InvalidConfig(format!("{} must be greater than zero", name)));
    }
    Ok(())
}

fn check_color_type(color_type: ColorType) -> Result<(), DataLoaderError> {
    match color_type {
        ColorType::L8 | ColorType::Rgb8 | ColorType::Rgba8 => Ok(()),
        other => Err(DataLoaderError::InvalidConfig(format!(
            "unsupported colour type {:?}, expected L8, Rgb8 or Rgba8",
            other
        ))),
    }
}
