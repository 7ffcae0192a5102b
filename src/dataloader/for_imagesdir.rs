use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::thread_pool::worker::{WorkResult, WorkType};

use super::config::DataLoaderConfig;
use super::dataloader::{DataLoader, DatasetSplit};
use super::error::DataLoaderError;
use super::label_space::LabelSpace;
use super::sample::{DecodedImage, Sample};

/// Index of a `root/<split>/<class>/<file>` dataset.
///
/// The label space is built once from the training split and reused for
/// validation and test. Images are not opened here; decoding happens per
/// sample when a split is iterated.
pub struct DirectoryImageLoader {
    dir: PathBuf,
    label_space: LabelSpace,
    splits: [Option<Vec<Sample>>; 3],
    shuffle_seed: u64,
    rng: Mutex<StdRng>,
    config: DataLoaderConfig,
}

impl DirectoryImageLoader {
    pub fn new<P: AsRef<Path>>(dir: P, config: Option<DataLoaderConfig>) -> Result<Self, DataLoaderError> {
        let config = config.unwrap_or_default().build()?;
        let dir = dir.as_ref().to_owned();
        if !dir.is_dir() {
            return Err(DataLoaderError::DirectoryNotFound(dir.display().to_string()));
        }

        let label_space = LabelSpace::from_class_dirs(&dir.join(DatasetSplit::Train.dir_name()))?;

        let valid_extensions = config.filter_extensions.then(image_extensions);

        let mut splits: [Option<Vec<Sample>>; 3] = [None, None, None];
        for split in DatasetSplit::ALL {
            let expected = config.expected_counts.get(split);
            let split_dir = dir.join(split.dir_name());

            // Train is always required. The other splits are optional unless a count was declared.
            if split != DatasetSplit::Train && expected.is_none() && !split_dir.is_dir() {
                tracing::debug!(%split, "split directory absent, skipping");
                continue;
            }

            let samples = index_split(&dir, split, &label_space, expected, valid_extensions.as_ref())?;
            splits[split.index()] = Some(samples);
        }

        let shuffle_seed = config.shuffle_seed.unwrap_or_else(|| rand::thread_rng().gen());

        let loader = DirectoryImageLoader {
            dir,
            label_space,
            splits,
            shuffle_seed,
            rng: Mutex::new(StdRng::seed_from_u64(shuffle_seed)),
            config,
        };

        tracing::info!(
            root = %loader.dir.display(),
            classes = loader.label_space.len(),
            samples = loader.len(),
            "indexed image dataset"
        );

        Ok(loader)
    }

    pub fn shuffle_seed(&self) -> u64 {
        self.shuffle_seed
    }

    pub fn samples(&self, split: DatasetSplit) -> Result<&[Sample], DataLoaderError> {
        self.splits[split.index()]
            .as_deref()
            .ok_or(DataLoaderError::SplitNotIndexed(split))
    }
}

impl DataLoader for DirectoryImageLoader {
    fn get_batch_reference(&self, split: DatasetSplit, order: &[usize], batch_number: usize) -> Option<Vec<Sample>> {
        let samples = self.splits[split.index()].as_ref()?;
        let batch_size = self.config.batch_size;

        let split_size = order.len();
        let batch_start = batch_number * batch_size;

        if batch_start >= split_size {
            return None;
        }

        let batch_end = (batch_start + batch_size).min(split_size);

        if split.drop_last() && (batch_end - batch_start) < batch_size {
            return None;
        }

        let batch = order[batch_start..batch_end]
            .iter()
            .map(|&idx| samples[idx].clone())
            .collect();

        Some(batch)
    }

    fn epoch_order(&self, split: DatasetSplit) -> Result<Vec<usize>, DataLoaderError> {
        let mut order: Vec<usize> = (0..self.samples(split)?.len()).collect();

        if split.shuffles() {
            let mut rng = self.rng.lock().map_err(|_| DataLoaderError::RngLockError)?;
            order.shuffle(&mut *rng);
        }

        Ok(order)
    }

    fn is_indexed(&self, split: DatasetSplit) -> bool {
        self.splits[split.index()].is_some()
    }

    fn split_len(&self, split: DatasetSplit) -> usize {
        self.splits[split.index()].as_ref().map_or(0, Vec::len)
    }

    fn len(&self) -> usize {
        self.splits.iter().flatten().map(Vec::len).sum()
    }

    fn label_space(&self) -> &LabelSpace {
        &self.label_space
    }

    fn get_config(&self) -> &DataLoaderConfig {
        &self.config
    }

    fn create_sample_work(&self, sample: Sample) -> WorkType {
        WorkType::LoadSingleImage {
            sample,
            spec: self.config.decode_spec(),
        }
    }

    fn process_work_result(&self, result: WorkResult) -> Result<DecodedImage, DataLoaderError> {
        match result {
            WorkResult::LoadSingleImage(image) => image,
        }
    }
}

/// Enumerates `root/split/*/*` and labels every file by its parent directory.
///
/// Only the class directory level and the file level are visited. Symlinks are
/// followed and entries starting with `.` are skipped, the way a shell glob
/// would. The returned samples are sorted by path.
pub fn index_split(
    root: &Path,
    split: DatasetSplit,
    label_space: &LabelSpace,
    expected: Option<usize>,
    valid_extensions: Option<&HashSet<String>>,
) -> Result<Vec<Sample>, DataLoaderError> {
    let split_dir = root.join(split.dir_name());
    if !split_dir.is_dir() {
        return Err(DataLoaderError::DirectoryNotFound(split_dir.display().to_string()));
    }

    let mut class_dirs = Vec::new();
    for entry in std::fs::read_dir(&split_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() && !is_hidden(&entry.file_name()) {
            class_dirs.push(path);
        }
    }

    let per_class: Vec<Vec<Sample>> = class_dirs
        .par_iter()
        .map(|class_dir| index_class_dir(class_dir, label_space, valid_extensions))
        .collect::<Result<Vec<_>, DataLoaderError>>()?;

    let mut samples: Vec<Sample> = per_class.into_iter().flatten().collect();
    samples.par_sort_unstable();

    tracing::debug!(
        %split,
        classes = class_dirs.len(),
        samples = samples.len(),
        "indexed split"
    );

    if let Some(expected) = expected {
        if samples.len() != expected {
            return Err(DataLoaderError::CountMismatch {
                split,
                expected,
                found: samples.len(),
            });
        }
    }

    Ok(samples)
}

fn index_class_dir(
    class_dir: &Path,
    label_space: &LabelSpace,
    valid_extensions: Option<&HashSet<String>>,
) -> Result<Vec<Sample>, DataLoaderError> {
    let class_name = class_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DataLoaderError::InvalidClassName(class_dir.display().to_string()))?;

    let label = label_space
        .index_of(class_name)
        .ok_or_else(|| DataLoaderError::UnknownLabel {
            label: class_name.to_string(),
            path: class_dir.display().to_string(),
        })?;

    let mut samples = Vec::new();
    for entry in std::fs::read_dir(class_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || is_hidden(&entry.file_name()) {
            continue;
        }
        if let Some(extensions) = valid_extensions {
            if !is_valid_extension(&path, extensions) {
                continue;
            }
        }
        samples.push(Sample { path, label });
    }

    Ok(samples)
}

fn image_extensions() -> HashSet<String> {
    image::ImageFormat::all()
        .flat_map(|format| format.extensions_str())
        .map(|ext| ext.to_string())
        .collect()
}

fn is_valid_extension(path: &Path, valid_extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| valid_extensions.contains(&ext.to_lowercase()))
        .unwrap_or(false)
}

pub(crate) fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map_or(false, |name| name.starts_with('.'))
}
