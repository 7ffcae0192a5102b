use std::fmt;

use super::dataloader::{DataLoader, DatasetSplit};

pub struct SplitInfo {
    pub split: DatasetSplit,
    pub size: usize,
    pub batches: usize,
    pub last_batch_size: usize,
    pub dropped: usize,
}

pub struct DatasetInfo {
    pub total_size: usize,
    pub batch_size: usize,
    pub image_width: u32,
    pub image_height: u32,
    pub channels: usize,
    pub classes: Vec<String>,
    pub splits: Vec<SplitInfo>,
}

impl DatasetInfo {
    pub fn new(dl: &impl DataLoader) -> Self {
        let config = dl.get_config();
        let batch_size = config.batch_size;

        let splits = DatasetSplit::ALL
            .into_iter()
            .filter(|&split| dl.is_indexed(split))
            .map(|split| {
                let size = dl.split_len(split);
                let batches = dl.num_batches(split);
                let remainder = size % batch_size;
                let (last_batch_size, dropped) = match (remainder, split.drop_last()) {
                    (0, _) => (if size == 0 { 0 } else { batch_size }, 0),
                    (r, true) => (if batches == 0 { 0 } else { batch_size }, r),
                    (r, false) => (r, 0),
                };
                SplitInfo {
                    split,
                    size,
                    batches,
                    last_batch_size,
                    dropped,
                }
            })
            .collect();

        DatasetInfo {
            total_size: dl.len(),
            batch_size,
            image_width: config.image_width,
            image_height: config.image_height,
            channels: config.decode_spec().channels(),
            classes: dl.label_space().names().to_vec(),
            splits,
        }
    }
}

impl fmt::Display for DatasetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image Information:")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Resolution: {}x{}", self.image_width, self.image_height)?;
        writeln!(f, "Channels: {}", self.channels)?;
        writeln!(f)?;
        writeln!(f, "Dataset Information:")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Total size: {}", self.total_size)?;
        writeln!(f, "Batch size: {}", self.batch_size)?;
        writeln!(f, "Classes ({}):", self.classes.len())?;
        for (idx, name) in self.classes.iter().enumerate() {
            writeln!(f, "  {}: {}", idx, name)?;
        }
        for info in &self.splits {
            writeln!(f)?;
            writeln!(f, "{} split:", info.split)?;
            writeln!(f, "  Size: {}", info.size)?;
            writeln!(f, "  Batches: {}", info.batches)?;
            writeln!(f, "  Last batch size: {}", info.last_batch_size)?;
            if info.dropped > 0 {
                writeln!(f, "  Dropped per epoch: {}", info.dropped)?;
            }
        }
        Ok(())
    }
}

pub fn print_dataset_info(dl: &impl DataLoader) {
    print!("{}", DatasetInfo::new(dl));
}
