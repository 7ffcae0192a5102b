use std::fmt;
use std::path::PathBuf;

/// One indexed file and its label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sample {
    pub path: PathBuf,
    pub label: usize,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.label)
    }
}

/// A decoded and resized image, row-major with interleaved channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub label: usize,
}
