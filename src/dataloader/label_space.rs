use std::collections::HashMap;
use std::path::Path;

use super::error::DataLoaderError;
use super::for_imagesdir::is_hidden;

/// Ordered class names and their integer labels.
///
/// Labels are assigned by lexicographic order of the names, so the mapping only
/// depends on which class directories exist, not on the order the filesystem
/// lists them in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSpace {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl LabelSpace {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();

        let indices = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        LabelSpace { names, indices }
    }

    /// Builds the label space from the subdirectory names of `dir`, following
    /// symlinks and skipping hidden entries.
    pub fn from_class_dirs(dir: &Path) -> Result<Self, DataLoaderError> {
        if !dir.is_dir() {
            return Err(DataLoaderError::DirectoryNotFound(dir.display().to_string()));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            if !entry.path().is_dir() || is_hidden(&file_name) {
                continue;
            }
            match file_name.into_string() {
                Ok(name) => names.push(name),
                Err(_) => return Err(DataLoaderError::InvalidClassName(entry.path().display().to_string())),
            }
        }

        if names.is_empty() {
            return Err(DataLoaderError::NoClasses(dir.display().to_string()));
        }

        Ok(Self::new(names))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(idx, name)| (idx, name.as_str()))
    }
}
