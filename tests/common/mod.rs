// Fixture datasets written under the system temp dir

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma, Rgb, RgbImage};

pub struct Fixture {
    pub root: PathBuf,
    values: HashMap<PathBuf, u8>,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("image_dataset_loader_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        Fixture {
            root,
            values: HashMap::new(),
        }
    }

    pub fn class_dir(&self, split: &str, class: &str) -> PathBuf {
        let dir = self.root.join(split).join(class);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes `count` small RGB PPM files into `split/class`.
    pub fn add_images(&self, split: &str, class: &str, count: usize) {
        let dir = self.class_dir(split, class);
        for i in 0..count {
            RgbImage::from_pixel(2, 2, Rgb([i as u8, 0, 0]))
                .save(dir.join(format!("{}.{:05}.ppm", class, i)))
                .unwrap();
        }
    }

    /// Writes a uniform grayscale PNG whose pixel value identifies the sample.
    pub fn add_valued_image(&mut self, split: &str, class: &str, name: &str, size: (u32, u32), value: u8) -> PathBuf {
        let path = self.class_dir(split, class).join(name);
        GrayImage::from_pixel(size.0, size.1, Luma([value])).save(&path).unwrap();
        self.values.insert(path.clone(), value);
        path
    }

    /// Adds `count` valued images, spreading them over `classes` round robin.
    /// Values start at `first_value` and increase by one.
    pub fn add_valued_split(&mut self, split: &str, classes: &[&str], count: usize, first_value: u8) {
        for i in 0..count {
            let class = classes[i % classes.len()];
            let name = format!("img_{:04}.png", i);
            self.add_valued_image(split, class, &name, (3, 3), first_value + i as u8);
        }
    }

    pub fn write_file(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, bytes).unwrap();
        path
    }

    pub fn value_of(&self, path: &Path) -> u8 {
        self.values[path]
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
