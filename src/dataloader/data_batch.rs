use super::sample::DecodedImage;

/// A batch of decoded images laid out as `[samples, height, width, channels]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DataBatch {
    pub data: Box<[u8]>,
    pub samples_in_batch: usize,
    pub bytes_per_sample: usize,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub labels: Vec<usize>,
    pub batch_number: usize,
}

impl DataBatch {
    /// Packs `images` in the given order. All images must share one resolution.
    pub fn from_images(batch_number: usize, images: Vec<DecodedImage>) -> DataBatch {
        let (width, height, channels) = images
            .first()
            .map(|img| (img.width, img.height, img.channels))
            .unwrap_or((0, 0, 0));
        let bytes_per_sample = width as usize * height as usize * channels;

        let mut data = Vec::with_capacity(bytes_per_sample * images.len());
        let mut labels = Vec::with_capacity(images.len());
        for img in images {
            debug_assert_eq!(img.data.len(), bytes_per_sample);
            data.extend_from_slice(&img.data);
            labels.push(img.label);
        }

        DataBatch {
            data: data.into_boxed_slice(),
            samples_in_batch: labels.len(),
            bytes_per_sample,
            width,
            height,
            channels,
            labels,
            batch_number,
        }
    }

    pub fn sample(&self, index: usize) -> Option<&[u8]> {
        if index >= self.samples_in_batch {
            return None;
        }
        let start = index * self.bytes_per_sample;
        Some(&self.data[start..start + self.bytes_per_sample])
    }

    /// `[samples, height, width, channels]`
    pub fn shape(&self) -> [usize; 4] {
        [self.samples_in_batch, self.height as usize, self.width as usize, self.channels]
    }

    pub fn to_f32(&self) -> Vec<f32> {
        self.data.iter().map(|&x| x as f32).collect()
    }

    /// Pixel values scaled into `[0, 1]`.
    pub fn to_f32_normalized(&self) -> Vec<f32> {
        self.data.iter().map(|&x| x as f32 / 255.0).collect()
    }
}
