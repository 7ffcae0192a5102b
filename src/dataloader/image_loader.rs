use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageError, ImageReader};

use super::error::DataLoaderError;
use super::sample::{DecodedImage, Sample};

/// Output resolution and pixel layout every sample is decoded into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeSpec {
    pub width: u32,
    pub height: u32,
    pub color_type: ColorType,
}

impl DecodeSpec {
    pub fn channels(&self) -> usize {
        self.color_type.channel_count() as usize
    }

    pub fn bytes_per_image(&self) -> usize {
        self.width as usize * self.height as usize * self.color_type.bytes_per_pixel() as usize
    }
}

/// Decodes `sample` and scales it to exactly `spec.width` x `spec.height`.
///
/// The format is sniffed from the file contents rather than trusted from the
/// extension. Scaling is bilinear and never crops, so the aspect ratio is not
/// preserved. Nothing is cached; every call reads the file again.
pub fn load_sample(sample: &Sample, spec: DecodeSpec) -> Result<DecodedImage, DataLoaderError> {
    let decode_failure = |source: ImageError| DataLoaderError::DecodeFailure {
        path: sample.path.display().to_string(),
        source,
    };

    let img = ImageReader::open(&sample.path)
        .map_err(|e| decode_failure(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_failure(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_failure)?;

    let data = to_raw(resize(img, spec.width, spec.height), spec.color_type)?;
    debug_assert_eq!(data.len(), spec.bytes_per_image());

    Ok(DecodedImage {
        data,
        width: spec.width,
        height: spec.height,
        channels: spec.channels(),
        label: sample.label,
    })
}

fn resize(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    }
}

fn to_raw(img: DynamicImage, color_type: ColorType) -> Result<Vec<u8>, DataLoaderError> {
    match color_type {
        ColorType::L8 => Ok(img.into_luma8().into_raw()),
        ColorType::Rgb8 => Ok(img.into_rgb8().into_raw()),
        ColorType::Rgba8 => Ok(img.into_rgba8().into_raw()),
        other => Err(DataLoaderError::InvalidConfig(format!("unsupported colour type {:?}", other))),
    }
}
