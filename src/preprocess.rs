use fast_image_resize::images::{Image as ResizeBuffer, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use ndarray::Array4;

use crate::error::Error;

/// Pixel-value normalization policy. Declared once in [`PreprocessConfig`]
/// and applied to every pixel: a mismatch against the model's training
/// distribution degrades accuracy silently, so the policy lives in exactly
/// one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// Plain division by 255 into [0, 1]. This is what the classifier was
    /// trained with.
    UnitScale,
    /// Per-channel `(x/255 - mean) / std`.
    MeanStd { mean: [f32; 3], std: [f32; 3] },
}

impl Normalization {
    fn apply(&self, value: u8, channel: usize) -> f32 {
        let scaled = value as f32 / 255.0;
        match self {
            Normalization::UnitScale => scaled,
            Normalization::MeanStd { mean, std } => (scaled - mean[channel]) / std[channel],
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
    pub normalization: Normalization,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            height: 224,
            width: 224,
            channels: 3,
            normalization: Normalization::UnitScale,
        }
    }
}

#[derive(Debug)]
pub struct Processor {
    pub config: PreprocessConfig,
}

impl Processor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Decode arbitrary image bytes into a 3-channel RGB image. This is the
    /// only place channel conversion happens.
    pub fn decode(&self, bytes: &[u8]) -> Result<RgbImage, Error> {
        Ok(image::load_from_memory(bytes)?.to_rgb8())
    }

    /// Resize to the model's fixed input resolution (bilinear) and normalize
    /// per the configured policy. Output is NHWC, batch of one.
    pub fn normalize(&self, image: &RgbImage) -> Array4<f32> {
        let (height, width) = (self.config.height, self.config.width);
        let src = ImageRef::new(image.width(), image.height(), image.as_raw(), PixelType::U8x3)
            .expect("RgbImage buffer matches its dimensions");

        let mut resized = ResizeBuffer::new(width as u32, height as u32, PixelType::U8x3);
        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
        let mut resizer = Resizer::new();
        resizer
            .resize(&src, &mut resized, Some(&options))
            .expect("source and destination share a pixel type");

        let mut tensor = Array4::<f32>::zeros((1, height, width, self.config.channels));
        for (i, pixel) in resized.buffer().chunks_exact(3).enumerate() {
            let y = i / width;
            let x = i % width;
            for (c, &value) in pixel.iter().enumerate() {
                tensor[[0, y, x, c]] = self.config.normalization.apply(value, c);
            }
        }
        tensor
    }

    /// Decode + normalize in one step; the shape every classifier input has.
    pub fn tensor_from_bytes(&self, bytes: &[u8]) -> Result<Array4<f32>, Error> {
        let image = self.decode(bytes)?;
        Ok(self.normalize(&image))
    }
}
