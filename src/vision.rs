//! Image loading and preprocessing shared by training and serving.

use crate::error::{Error, Result};
use burn::tensor::{backend::Backend, Tensor, TensorData};
use image::{imageops::FilterType, DynamicImage};
use std::path::Path;

/// Loads an image from disk.
///
/// # Errors
/// * `Error::DatasetError` with the offending path when the file is missing
///   or cannot be decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|e| {
        Error::DatasetError(format!("could not load image '{}': {}", path.display(), e))
    })
}

/// Decodes an image from an in-memory buffer (uploaded request body).
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(Error::ImageError)
}

/// Resizes to `size`x`size`, converts to RGB, scales to [0, 1] and lays the
/// pixels out channels-first, producing a `[3, size, size]` tensor.
pub fn preprocess<B: Backend>(
    img: &DynamicImage,
    size: u32,
    device: &B::Device,
) -> Tensor<B, 3> {
    let resized = img.resize_exact(size, size, FilterType::Triangle).to_rgb8();
    let (width, height) = resized.dimensions();

    let mut buffer = vec![0.0f32; (3 * width * height) as usize];
    let plane = (width * height) as usize;
    for (x, y, pixel) in resized.enumerate_pixels() {
        let offset = (y * width + x) as usize;
        buffer[offset] = f32::from(pixel[0]) / 255.0;
        buffer[plane + offset] = f32::from(pixel[1]) / 255.0;
        buffer[2 * plane + offset] = f32::from(pixel[2]) / 255.0;
    }

    let data = TensorData::new(buffer, [3, height as usize, width as usize]);
    Tensor::from_data(data, device)
}

/// Stacks preprocessed images into a `[N, 3, size, size]` batch tensor.
pub fn preprocess_batch<B: Backend>(
    images: &[DynamicImage],
    size: u32,
    device: &B::Device,
) -> Tensor<B, 4> {
    let tensors: Vec<Tensor<B, 3>> =
        images.iter().map(|img| preprocess(img, size, device)).collect();
    Tensor::stack(tensors, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArray;
    use burn::backend::ndarray::NdArrayDevice;
    use image::RgbImage;

    #[test]
    fn test_preprocess_shape_and_range() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            10,
            6,
            image::Rgb([255, 0, 128]),
        ));
        let device = NdArrayDevice::Cpu;
        let tensor = preprocess::<NdArray>(&img, 4, &device);
        assert_eq!(tensor.dims(), [3, 4, 4]);

        let values = tensor.into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        // Red channel of a constant image stays saturated after resizing.
        assert!((values[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_preprocess_batch_shape() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        let device = NdArrayDevice::Cpu;
        let batch =
            preprocess_batch::<NdArray>(&[img.clone(), img], 4, &device);
        assert_eq!(batch.dims(), [2, 3, 4, 4]);
    }

    #[test]
    fn test_load_image_missing_path() {
        let err = load_image("no/such/file.png").unwrap_err();
        assert!(err.to_string().contains("no/such/file.png"));
    }
}
