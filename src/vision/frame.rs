//! Frame data structures for binarization input and output

use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

use super::binarize::Binarizer;
use super::kernel::KernelError;

/// Raw pixel data that does not describe the claimed frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("expected {expected} bytes for a {width}x{height} RGBA frame, got {actual}")]
    ByteLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("expected {expected} pixels for a {width}x{height} frame, got {actual}")]
    PixelCount {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A frame of packed `0xAARRGGBB` pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// One packed pixel per sample
    pub pixels: Vec<u32>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl PixelBuffer {
    /// Wrap packed pixels, checking them against the dimensions
    pub fn new(pixels: Vec<u32>, width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(FrameError::PixelCount {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { pixels, width, height })
    }

    /// Pack RGBA bytes (as delivered by most capture APIs)
    pub fn from_rgba(data: &[u8], width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(FrameError::ByteLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        let pixels = data
            .chunks_exact(4)
            .map(|px| {
                (px[3] as u32) << 24 | (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32
            })
            .collect();

        Ok(Self { pixels, width, height })
    }

    /// Unpack to RGBA bytes
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for &p in &self.pixels {
            data.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8, (p >> 24) as u8]);
        }
        data
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Binarize this frame in place with a default-sigma kernel
    pub fn binarize(&mut self, kernel_size: usize, c: i32) -> Result<(), KernelError> {
        let mut binarizer = Binarizer::new(kernel_size, c)?;
        self.binarize_with(&mut binarizer);
        Ok(())
    }

    /// Binarize this frame in place, reusing an existing filter
    pub fn binarize_with(&mut self, binarizer: &mut Binarizer) {
        binarizer.apply(&mut self.pixels, self.width as usize, self.height as usize);
    }
}

impl From<&RgbaImage> for PixelBuffer {
    fn from(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|px| {
                let [r, g, b, a] = px.0;
                (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
            })
            .collect();
        Self { pixels, width, height }
    }
}

impl From<PixelBuffer> for RgbaImage {
    fn from(frame: PixelBuffer) -> Self {
        let (width, height) = frame.dimensions();
        RgbaImage::from_fn(width, height, |x, y| {
            let p = frame.pixels[(y * width + x) as usize];
            image::Rgba([(p >> 16) as u8, (p >> 8) as u8, p as u8, (p >> 24) as u8])
        })
    }
}

/// Binarize an image, returning a new opaque grayscale-in-RGBA image
pub fn binarize_image(src: &RgbaImage, kernel_size: usize, c: i32) -> Result<RgbaImage, KernelError> {
    let mut frame = PixelBuffer::from(src);
    debug!("Binarizing image {}x{}", frame.width, frame.height);
    frame.binarize(kernel_size, c)?;
    Ok(frame.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::binarize::{gray_to_argb, luminance};

    #[test]
    fn test_from_rgba_packs_argb() {
        let data = vec![
            255, 0, 0, 255,   // Red
            0, 255, 0, 128,   // Half-transparent green
        ];
        let frame = PixelBuffer::from_rgba(&data, 2, 1).unwrap();
        assert_eq!(frame.pixels, vec![0xffff_0000, 0x8000_ff00]);
        assert_eq!(frame.to_rgba(), data);
    }

    #[test]
    fn test_from_rgba_wrong_length() {
        let err = PixelBuffer::from_rgba(&[0, 0, 0], 1, 1).unwrap_err();
        assert_eq!(
            err,
            FrameError::ByteLength { width: 1, height: 1, expected: 4, actual: 3 }
        );
    }

    #[test]
    fn test_new_checks_pixel_count() {
        assert!(PixelBuffer::new(vec![0; 6], 2, 3).is_ok());
        assert!(matches!(
            PixelBuffer::new(vec![0; 5], 2, 3),
            Err(FrameError::PixelCount { expected: 6, actual: 5, .. })
        ));
    }

    #[test]
    fn test_rgba_image_conversion() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));

        let frame = PixelBuffer::from(&img);
        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.pixels[5], 0xff0a_141e);

        let back: RgbaImage = frame.into();
        assert_eq!(back, img);
    }

    #[test]
    fn test_binarize_image_outputs_gray() {
        let img = RgbaImage::from_fn(6, 6, |x, _| {
            if x == 3 {
                image::Rgba([20, 20, 20, 255])
            } else {
                image::Rgba([200, 180, 160, 255])
            }
        });

        let out = binarize_image(&img, 3, 2).unwrap();
        assert_eq!(out.dimensions(), (6, 6));
        for px in out.pixels() {
            let [r, g, b, a] = px.0;
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert_eq!(a, 255);
        }
    }

    #[test]
    fn test_binarize_rejects_bad_kernel() {
        let mut frame = PixelBuffer::new(vec![gray_to_argb(90); 4], 2, 2).unwrap();
        assert_eq!(frame.binarize(6, 0), Err(KernelError::EvenSize(6)));
        assert!(frame.pixels.iter().all(|&p| luminance(p) == 90));
    }
}
