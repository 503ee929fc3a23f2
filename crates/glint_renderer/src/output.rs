//! RGB byte buffer produced by a render.

use std::path::Path;

use crate::{RenderError, RenderResult};

/// Bytes per pixel (RGB).
pub const NUM_COMPONENTS: usize = 3;

/// Row-major 8-bit RGB image, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * NUM_COMPONENTS],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in one row.
    pub fn stride(&self) -> usize {
        self.width as usize * NUM_COMPONENTS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Get the pixel at (x, y), with y = 0 the top row.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = y as usize * self.stride() + x as usize * NUM_COMPONENTS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Enlarge the image by an integer factor, replicating each pixel into a
    /// `scale x scale` block.
    pub fn upscale(&self, scale: u32) -> RenderResult<ImageBuffer> {
        if scale == 0 {
            return Err(RenderError::ZeroScale);
        }
        if scale == 1 {
            return Ok(self.clone());
        }

        let too_large = || RenderError::ImageTooLarge {
            width: self.width,
            height: self.height,
            scale,
        };
        let width = self.width.checked_mul(scale).ok_or_else(too_large)?;
        let height = self.height.checked_mul(scale).ok_or_else(too_large)?;
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(NUM_COMPONENTS))
            .ok_or_else(too_large)?;

        let mut scaled = ImageBuffer::new(width, height);
        let scale = scale as usize;
        let src_stride = self.stride();
        let dst_stride = scaled.stride();

        for (dst_y, dst_row) in scaled.data.chunks_exact_mut(dst_stride).enumerate() {
            let src_row = &self.data[(dst_y / scale) * src_stride..][..src_stride];
            for (dst_pixel, src_pixel) in dst_row
                .chunks_exact_mut(NUM_COMPONENTS * scale)
                .zip(src_row.chunks_exact(NUM_COMPONENTS))
            {
                for block in dst_pixel.chunks_exact_mut(NUM_COMPONENTS) {
                    block.copy_from_slice(src_pixel);
                }
            }
        }

        Ok(scaled)
    }

    /// Save as PNG, enlarged by `scale`.
    pub fn save_png<P: AsRef<Path>>(&self, path: P, scale: u32) -> RenderResult<()> {
        let scaled = self.upscale(scale)?;
        ::image::save_buffer_with_format(
            path.as_ref(),
            &scaled.data,
            scaled.width,
            scaled.height,
            ::image::ColorType::Rgb8,
            ::image::ImageFormat::Png,
        )?;
        log::info!(
            "Saved {}x{} image to {}",
            scaled.width,
            scaled.height,
            path.as_ref().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 1);
        image.as_bytes_mut().copy_from_slice(&[255, 0, 0, 0, 0, 255]);
        image
    }

    #[test]
    fn test_new_is_black() {
        let image = ImageBuffer::new(4, 3);
        assert_eq!(image.as_bytes().len(), 4 * 3 * 3);
        assert!(image.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(image.stride(), 12);
    }

    #[test]
    fn test_pixel_access() {
        let image = checker();
        assert_eq!(image.pixel(0, 0), [255, 0, 0]);
        assert_eq!(image.pixel(1, 0), [0, 0, 255]);
    }

    #[test]
    fn test_upscale_replicates_pixels() {
        let scaled = checker().upscale(2).unwrap();
        assert_eq!(scaled.width(), 4);
        assert_eq!(scaled.height(), 2);

        for y in 0..2 {
            assert_eq!(scaled.pixel(0, y), [255, 0, 0]);
            assert_eq!(scaled.pixel(1, y), [255, 0, 0]);
            assert_eq!(scaled.pixel(2, y), [0, 0, 255]);
            assert_eq!(scaled.pixel(3, y), [0, 0, 255]);
        }
    }

    #[test]
    fn test_upscale_identity_and_zero() {
        let image = checker();
        assert_eq!(image.upscale(1).unwrap(), image);
        assert!(matches!(image.upscale(0), Err(RenderError::ZeroScale)));
    }

    #[test]
    fn test_upscale_overflow_rejected() {
        let image = ImageBuffer::new(240, 135);
        assert!(matches!(
            image.upscale(20_000_000),
            Err(RenderError::ImageTooLarge {
                width: 240,
                height: 135,
                scale: 20_000_000
            })
        ));

        // Each side fits in u32 but the byte count does not
        let pixel = ImageBuffer::new(1, 1);
        assert!(matches!(
            pixel.upscale(u32::MAX),
            Err(RenderError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_save_png() {
        let path = std::env::temp_dir().join(format!("glint_test_{}.png", std::process::id()));
        checker().save_png(&path, 3).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
        std::fs::remove_file(&path).unwrap();
    }
}
