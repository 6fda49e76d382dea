//! Image buffers and progressive accumulation.
//!
//! `ColorBuffer` holds one linear RGB value per pixel, row 0 at the top.
//! `AccumulationBuffer` keeps the running mean of every frame merged since
//! the last reset.

use lumen_core::Color;

use crate::error::{RenderError, RenderResult};

/// Linear RGB image in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ColorBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Fold a new estimate into a running mean of `frame_index` earlier frames.
#[inline]
pub fn merge_pixel(new: Color, previous: Color, frame_index: u32) -> Color {
    previous + (new - previous) / (frame_index as f32 + 1.0)
}

/// Running average of all frames since the last reset.
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    average: ColorBuffer,
    frame_count: u32,
}

impl AccumulationBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            average: ColorBuffer::new(width, height),
            frame_count: 0,
        }
    }

    /// Discard the average. The next merge starts a fresh mean.
    pub fn reset(&mut self) {
        self.frame_count = 0;
        self.average.pixels.fill(Color::ZERO);
    }

    /// Change the resolution, discarding the average.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.average = ColorBuffer::new(width, height);
        self.frame_count = 0;
    }

    /// Number of frames merged since the last reset.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.average.dimensions()
    }

    /// Current running mean.
    pub fn average(&self) -> &ColorBuffer {
        &self.average
    }

    /// Merge one frame's estimate and advance the frame count.
    pub fn merge_frame(&mut self, frame: &ColorBuffer) -> RenderResult<()> {
        self.blend_frame(frame)?;
        self.frame_count += 1;
        Ok(())
    }

    /// Merge one frame's estimate with weight `1 / (frame_count + 1)`,
    /// leaving the frame count where it is.
    pub fn blend_frame(&mut self, frame: &ColorBuffer) -> RenderResult<()> {
        if frame.dimensions() != self.average.dimensions() {
            return Err(RenderError::DimensionMismatch {
                expected: self.average.dimensions(),
                actual: frame.dimensions(),
            });
        }

        let frame_index = self.frame_count;
        for (avg, new) in self.average.pixels.iter_mut().zip(&frame.pixels) {
            *avg = merge_pixel(*new, *avg, frame_index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::new(4.0, -1.0, 0.25)), [255, 0, 127, 255]);
    }

    #[test]
    fn test_first_merge_replaces() {
        assert_eq!(merge_pixel(Color::splat(3.0), Color::splat(100.0), 0), Color::splat(3.0));
    }

    #[test]
    fn test_merge_frame_is_arithmetic_mean() {
        let values = [0.5f32, 2.0, 0.0, 7.25, 1.0, 3.5];
        let mut acc = AccumulationBuffer::new(2, 1);
        for (i, &v) in values.iter().enumerate() {
            let mut frame = ColorBuffer::new(2, 1);
            frame.set(0, 0, Color::splat(v));
            frame.set(1, 0, Color::new(v, 2.0 * v, i as f32));
            acc.merge_frame(&frame).expect("same dimensions");
        }

        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let index_mean = (0..values.len()).sum::<usize>() as f32 / n;

        assert_eq!(acc.frame_count(), values.len() as u32);
        assert!((acc.average().get(0, 0) - Color::splat(mean)).length() < 1e-5);
        let expected = Color::new(mean, 2.0 * mean, index_mean);
        assert!((acc.average().get(1, 0) - expected).length() < 1e-5);
    }

    #[test]
    fn test_blend_frame_keeps_count() {
        let mut acc = AccumulationBuffer::new(1, 1);
        let mut frame = ColorBuffer::new(1, 1);
        for v in [1.0, 3.0] {
            frame.set(0, 0, Color::splat(v));
            acc.merge_frame(&frame).expect("same dimensions");
        }

        frame.set(0, 0, Color::splat(8.0));
        acc.blend_frame(&frame).expect("same dimensions");
        assert_eq!(acc.frame_count(), 2);
        // (1 + 3 + 8) / 3
        assert!((acc.average().get(0, 0) - Color::splat(4.0)).length() < 1e-5);

        // Blending again still weights by the unchanged count
        acc.blend_frame(&frame).expect("same dimensions");
        assert_eq!(acc.frame_count(), 2);
        assert!((acc.average().get(0, 0) - Color::splat(16.0 / 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_reset_discards_average() {
        let mut acc = AccumulationBuffer::new(1, 1);
        let mut frame = ColorBuffer::new(1, 1);
        frame.set(0, 0, Color::ONE);
        acc.merge_frame(&frame).expect("same dimensions");

        acc.reset();
        assert_eq!(acc.frame_count(), 0);
        assert_eq!(acc.average().get(0, 0), Color::ZERO);

        frame.set(0, 0, Color::splat(0.25));
        acc.merge_frame(&frame).expect("same dimensions");
        assert_eq!(acc.average().get(0, 0), Color::splat(0.25));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut acc = AccumulationBuffer::new(4, 4);
        let err = acc.merge_frame(&ColorBuffer::new(2, 4)).unwrap_err();
        assert_eq!(
            err,
            RenderError::DimensionMismatch {
                expected: (4, 4),
                actual: (2, 4)
            }
        );
        assert_eq!(acc.frame_count(), 0);
    }

    #[test]
    fn test_resize_resets() {
        let mut acc = AccumulationBuffer::new(1, 1);
        acc.merge_frame(&ColorBuffer::new(1, 1)).expect("same dimensions");
        acc.resize(3, 2);
        assert_eq!(acc.frame_count(), 0);
        assert_eq!(acc.dimensions(), (3, 2));
        assert_eq!(acc.average().pixels().len(), 6);
    }
}
