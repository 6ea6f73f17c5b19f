//! The drawing surface effects render onto.

use crate::{Bounds, Point, Rgb};

/// A colour with an opacity in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ink {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Ink {
    pub const fn new(rgb: Rgb, alpha: f32) -> Self {
        Self { rgb, alpha }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// A row-major RGBA pixel buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        &mut self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Zero every pixel (fully transparent black).
    pub fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }

    /// Resize, discarding the previous contents.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, [0; 4]);
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == [0; 4])
    }
}

/// Something effects can draw onto. Coordinates are virtual pixels.
pub trait Surface {
    /// Current drawable area.
    fn bounds(&self) -> Bounds;

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Filled circle with a soft halo of `glow` pixels around it.
    fn fill_circle(&mut self, center: Point, radius: f32, glow: f32, ink: Ink);

    /// Straight line whose ink fades linearly from `start` to `end`.
    fn stroke_line(&mut self, from: Point, to: Point, start: Ink, end: Ink);

    /// Blend a pixel layer over the surface at the given opacity. The layer
    /// is stretched over the whole surface.
    fn composite(&mut self, layer: &PixelBuffer, opacity: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_buffer_resize_and_clear() {
        let mut buffer = PixelBuffer::new(2, 2);
        assert!(buffer.is_blank());

        buffer.pixels_mut()[3] = [9, 9, 9, 255];
        assert_eq!(buffer.get(1, 1), Some([9, 9, 9, 255]));
        assert_eq!(buffer.get(2, 0), None);

        buffer.clear();
        assert!(buffer.is_blank());

        buffer.resize(3, 1);
        assert_eq!(buffer.pixels().len(), 3);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 1);
    }
}
