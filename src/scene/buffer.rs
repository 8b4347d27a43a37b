use bitflags::bitflags;
use log::debug;
use nalgebra::Vector3;

bitflags! {
    /// Selects which of the raster buffers a clear() call resets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Buffers: u32 {
        const COLOR = 1;
        const DEPTH = 2;
    }
}

/// Color buffer plus the matching z-buffer.
///
/// Colors are stored in the 0..255 range as f32 triples. The buffers are row-major and
/// flipped vertically: logical row y lives in buffer row height - 1 - y, so the first
/// stored row is the top of the picture.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    color: Vec<Vector3<f32>>,
    // Smaller is nearer, so "infinitely far" is +inf.
    depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let n_pixels = (width as usize) * (height as usize);
        return Self {
            width,
            height,
            color: vec![Vector3::zeros(); n_pixels],
            depth: vec![f32::INFINITY; n_pixels],
        };
    }

    pub fn width(&self) -> u32 {
        return self.width;
    }

    pub fn height(&self) -> u32 {
        return self.height;
    }

    pub fn clear(&mut self, buffers: Buffers) {
        if buffers.contains(Buffers::COLOR) {
            self.color.fill(Vector3::zeros());
        }
        if buffers.contains(Buffers::DEPTH) {
            self.depth.fill(f32::INFINITY);
        }
    }

    /// Flat offset of a pixel. The caller guarantees x < width and y < height.
    pub fn get_index(&self, x: u32, y: u32) -> usize {
        return ((self.height - 1 - y) as usize) * self.width as usize + x as usize;
    }

    /// Flat offset of a pixel or None if the coordinate falls outside the buffer.
    pub fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        return Some(self.get_index(x as u32, y as u32));
    }

    /// Writes a color straight into the frame buffer, bypassing the depth test.
    pub fn set_pixel(&mut self, point: Vector3<f32>, color: Vector3<f32>) {
        match self.checked_index(point.x as i32, point.y as i32) {
            Some(index) => self.color[index] = color,
            None => debug!("set_pixel: ({}, {}) is outside the frame buffer", point.x, point.y),
        }
    }

    /// Depth test and write. Returns true if the fragment was nearer than what was stored.
    pub fn test_and_set(&mut self, index: usize, depth: f32, color: Vector3<f32>) -> bool {
        if depth < self.depth[index] {
            self.color[index] = color;
            self.depth[index] = depth;
            return true;
        }
        return false;
    }

    pub fn colors(&self) -> &[Vector3<f32>] {
        return &self.color[..];
    }

    pub fn depths(&self) -> &[f32] {
        return &self.depth[..];
    }

    /// Packs the frame buffer into rgb8, first stored row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(3 * self.color.len());
        for color in &self.color {
            for channel in color.iter() {
                // Saturating cast, NaN becomes 0.
                data.push(channel.clamp(0.0, 255.0) as u8);
            }
        }
        return data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn buffers_are_sized_to_resolution() {
        let buffer = FrameBuffer::new(4, 3);
        assert_eq!(buffer.colors().len(), 12);
        assert_eq!(buffer.depths().len(), 12);
    }

    #[test]
    fn index_flips_rows() {
        let buffer = FrameBuffer::new(4, 3);
        assert_eq!(buffer.get_index(0, 0), 8);
        assert_eq!(buffer.get_index(3, 0), 11);
        assert_eq!(buffer.get_index(0, 2), 0);
        assert_eq!(buffer.get_index(1, 1), 5);
    }

    #[test]
    fn checked_index_rejects_outside_coords() {
        let buffer = FrameBuffer::new(4, 3);
        assert_eq!(buffer.checked_index(-1, 0), None);
        assert_eq!(buffer.checked_index(0, 3), None);
        assert_eq!(buffer.checked_index(4, 0), None);
        assert_eq!(buffer.checked_index(3, 2), Some(3));
    }

    #[test]
    fn clear_color_only_keeps_depth() {
        let mut buffer = FrameBuffer::new(2, 2);
        assert!(buffer.test_and_set(0, 1.0, vector![255.0, 0.0, 0.0]));
        buffer.clear(Buffers::COLOR);
        assert!(buffer.colors().iter().all(|c| *c == Vector3::zeros()));
        assert_eq!(buffer.depths()[0], 1.0);
    }

    #[test]
    fn clear_depth_resets_to_infinity() {
        let mut buffer = FrameBuffer::new(2, 2);
        buffer.test_and_set(3, -5.0, vector![0.0, 255.0, 0.0]);
        buffer.clear(Buffers::DEPTH);
        assert!(buffer.depths().iter().all(|d| *d == f32::INFINITY));
        assert_eq!(buffer.colors()[3], vector![0.0, 255.0, 0.0]);
        // Anything finite passes after a depth clear.
        assert!(buffer.test_and_set(3, f32::MAX, vector![1.0, 1.0, 1.0]));
    }

    #[test]
    fn clear_both_is_idempotent() {
        let mut once = FrameBuffer::new(3, 3);
        once.test_and_set(4, 2.0, vector![9.0, 9.0, 9.0]);
        let mut twice = FrameBuffer::new(3, 3);
        twice.test_and_set(4, 2.0, vector![9.0, 9.0, 9.0]);

        once.clear(Buffers::COLOR | Buffers::DEPTH);
        twice.clear(Buffers::COLOR | Buffers::DEPTH);
        twice.clear(Buffers::COLOR | Buffers::DEPTH);
        assert_eq!(once.colors(), twice.colors());
        assert_eq!(once.depths(), twice.depths());
    }

    #[test]
    fn depth_ties_do_not_overwrite() {
        let mut buffer = FrameBuffer::new(1, 1);
        assert!(buffer.test_and_set(0, 3.0, vector![1.0, 0.0, 0.0]));
        assert!(!buffer.test_and_set(0, 3.0, vector![0.0, 1.0, 0.0]));
        assert_eq!(buffer.colors()[0], vector![1.0, 0.0, 0.0]);
    }

    #[test]
    fn set_pixel_ignores_outside_points() {
        let mut buffer = FrameBuffer::new(2, 2);
        buffer.set_pixel(vector![5.0, 0.0, 0.0], vector![1.0, 1.0, 1.0]);
        buffer.set_pixel(vector![1.0, 0.0, 0.0], vector![7.0, 7.0, 7.0]);
        assert_eq!(buffer.colors()[buffer.get_index(1, 0)], vector![7.0, 7.0, 7.0]);
        assert_eq!(buffer.colors().iter().filter(|c| **c != Vector3::zeros()).count(), 1);
    }

    #[test]
    fn rgb8_saturates() {
        let mut buffer = FrameBuffer::new(1, 1);
        buffer.set_pixel(vector![0.0, 0.0, 0.0], vector![300.0, -4.0, 127.9]);
        assert_eq!(buffer.to_rgb8(), vec![255, 0, 127]);
    }
}
