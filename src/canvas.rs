use crate::hash::content_hash;

/// RGBA8 color
pub type Rgba = [u8; 4];

/// Square RGBA8 pixel buffer produced by one render pass.
/// Row-major, 4 bytes per pixel, origin top-left.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    size: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a `size`×`size` canvas filled with `background`
    pub fn new(size: usize, background: Rgba) -> Self {
        let mut pixels = Vec::with_capacity(size * size * 4);
        for _ in 0..size * size {
            pixels.extend_from_slice(&background);
        }
        Self { size, pixels }
    }

    /// Side length in pixels
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Set a pixel (out-of-bounds writes are ignored)
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x >= self.size || y >= self.size {
            return;
        }
        let idx = (y * self.size + x) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    #[inline]
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, color: Rgba) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Fill a horizontal span [x0, x1] on row y, clipped to the canvas
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Rgba) {
        if y < 0 || y >= self.size as i32 {
            return;
        }
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let lo = lo.max(0);
        let hi = hi.min(self.size as i32 - 1);
        for x in lo..=hi {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Read a pixel, `None` when out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let idx = (y * self.size + x) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(px)
    }

    /// Raw RGBA bytes for an external encoder
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the canvas, yielding the raw RGBA bytes
    pub fn into_rgba(self) -> Vec<u8> {
        self.pixels
    }

    /// Digest of the full pixel buffer
    pub fn content_hash(&self) -> u64 {
        content_hash(&self.pixels)
    }

    /// Count pixels that differ from `color`
    pub fn count_not(&self, color: Rgba) -> usize {
        self.pixels.chunks_exact(4).filter(|px| *px != color).count()
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("size", &self.size)
            .field("hash", &format_args!("{:016x}", self.content_hash()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = [255, 255, 255, 255];
    const RED: Rgba = [255, 0, 0, 255];

    #[test]
    fn test_background_fill() {
        let canvas = Canvas::new(3, WHITE);
        assert_eq!(36, canvas.as_rgba().len());
        assert_eq!(0, canvas.count_not(WHITE));
    }

    #[test]
    fn test_set_and_read_pixel() {
        let mut canvas = Canvas::new(4, WHITE);
        canvas.set_pixel(2, 1, RED);
        assert_eq!(Some(RED), canvas.pixel(2, 1));
        assert_eq!(Some(WHITE), canvas.pixel(1, 2));
        assert_eq!(None, canvas.pixel(4, 0));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut canvas = Canvas::new(2, WHITE);
        canvas.set_pixel(5, 0, RED);
        canvas.set_pixel_signed(-1, 1, RED);
        canvas.hline(-10, -2, 0, RED);
        assert_eq!(0, canvas.count_not(WHITE));
    }

    #[test]
    fn test_hline_clips_and_orders() {
        let mut canvas = Canvas::new(5, WHITE);
        canvas.hline(7, -3, 2, RED);
        assert_eq!(5, canvas.count_not(WHITE));
        assert_eq!(Some(RED), canvas.pixel(0, 2));
        assert_eq!(Some(RED), canvas.pixel(4, 2));
    }

    #[test]
    fn test_hash_tracks_content() {
        let a = Canvas::new(8, WHITE);
        let mut b = a.clone();
        assert_eq!(a.content_hash(), b.content_hash());
        b.set_pixel(3, 3, RED);
        assert_ne!(a.content_hash(), b.content_hash());
    }
}
