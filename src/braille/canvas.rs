use globe::{Canvas, Rgba};

/// Dot bit for each (column, row) inside a braille cell.
/// ```
/// (0,0) (1,0)   bits: 0x01 0x08
/// (0,1) (1,1)   bits: 0x02 0x10
/// (0,2) (1,2)   bits: 0x04 0x20
/// (0,3) (1,3)   bits: 0x40 0x80
/// ```
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Braille Unicode canvas for terminal previews.
/// Each character cell represents a 2x4 pixel grid (8 dots).
pub struct BrailleCanvas {
    /// Characters per row
    width: usize,
    /// Rows of characters
    height: usize,
    /// Bit pattern per character, row-major
    cells: Vec<u8>,
}

impl BrailleCanvas {
    /// Create a blank canvas with the given character dimensions.
    /// Effective dot resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Downsample a raster: every pixel that is not `background` becomes a dot
    pub fn from_canvas(canvas: &Canvas, background: Rgba) -> Self {
        let size = canvas.size();
        let mut braille = Self::new(size.div_ceil(2), size.div_ceil(4));
        for y in 0..size {
            for x in 0..size {
                if canvas.pixel(x, y).is_some_and(|px| px != background) {
                    braille.set_dot(x, y);
                }
            }
        }
        braille
    }

    /// Raise the dot at pixel (x, y); outside the canvas is ignored
    pub fn set_dot(&mut self, x: usize, y: usize) {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }
        self.cells[cy * self.width + cx] |= DOT_BITS[x % 2][y % 4];
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Render one character row
    pub fn row_to_string(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|&b| char::from_u32(0x2800 + b as u32).unwrap_or(' '))
            .collect()
    }

    /// All character rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|i| self.row_to_string(i))
    }
}
