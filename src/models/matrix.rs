/// Packed bit grid used for binarized images and sampled QR modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// All-false matrix of the given size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height).div_ceil(8)],
        }
    }

    /// Matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bit at (x, y); out-of-range reads are false (light)
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set bit at (x, y); out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        if value {
            self.data[index / 8] |= 1 << (index % 8);
        } else {
            self.data[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Flip bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Mirror across the main diagonal
    pub fn transpose(&self) -> Self {
        let mut out = BitMatrix::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.set(y, x, true);
                }
            }
        }
        out
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
