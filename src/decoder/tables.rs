//! Capacity tables for QR Model 2, versions 1-40.
use crate::models::{EccLevel, VERSION_MAX, VERSION_MIN};

/// Error-correction codewords per block, rows ordered L, M, Q, H
const ECC_PER_BLOCK: [[u8; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

/// Number of error-correction blocks, rows ordered L, M, Q, H
const BLOCK_COUNT: [[u8; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

/// Block layout of one (version, level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// Number of blocks
    pub blocks: usize,
    /// ECC codewords in every block
    pub ecc_per_block: usize,
    /// Total codewords in the symbol (data + ECC)
    pub total_codewords: usize,
}

impl BlockLayout {
    /// Layout for `version` at `level`
    pub fn new(version: u8, level: EccLevel) -> Option<Self> {
        if !(VERSION_MIN..=VERSION_MAX).contains(&version) {
            return None;
        }
        let v = version as usize - 1;
        let row = level.table_index();
        Some(Self {
            blocks: BLOCK_COUNT[row][v] as usize,
            ecc_per_block: ECC_PER_BLOCK[row][v] as usize,
            total_codewords: raw_data_modules(version) / 8,
        })
    }

    /// Codewords in a short block (long blocks carry one more data codeword)
    pub fn short_block_len(&self) -> usize {
        self.total_codewords / self.blocks
    }

    /// How many blocks are short
    pub fn short_blocks(&self) -> usize {
        self.blocks - self.total_codewords % self.blocks
    }

    /// Data codewords across all blocks
    pub fn data_codewords(&self) -> usize {
        self.total_codewords - self.blocks * self.ecc_per_block
    }
}

/// Side length in modules
pub fn dimension(version: u8) -> usize {
    17 + 4 * version as usize
}

/// Modules left for codewords (and remainder bits) after function patterns
pub fn raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut modules = (16 * v + 128) * v + 64;
    if v >= 2 {
        let align = v / 7 + 2;
        modules -= (25 * align - 10) * align - 55;
        if v >= 7 {
            modules -= 36;
        }
    }
    modules
}

/// Alignment pattern centre coordinates along one axis (empty for version 1)
pub fn alignment_positions(version: u8) -> Vec<usize> {
    if version < 2 {
        return Vec::new();
    }
    let v = version as usize;
    let count = v / 7 + 2;
    let last = dimension(version) - 7;
    let step = if v == 32 {
        26
    } else {
        (v * 4 + count * 2 + 1) / (count * 2 - 2) * 2
    };

    let mut positions = vec![6];
    positions.extend((0..count - 1).rev().map(|i| last - i * step));
    positions
}
