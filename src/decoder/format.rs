//! Format information (ECC level + mask, BCH(15,5)) and version information
//! (BCH(18,6), versions 7-40) read from a sampled module grid.
use crate::models::{BitMatrix, EccLevel};

const FORMAT_GENERATOR: u32 = 0x537;
const FORMAT_XOR_MASK: u32 = 0x5412;
const VERSION_GENERATOR: u32 = 0x1F25;

/// BCH codes are accepted within this Hamming distance of the read bits
const MAX_BIT_ERRORS: u32 = 3;

/// Decoded format information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ecc_level: EccLevel,
    /// Mask pattern 0-7
    pub mask: u8,
}

fn bch_remainder(data: u32, data_shift: u32, generator: u32) -> u32 {
    let degree = 31 - generator.leading_zeros();
    let mut rem = data << data_shift;
    for bit in (degree..32).rev() {
        if rem & (1 << bit) != 0 {
            rem ^= generator << (bit - degree);
        }
    }
    rem
}

/// The 15-bit masked format codeword for a level and mask
pub fn format_codeword(ecc_level: EccLevel, mask: u8) -> u32 {
    let data = (ecc_level.format_bits() << 3) | mask as u32;
    ((data << 10) | bch_remainder(data, 10, FORMAT_GENERATOR)) ^ FORMAT_XOR_MASK
}

/// The 18-bit version codeword (only meaningful for versions 7-40)
pub fn version_codeword(version: u8) -> u32 {
    let data = version as u32;
    (data << 12) | bch_remainder(data, 12, VERSION_GENERATOR)
}

/// Nearest valid format codeword to `raw`, if close enough
pub fn decode_format_bits(raw: u32) -> Option<FormatInfo> {
    let mut best: Option<(u32, FormatInfo)> = None;
    for ecc_level in EccLevel::ALL {
        for mask in 0..8u8 {
            let distance = (format_codeword(ecc_level, mask) ^ raw).count_ones();
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, FormatInfo { ecc_level, mask }));
            }
        }
    }
    best.filter(|(d, _)| *d <= MAX_BIT_ERRORS).map(|(_, info)| info)
}

/// Nearest valid version codeword to `raw`, if close enough
pub fn decode_version_bits(raw: u32) -> Option<u8> {
    (7..=40u8)
        .map(|v| ((version_codeword(v) ^ raw).count_ones(), v))
        .min()
        .filter(|(d, _)| *d <= MAX_BIT_ERRORS)
        .map(|(_, v)| v)
}

/// Module coordinates (x, y) of format bit `i` in the copy around the top-left finder
fn format_position_primary(i: usize) -> (usize, usize) {
    match i {
        0..=5 => (8, i),
        6 => (8, 7),
        7 => (8, 8),
        8 => (7, 8),
        _ => (14 - i, 8),
    }
}

/// Module coordinates (x, y) of format bit `i` in the split copy
fn format_position_secondary(i: usize, size: usize) -> (usize, usize) {
    if i < 8 {
        (size - 1 - i, 8)
    } else {
        (8, size - 15 + i)
    }
}

fn read_bits(grid: &BitMatrix, count: usize, pos: impl Fn(usize) -> (usize, usize)) -> u32 {
    (0..count).fold(0, |acc, i| {
        let (x, y) = pos(i);
        acc | ((grid.get(x, y) as u32) << i)
    })
}

/// Format information from either copy, primary copy first
pub fn read_format(grid: &BitMatrix) -> Option<FormatInfo> {
    let size = grid.width();
    let primary = read_bits(grid, 15, format_position_primary);
    decode_format_bits(primary).or_else(|| {
        let secondary = read_bits(grid, 15, |i| format_position_secondary(i, size));
        decode_format_bits(secondary)
    })
}

/// Version from either version information block (grids of version 7 or larger)
pub fn read_version(grid: &BitMatrix) -> Option<u8> {
    let size = grid.width();
    // Block above the bottom-left finder is the transpose of the top-right one
    let top_right = read_bits(grid, 18, |i| (size - 11 + i % 3, i / 3));
    decode_version_bits(top_right).or_else(|| {
        let bottom_left = read_bits(grid, 18, |i| (i / 3, size - 11 + i % 3));
        decode_version_bits(bottom_left)
    })
}

/// Write both format copies into `grid`
pub fn write_format(grid: &mut BitMatrix, info: FormatInfo) {
    let size = grid.width();
    let bits = format_codeword(info.ecc_level, info.mask);
    for i in 0..15 {
        let dark = (bits >> i) & 1 == 1;
        let (x, y) = format_position_primary(i);
        grid.set(x, y, dark);
        let (x, y) = format_position_secondary(i, size);
        grid.set(x, y, dark);
    }
}
