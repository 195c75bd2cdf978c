//! Synthetic QR symbols for the integration tests and benchmarks.
//!
//! A small, independent encoder: segments, Reed-Solomon ECC, function
//! patterns, forced mask. Block sizes come from the library's tables.
#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
use qrsnap::EccLevel;
use qrsnap::decoder::tables::{BlockLayout, alignment_positions};

/// Pixels per module in rendered fixtures
pub const SCALE: u32 = 4;
/// Light modules around every rendered symbol
pub const QUIET: usize = 4;

/// One segment of symbol data
#[derive(Debug, Clone)]
pub enum Segment {
    /// ECI designator
    Eci(u32),
    /// Decimal digits
    Numeric(String),
    /// Characters from the 45-character alphanumeric set
    Alnum(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Shift-JIS double-byte characters
    Kanji(Vec<u8>),
}

impl Segment {
    pub fn bytes(data: &[u8]) -> Self {
        Segment::Bytes(data.to_vec())
    }
}

const ALNUM: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

#[derive(Default)]
struct Bits(Vec<bool>);

impl Bits {
    fn push(&mut self, value: u32, len: usize) {
        for i in (0..len).rev() {
            self.0.push((value >> i) & 1 == 1);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

fn count_bits(mode: u32, version: u8) -> usize {
    let band = match version {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    match mode {
        1 => [10, 12, 14][band],
        2 => [9, 11, 13][band],
        4 => [8, 16, 16][band],
        _ => [8, 10, 12][band],
    }
}

fn append_segment(bits: &mut Bits, segment: &Segment, version: u8) {
    match segment {
        Segment::Eci(value) => {
            bits.push(7, 4);
            match *value {
                v if v < 1 << 7 => bits.push(v, 8),
                v if v < 1 << 14 => bits.push((0b10 << 14) | v, 16),
                v => bits.push((0b110 << 21) | v, 24),
            }
        }
        Segment::Numeric(digits) => {
            bits.push(1, 4);
            bits.push(digits.len() as u32, count_bits(1, version));
            for chunk in digits.as_bytes().chunks(3) {
                let value = chunk.iter().fold(0, |acc, d| acc * 10 + (d - b'0') as u32);
                bits.push(value, chunk.len() * 3 + 1);
            }
        }
        Segment::Alnum(text) => {
            bits.push(2, 4);
            bits.push(text.len() as u32, count_bits(2, version));
            let index = |c: u8| ALNUM.bytes().position(|a| a == c).unwrap() as u32;
            for chunk in text.as_bytes().chunks(2) {
                match chunk {
                    [a, b] => bits.push(index(*a) * 45 + index(*b), 11),
                    [a] => bits.push(index(*a), 6),
                    _ => unreachable!(),
                }
            }
        }
        Segment::Bytes(data) => {
            bits.push(4, 4);
            bits.push(data.len() as u32, count_bits(4, version));
            for &b in data {
                bits.push(b as u32, 8);
            }
        }
        Segment::Kanji(sjis) => {
            bits.push(8, 4);
            bits.push((sjis.len() / 2) as u32, count_bits(8, version));
            for pair in sjis.chunks(2) {
                let c = (pair[0] as u32) << 8 | pair[1] as u32;
                let sub = if c <= 0x9FFC { c - 0x8140 } else { c - 0xC140 };
                bits.push((sub >> 8) * 0xC0 + (sub & 0xFF), 13);
            }
        }
    }
}

fn gf_mul(x: u8, y: u8) -> u8 {
    let mut z: u32 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x11D);
        z ^= ((y as u32 >> i) & 1) * x as u32;
    }
    z as u8
}

fn rs_divisor(degree: usize) -> Vec<u8> {
    let mut result = vec![0u8; degree];
    result[degree - 1] = 1;
    let mut root = 1u8;
    for _ in 0..degree {
        for j in 0..degree {
            result[j] = gf_mul(result[j], root);
            if j + 1 < degree {
                result[j] ^= result[j + 1];
            }
        }
        root = gf_mul(root, 0x02);
    }
    result
}

fn rs_remainder(data: &[u8], divisor: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; divisor.len()];
    for &b in data {
        let factor = b ^ result[0];
        result.remove(0);
        result.push(0);
        for (r, &d) in result.iter_mut().zip(divisor) {
            *r ^= gf_mul(d, factor);
        }
    }
    result
}

/// Block structure from ISO/IEC 18004 table 9, written out independently of
/// the library tables: (version, level, blocks, ECC per block, data codewords)
pub const REFERENCE_LAYOUTS: [(u8, EccLevel, usize, usize, usize); 11] = [
    (1, EccLevel::L, 1, 7, 19),
    (1, EccLevel::M, 1, 10, 16),
    (1, EccLevel::Q, 1, 13, 13),
    (1, EccLevel::H, 1, 17, 9),
    (2, EccLevel::M, 1, 16, 28),
    (5, EccLevel::Q, 4, 18, 62),
    (7, EccLevel::L, 2, 20, 156),
    (10, EccLevel::Q, 8, 24, 154),
    (13, EccLevel::M, 9, 22, 334),
    (40, EccLevel::L, 25, 30, 2956),
    (40, EccLevel::H, 81, 30, 1276),
];

/// Data and ECC codewords, interleaved in transmission order
fn codewords(version: u8, level: EccLevel, segments: &[Segment]) -> Vec<u8> {
    let layout = BlockLayout::new(version, level).unwrap();
    if let Some(&(_, _, blocks, ecc, data)) = REFERENCE_LAYOUTS
        .iter()
        .find(|(v, l, ..)| *v == version && *l == level)
    {
        assert_eq!(
            (layout.blocks, layout.ecc_per_block, layout.data_codewords()),
            (blocks, ecc, data),
            "block layout for v{version}-{level}"
        );
    }
    let capacity = layout.data_codewords() * 8;

    let mut bits = Bits::default();
    for segment in segments {
        append_segment(&mut bits, segment, version);
    }
    assert!(bits.len() <= capacity, "segments do not fit v{version}-{level}");
    bits.push(0, (capacity - bits.len()).min(4));
    bits.push(0, (8 - bits.len() % 8) % 8);
    for pad in [0xEC, 0x11].into_iter().cycle() {
        if bits.len() >= capacity {
            break;
        }
        bits.push(pad, 8);
    }

    let data: Vec<u8> = bits
        .0
        .chunks(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
        .collect();

    let divisor = rs_divisor(layout.ecc_per_block);
    let short_data = layout.short_block_len() - layout.ecc_per_block;
    let mut blocks: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(layout.blocks);
    let mut offset = 0;
    for i in 0..layout.blocks {
        let len = short_data + usize::from(i >= layout.short_blocks());
        let block = data[offset..offset + len].to_vec();
        offset += len;
        let ecc = rs_remainder(&block, &divisor);
        blocks.push((block, ecc));
    }

    let mut out = Vec::with_capacity(layout.total_codewords);
    for i in 0..=short_data {
        for (block, _) in &blocks {
            if let Some(&c) = block.get(i) {
                out.push(c);
            }
        }
    }
    for i in 0..layout.ecc_per_block {
        for (_, ecc) in &blocks {
            out.push(ecc[i]);
        }
    }
    assert_eq!(out.len(), layout.total_codewords);
    out
}

fn mask_flips(mask: u8, x: usize, y: usize) -> bool {
    match mask {
        0 => (x + y) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (x + y) % 3 == 0,
        4 => (x / 3 + y / 2) % 2 == 0,
        5 => x * y % 2 + x * y % 3 == 0,
        6 => (x * y % 2 + x * y % 3) % 2 == 0,
        _ => ((x + y) % 2 + x * y % 3) % 2 == 0,
    }
}

fn format_bits(level: EccLevel, mask: u8) -> u32 {
    let data = level.format_bits() << 3 | mask as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    (data << 10 | rem) ^ 0x5412
}

fn version_bits(version: u8) -> u32 {
    let mut rem = version as u32;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    (version as u32) << 12 | rem
}

/// A module grid, true = dark
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub size: usize,
    modules: Vec<bool>,
    function: Vec<bool>,
    /// Data module coordinates in codeword bit order
    data_order: Vec<(usize, usize)>,
}

impl Symbol {
    fn blank(size: usize) -> Self {
        Self {
            size,
            modules: vec![false; size * size],
            function: vec![false; size * size],
            data_order: Vec::new(),
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x]
    }

    fn set_function(&mut self, x: usize, y: usize, dark: bool) {
        self.modules[y * self.size + x] = dark;
        self.function[y * self.size + x] = true;
    }

    fn draw_finder(&mut self, cx: isize, cy: isize) {
        for dy in -4isize..=4 {
            for dx in -4isize..=4 {
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= self.size as isize || y >= self.size as isize {
                    continue;
                }
                let dist = dx.abs().max(dy.abs());
                self.set_function(x as usize, y as usize, dist != 2 && dist != 4);
            }
        }
    }

    fn draw_function_patterns(&mut self, version: u8) {
        let size = self.size;
        for i in 0..size {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }
        let far = size as isize - 4;
        self.draw_finder(3, 3);
        self.draw_finder(far, 3);
        self.draw_finder(3, far);

        let centres = alignment_positions(version);
        let last = centres.len().saturating_sub(1);
        for (i, &cy) in centres.iter().enumerate() {
            for (j, &cx) in centres.iter().enumerate() {
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                for dy in -2isize..=2 {
                    for dx in -2isize..=2 {
                        let x = (cx as isize + dx) as usize;
                        let y = (cy as isize + dy) as usize;
                        self.set_function(x, y, dx.abs().max(dy.abs()) != 1);
                    }
                }
            }
        }

        // Reserve format areas; real bits are drawn after masking
        for i in (0..9).filter(|&i| i != 6) {
            self.set_function(8, i, false);
            self.set_function(i, 8, false);
        }
        for i in 0..8 {
            self.set_function(size - 1 - i, 8, false);
            self.set_function(8, size - 1 - i, false);
        }

        if version >= 7 {
            let bits = version_bits(version);
            for i in 0..18 {
                let dark = (bits >> i) & 1 == 1;
                let (a, b) = (size - 11 + i % 3, i / 3);
                self.set_function(a, b, dark);
                self.set_function(b, a, dark);
            }
        }
    }

    fn draw_format(&mut self, level: EccLevel, mask: u8) {
        let size = self.size;
        let bits = format_bits(level, mask);
        let bit = |i: usize| (bits >> i) & 1 == 1;
        for i in 0..=5 {
            self.set_function(8, i, bit(i));
        }
        self.set_function(8, 7, bit(6));
        self.set_function(8, 8, bit(7));
        self.set_function(7, 8, bit(8));
        for i in 9..15 {
            self.set_function(14 - i, 8, bit(i));
        }
        for i in 0..8 {
            self.set_function(size - 1 - i, 8, bit(i));
        }
        for i in 8..15 {
            self.set_function(8, size - 15 + i, bit(i));
        }
        self.set_function(8, size - 8, true);
    }

    fn place_data(&mut self, codewords: &[u8]) {
        let size = self.size;
        let total_bits = codewords.len() * 8;
        let mut right = size as isize - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x = right as usize - j;
                    let upward = (right + 1) & 2 == 0;
                    let y = if upward { size - 1 - vert } else { vert };
                    if self.function[y * size + x] {
                        continue;
                    }
                    let i = self.data_order.len();
                    if i < total_bits {
                        self.modules[y * size + x] = (codewords[i / 8] >> (7 - i % 8)) & 1 == 1;
                    }
                    self.data_order.push((x, y));
                }
            }
            right -= 2;
        }
    }

    fn apply_mask(&mut self, mask: u8) {
        for y in 0..self.size {
            for x in 0..self.size {
                if !self.function[y * self.size + x] && mask_flips(mask, x, y) {
                    self.modules[y * self.size + x] ^= true;
                }
            }
        }
    }

    /// Flip the first module of each of the first `count` codewords
    pub fn corrupt_codewords(&mut self, count: usize) {
        for c in 0..count {
            let (x, y) = self.data_order[c * 8];
            self.modules[y * self.size + x] ^= true;
        }
    }

    /// Mirror image across the main diagonal
    pub fn transposed(&self) -> Self {
        let mut out = self.clone();
        for y in 0..self.size {
            for x in 0..self.size {
                out.modules[x * self.size + y] = self.modules[y * self.size + x];
            }
        }
        out
    }
}

/// Encode `segments` as a symbol of exactly this version, level and mask
pub fn encode(version: u8, level: EccLevel, mask: u8, segments: &[Segment]) -> Symbol {
    let mut symbol = Symbol::blank(17 + 4 * version as usize);
    symbol.draw_function_patterns(version);
    symbol.place_data(&codewords(version, level, segments));
    symbol.apply_mask(mask);
    symbol.draw_format(level, mask);
    symbol
}

/// Render symbols placed at module offsets onto a white canvas
pub fn render(width_modules: usize, height_modules: usize, placed: &[(&Symbol, usize, usize)]) -> GrayImage {
    let mut img = GrayImage::from_pixel(
        width_modules as u32 * SCALE,
        height_modules as u32 * SCALE,
        Luma([255]),
    );
    for &(symbol, ox, oy) in placed {
        for y in 0..symbol.size {
            for x in 0..symbol.size {
                if !symbol.get(x, y) {
                    continue;
                }
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        let px = (ox + x) as u32 * SCALE + dx;
                        let py = (oy + y) as u32 * SCALE + dy;
                        img.put_pixel(px, py, Luma([0]));
                    }
                }
            }
        }
    }
    img
}

/// One symbol with a quiet zone on every side
pub fn render_single(symbol: &Symbol) -> GrayImage {
    let side = symbol.size + QUIET * 2;
    render(side, side, &[(symbol, QUIET, QUIET)])
}

/// Grey pixels repeated into `channels` bytes per pixel
pub fn with_channels(img: &GrayImage, channels: usize) -> Vec<u8> {
    img.as_raw()
        .iter()
        .flat_map(|&v| {
            let alpha = if channels == 4 { Some(255) } else { None };
            std::iter::repeat(v)
                .take(channels.min(3))
                .chain(alpha)
                .collect::<Vec<u8>>()
        })
        .collect()
}

fn encode_image(img: &GrayImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageLuma8(img.clone())
        .write_to(&mut Cursor::new(&mut out), format)
        .unwrap();
    out
}

pub fn png(img: &GrayImage) -> Vec<u8> {
    encode_image(img, ImageOutputFormat::Png)
}

pub fn jpeg(img: &GrayImage) -> Vec<u8> {
    encode_image(img, ImageOutputFormat::Jpeg(95))
}

/// Gap between the two symbols of [`hello_world`], in modules
pub const PAIR_GAP: usize = 12;

/// "Hello" (mask 1) and "World" (mask 3) side by side: version 1, level H,
/// UTF-8 ECI, byte mode
pub fn hello_world() -> GrayImage {
    let segments = |text: &[u8]| vec![Segment::Eci(26), Segment::bytes(text)];
    let hello = encode(1, EccLevel::H, 1, &segments(b"Hello"));
    let world = encode(1, EccLevel::H, 3, &segments(b"World"));
    let width = QUIET * 2 + hello.size + PAIR_GAP + world.size;
    let height = QUIET * 2 + hello.size;
    render(
        width,
        height,
        &[(&hello, QUIET, QUIET), (&world, QUIET + hello.size + PAIR_GAP, QUIET)],
    )
}
