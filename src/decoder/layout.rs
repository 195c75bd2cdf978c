//! Module layout of a QR symbol: function patterns, data masks, codeword
//! placement order and block interleaving.
use super::tables::{BlockLayout, alignment_positions, dimension};
use crate::models::BitMatrix;

/// Whether the data mask `mask` flips the module at column `x`, row `y`
pub fn mask_bit(mask: u8, x: usize, y: usize) -> bool {
    match mask {
        0 => (x + y) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (x + y) % 3 == 0,
        4 => (x / 3 + y / 2) % 2 == 0,
        5 => x * y % 2 + x * y % 3 == 0,
        6 => (x * y % 2 + x * y % 3) % 2 == 0,
        7 => ((x + y) % 2 + x * y % 3) % 2 == 0,
        _ => false,
    }
}

fn fill(mask: &mut BitMatrix, x0: usize, y0: usize, w: usize, h: usize) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            mask.set(x, y, true);
        }
    }
}

/// Modules reserved for finders, separators, timing, alignment, format and
/// version information (true = function module)
pub fn function_mask(version: u8) -> BitMatrix {
    let size = dimension(version);
    let mut mask = BitMatrix::new(size, size);

    // Finder patterns with separators and the format areas next to them
    fill(&mut mask, 0, 0, 9, 9);
    fill(&mut mask, size - 8, 0, 8, 9);
    fill(&mut mask, 0, size - 8, 9, 8);

    // Timing patterns
    fill(&mut mask, 6, 0, 1, size);
    fill(&mut mask, 0, 6, size, 1);

    let centres = alignment_positions(version);
    let last = centres.len().saturating_sub(1);
    for (i, &cy) in centres.iter().enumerate() {
        for (j, &cx) in centres.iter().enumerate() {
            // Corners taken by finder patterns
            if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                continue;
            }
            fill(&mut mask, cx - 2, cy - 2, 5, 5);
        }
    }

    if version >= 7 {
        fill(&mut mask, size - 11, 0, 3, 6);
        fill(&mut mask, 0, size - 11, 6, 3);
    }

    mask
}

/// Data module coordinates (x, y) in codeword bit order: two-column strips
/// from the right edge, alternating upward and downward, skipping the
/// vertical timing column
pub fn data_module_order(version: u8) -> Vec<(usize, usize)> {
    let size = dimension(version);
    let function = function_mask(version);
    let mut order = Vec::with_capacity(size * size);

    let mut right = size as isize - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let r = right as usize;
        let upward = (r + 1) & 2 == 0;
        for vert in 0..size {
            let y = if upward { size - 1 - vert } else { vert };
            for x in [r, r - 1] {
                if !function.get(x, y) {
                    order.push((x, y));
                }
            }
        }
        right -= 2;
    }

    order
}

/// Unmask the grid and read every codeword, in placement order
pub fn read_codewords(grid: &BitMatrix, version: u8, mask: u8, total: usize) -> Vec<u8> {
    let mut codewords = vec![0u8; total];
    for (i, (x, y)) in data_module_order(version)
        .into_iter()
        .take(total * 8)
        .enumerate()
    {
        if grid.get(x, y) ^ mask_bit(mask, x, y) {
            codewords[i / 8] |= 0x80 >> (i % 8);
        }
    }
    codewords
}

/// Split interleaved codewords back into blocks (data then ECC in each)
pub fn deinterleave(codewords: &[u8], layout: &BlockLayout) -> Vec<Vec<u8>> {
    let short_len = layout.short_block_len();
    let short_blocks = layout.short_blocks();
    let short_data = short_len - layout.ecc_per_block;

    let mut blocks: Vec<Vec<u8>> = (0..layout.blocks)
        .map(|b| Vec::with_capacity(short_len + usize::from(b >= short_blocks)))
        .collect();

    let mut next = codewords.iter().copied();
    for i in 0..=short_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            // Short blocks have no codeword at the long blocks' extra data slot
            if i == short_data && b < short_blocks {
                continue;
            }
            if let Some(c) = next.next() {
                block.push(c);
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::super::tables::raw_data_modules;
    use super::*;
    use crate::models::EccLevel;

    #[test]
    fn test_data_modules_match_capacity() {
        for version in [1u8, 2, 6, 7, 14, 27, 40] {
            assert_eq!(data_module_order(version).len(), raw_data_modules(version));
        }
    }

    #[test]
    fn test_placement_starts_bottom_right() {
        let order = data_module_order(1);
        assert_eq!(&order[..4], &[(20, 20), (19, 20), (20, 19), (19, 19)]);
    }

    #[test]
    fn test_mask_patterns() {
        assert!(mask_bit(0, 0, 0));
        assert!(!mask_bit(0, 1, 0));
        assert!(mask_bit(1, 5, 0));
        assert!(!mask_bit(1, 0, 1));
        assert!(mask_bit(2, 3, 1));
        assert!(!mask_bit(2, 1, 3));
    }

    #[test]
    fn test_read_codewords_unmasks() {
        let version = 1;
        let mut grid = BitMatrix::new(21, 21);
        let payload = [0xA5u8, 0x3C];
        for (i, (x, y)) in data_module_order(version).into_iter().take(16).enumerate() {
            let bit = (payload[i / 8] >> (7 - i % 8)) & 1 == 1;
            grid.set(x, y, bit ^ mask_bit(4, x, y));
        }
        let codewords = read_codewords(&grid, version, 4, 26);
        assert_eq!(&codewords[..2], &payload);
    }

    #[test]
    fn test_deinterleave_mixed_blocks() {
        // 5-Q: 2 blocks of 15+18 and 2 blocks of 16+18 codewords
        let layout = BlockLayout::new(5, EccLevel::Q).unwrap();
        let mut blocks: Vec<Vec<u8>> = Vec::new();
        let mut value = 0u8;
        for b in 0..4 {
            let len = if b < 2 { 33 } else { 34 };
            blocks.push((0..len).map(|_| { value = value.wrapping_add(1); value }).collect());
        }

        // Interleave: data columns, then ECC columns
        let mut interleaved = Vec::new();
        for i in 0..16 {
            for block in &blocks {
                let data_len = block.len() - 18;
                if i < data_len {
                    interleaved.push(block[i]);
                }
            }
        }
        for i in 0..18 {
            for block in &blocks {
                interleaved.push(block[block.len() - 18 + i]);
            }
        }

        assert_eq!(deinterleave(&interleaved, &layout), blocks);
    }
}
