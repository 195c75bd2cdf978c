//! Finder pattern detection: 1:1:3:1:1 row scan confirmed by vertical,
//! horizontal and diagonal cross-checks
use crate::models::{BitMatrix, Point};

/// A located finder pattern (centre in pixel-edge coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    /// Centre of the 3x3 core
    pub center: Point,
    /// Estimated module size in pixels
    pub module_size: f32,
    /// How many scan rows confirmed this pattern
    pub hits: u32,
}

impl FinderPattern {
    /// A pattern seen once
    pub fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            hits: 1,
        }
    }

    fn is_near(&self, other: &FinderPattern) -> bool {
        let tolerance = self.module_size.max(1.0);
        (self.center.x - other.center.x).abs() <= tolerance
            && (self.center.y - other.center.y).abs() <= tolerance
            && (self.module_size - other.module_size).abs() <= tolerance
    }

    fn absorb(&mut self, other: &FinderPattern) {
        let total = (self.hits + other.hits) as f32;
        let w_self = self.hits as f32 / total;
        let w_other = other.hits as f32 / total;
        self.center = Point::new(
            self.center.x * w_self + other.center.x * w_other,
            self.center.y * w_self + other.center.y * w_other,
        );
        self.module_size = self.module_size * w_self + other.module_size * w_other;
        self.hits += other.hits;
    }
}

/// Scans a binarized image for finder patterns
pub struct FinderDetector;

impl FinderDetector {
    /// Every distinct finder pattern, in the order it was first seen
    pub fn detect(matrix: &BitMatrix) -> Vec<FinderPattern> {
        let mut patterns: Vec<FinderPattern> = Vec::new();
        for y in 0..matrix.height() {
            for candidate in Self::scan_row(matrix, y) {
                match patterns.iter_mut().find(|p| p.is_near(&candidate)) {
                    Some(existing) => existing.absorb(&candidate),
                    None => patterns.push(candidate),
                }
            }
        }
        patterns
    }

    fn scan_row(matrix: &BitMatrix, y: usize) -> Vec<FinderPattern> {
        let width = matrix.width();
        let mut found = Vec::new();
        // Most recent five runs; odd positions are light when counts[4] is dark
        let mut counts = [0usize; 5];
        let mut filled = 0usize;
        let mut current = false;
        let mut run = 0usize;

        for x in 0..=width {
            let dark = x < width && matrix.get(x, y);
            if x < width && dark == current {
                run += 1;
                continue;
            }

            if run > 0 {
                counts.rotate_left(1);
                counts[4] = run;
                filled = (filled + 1).min(5);
                if current && filled == 5 && Self::ratio_ok(&counts) {
                    if let Some(pattern) = Self::confirm(matrix, &counts, x, y) {
                        found.push(pattern);
                    }
                }
            }
            current = dark;
            run = 1;
        }

        found
    }

    /// 1:1:3:1:1 within half a module on every run, core included
    fn ratio_ok(counts: &[usize; 5]) -> bool {
        let total: usize = counts.iter().sum();
        if total < 7 {
            return false;
        }
        let module = total as f32 / 7.0;
        let tolerance = module / 2.0;
        (counts[0] as f32 - module).abs() < tolerance
            && (counts[1] as f32 - module).abs() < tolerance
            && (counts[2] as f32 - 3.0 * module).abs() < tolerance
            && (counts[3] as f32 - module).abs() < tolerance
            && (counts[4] as f32 - module).abs() < tolerance
    }

    /// Loose variant for diagonals, where runs are noisier
    fn ratio_loose(counts: &[usize; 5]) -> bool {
        let total: usize = counts.iter().sum();
        if total < 7 {
            return false;
        }
        let module = total as f32 / 7.0;
        let tolerance = module / 1.333;
        (counts[0] as f32 - module).abs() < tolerance
            && (counts[1] as f32 - module).abs() < tolerance
            && (counts[2] as f32 - 3.0 * module).abs() < 3.0 * tolerance
            && (counts[3] as f32 - module).abs() < tolerance
            && (counts[4] as f32 - module).abs() < tolerance
    }

    /// Cross-check a row hit ending at `end_x` (exclusive)
    fn confirm(matrix: &BitMatrix, counts: &[usize; 5], end_x: usize, y: usize) -> Option<FinderPattern> {
        let row_total: usize = counts.iter().sum();
        let center_x = end_x as f32 - counts[4] as f32 - counts[3] as f32 - counts[2] as f32 / 2.0;
        let max_run = counts[2] * 2;

        let (center_y, col_total) = Self::cross_check(matrix, center_x as usize, y, true, max_run, row_total)?;
        let (center_x, refined_total) =
            Self::cross_check(matrix, center_x as usize, center_y as usize, false, max_run, row_total)?;

        if !Self::diagonal_ok(matrix, center_x as usize, center_y as usize, max_run) {
            return None;
        }

        let module = (row_total + col_total + refined_total) as f32 / 21.0;
        Some(FinderPattern::new(center_x, center_y, module))
    }

    /// Walk outwards from `(x, y)` along a column (`vertical`) or a row and
    /// measure the five runs through the pattern. Returns the centre of the
    /// core run along that axis and the total pattern length.
    fn cross_check(
        matrix: &BitMatrix,
        x: usize,
        y: usize,
        vertical: bool,
        max_run: usize,
        expected_total: usize,
    ) -> Option<(f32, usize)> {
        let (start, len) = if vertical {
            (y, matrix.height())
        } else {
            (x, matrix.width())
        };
        let dark = |i: usize| {
            if vertical {
                matrix.get(x, i)
            } else {
                matrix.get(i, y)
            }
        };
        if !dark(start) {
            return None;
        }

        let mut counts = [0usize; 5];

        // Towards lower indices: core, light ring, outer ring
        let mut i = start as isize;
        for (slot, want_dark) in [(2, true), (1, false), (0, true)] {
            while i >= 0 && dark(i as usize) == want_dark && counts[slot] <= max_run {
                counts[slot] += 1;
                i -= 1;
            }
            if counts[slot] == 0 || counts[slot] > max_run {
                return None;
            }
        }
        let core_start = start + 1 - counts[2];

        // Towards higher indices
        let mut i = start + 1;
        for (slot, want_dark) in [(2, true), (3, false), (4, true)] {
            while i < len && dark(i) == want_dark && counts[slot] <= max_run {
                counts[slot] += 1;
                i += 1;
            }
            if counts[slot] == 0 || counts[slot] > max_run {
                return None;
            }
        }
        let core_end = core_start + counts[2];

        let total: usize = counts.iter().sum();
        if total * 2 < expected_total || total > expected_total * 2 || !Self::ratio_ok(&counts) {
            return None;
        }
        Some(((core_start + core_end) as f32 / 2.0, total))
    }

    fn diagonal_ok(matrix: &BitMatrix, x: usize, y: usize, max_run: usize) -> bool {
        if !matrix.get(x, y) {
            return false;
        }
        let mut counts = [0usize; 5];

        let mut step = 0usize;
        for (slot, want_dark) in [(2, true), (1, false), (0, true)] {
            while step <= x && step <= y && matrix.get(x - step, y - step) == want_dark {
                counts[slot] += 1;
                step += 1;
                if counts[slot] > max_run {
                    return false;
                }
            }
        }

        let mut step = 1usize;
        for (slot, want_dark) in [(2, true), (3, false), (4, true)] {
            while x + step < matrix.width()
                && y + step < matrix.height()
                && matrix.get(x + step, y + step) == want_dark
            {
                counts[slot] += 1;
                step += 1;
                if counts[slot] > max_run {
                    return false;
                }
            }
        }

        Self::ratio_loose(&counts)
    }
}
