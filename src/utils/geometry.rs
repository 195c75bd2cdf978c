//! Projective mapping from QR module space to image space
use crate::models::Point;

/// 3x3 homography with the bottom-right coefficient fixed at 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    m: [f64; 8],
}

impl PerspectiveTransform {
    /// Homography taking each `src[i]` to `dst[i]`; `None` when the points are
    /// degenerate (three of them collinear)
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        let mut a = [[0.0f64; 9]; 8];

        for (i, (s, d)) in src.iter().zip(dst).enumerate() {
            let (sx, sy) = (s.x as f64, s.y as f64);
            let (dx, dy) = (d.x as f64, d.y as f64);
            a[2 * i] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy, dx];
            a[2 * i + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy, dy];
        }

        solve(a).map(|m| Self { m })
    }

    /// Map a point through the homography
    pub fn transform(&self, p: &Point) -> Point {
        let (x, y) = (p.x as f64, p.y as f64);
        let m = &self.m;
        let w = m[6] * x + m[7] * y + 1.0;
        if w.abs() < 1e-12 {
            return Point::new(f32::NAN, f32::NAN);
        }
        Point::new(
            ((m[0] * x + m[1] * y + m[2]) / w) as f32,
            ((m[3] * x + m[4] * y + m[5]) / w) as f32,
        )
    }
}

/// Gauss-Jordan elimination with partial pivoting on an augmented 8x9 system
#[allow(clippy::needless_range_loop)]
fn solve(mut a: [[f64; 9]; 8]) -> Option<[f64; 8]> {
    for col in 0..8 {
        let pivot = (col..8).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);

        let inv = 1.0 / a[col][col];
        for k in col..9 {
            a[col][k] *= inv;
        }
        for row in 0..8 {
            if row == col || a[row][col] == 0.0 {
                continue;
            }
            let factor = a[row][col];
            for k in col..9 {
                a[row][k] -= factor * a[col][k];
            }
        }
    }

    let mut out = [0.0; 8];
    for (i, row) in a.iter().enumerate() {
        out[i] = row[8];
    }
    Some(out)
}
