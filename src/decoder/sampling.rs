//! Grid sampling: map module centres into the binarized image and read them
use super::tables::dimension;
use crate::detector::grouping::implied_corner;
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::PerspectiveTransform;

/// Alignment matches below this many of 25 modules are ignored
const MIN_ALIGNMENT_MATCH: u32 = 23;

fn pixel(binary: &BitMatrix, p: &Point) -> bool {
    if !(p.x >= 0.0 && p.y >= 0.0) {
        return false;
    }
    binary.get(p.x as usize, p.y as usize)
}

/// Module-to-image transform for a symbol of `version` with finder centres
/// `tl`, `tr`, `bl`. The fourth correspondence is the bottom-right alignment
/// pattern when one can be found, otherwise the parallelogram corner.
pub fn module_transform(
    binary: &BitMatrix,
    version: u8,
    tl: Point,
    tr: Point,
    bl: Point,
) -> Option<PerspectiveTransform> {
    let dim = dimension(version) as f32;
    let finders = [
        Point::new(3.5, 3.5),
        Point::new(dim - 3.5, 3.5),
        Point::new(3.5, dim - 3.5),
    ];
    let br = implied_corner(&tl, &tr, &bl);
    let affine = PerspectiveTransform::from_points(
        &[finders[0], finders[1], finders[2], Point::new(dim - 3.5, dim - 3.5)],
        &[tl, tr, bl, br],
    )?;

    if version < 2 {
        return Some(affine);
    }

    let align_module = Point::new(dim - 6.5, dim - 6.5);
    let refined = find_alignment(binary, &affine, align_module).and_then(|found| {
        PerspectiveTransform::from_points(
            &[finders[0], finders[1], finders[2], align_module],
            &[tl, tr, bl, found],
        )
    });
    Some(refined.unwrap_or(affine))
}

/// Search near the predicted bottom-right alignment pattern for the position
/// whose 5x5 neighbourhood best matches dark-light-dark rings
fn find_alignment(
    binary: &BitMatrix,
    affine: &PerspectiveTransform,
    module: Point,
) -> Option<Point> {
    let predicted = affine.transform(&module);
    let right = affine.transform(&Point::new(module.x + 1.0, module.y));
    let down = affine.transform(&Point::new(module.x, module.y + 1.0));
    let ux = Point::new(right.x - predicted.x, right.y - predicted.y);
    let uy = Point::new(down.x - predicted.x, down.y - predicted.y);
    let step = (ux.x.hypot(ux.y) + uy.x.hypot(uy.y)) / 2.0;
    if !step.is_finite() || step <= 0.0 {
        return None;
    }

    let radius = (step * 4.0).ceil().max(2.0) as i32;
    let base = Point::new(predicted.x.floor() + 0.5, predicted.y.floor() + 0.5);

    let mut best = 0u32;
    let mut sum = Point::default();
    let mut ties = 0u32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let c = Point::new(base.x + dx as f32, base.y + dy as f32);
            let mut score = 0u32;
            for j in -2i32..=2 {
                for i in -2i32..=2 {
                    let expected_dark = i.abs().max(j.abs()) != 1;
                    let p = Point::new(
                        c.x + ux.x * i as f32 + uy.x * j as f32,
                        c.y + ux.y * i as f32 + uy.y * j as f32,
                    );
                    if pixel(binary, &p) == expected_dark {
                        score += 1;
                    }
                }
            }
            if score > best {
                best = score;
                sum = c;
                ties = 1;
            } else if score == best {
                sum = Point::new(sum.x + c.x, sum.y + c.y);
                ties += 1;
            }
        }
    }

    if best < MIN_ALIGNMENT_MATCH || ties == 0 {
        return None;
    }
    Some(Point::new(sum.x / ties as f32, sum.y / ties as f32))
}

/// Read every module of a `dim` x `dim` grid through `transform`
pub fn sample_grid(binary: &BitMatrix, transform: &PerspectiveTransform, dim: usize) -> BitMatrix {
    let mut grid = BitMatrix::new(dim, dim);
    for row in 0..dim {
        for col in 0..dim {
            let p = transform.transform(&Point::new(col as f32 + 0.5, row as f32 + 0.5));
            if pixel(binary, &p) {
                grid.set(col, row, true);
            }
        }
    }
    grid
}
