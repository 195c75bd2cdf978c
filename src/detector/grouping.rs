//! Grouping of finder patterns into candidate symbols
use super::finder::FinderPattern;
use crate::models::{Point, VERSION_MAX, VERSION_MIN};

/// Largest module-size ratio between the three finders of one symbol
const MAX_SIZE_RATIO: f32 = 1.5;
/// Largest |cos| of the corner angle at the top-left finder
const MAX_CORNER_COS: f32 = 0.35;
/// Largest ratio between the two legs leaving the top-left finder
const MAX_LEG_RATIO: f32 = 1.25;
/// Patterns considered; keeps the triple search bounded on noisy images
const MAX_PATTERNS: usize = 64;

/// Three finder patterns arranged like the corners of one QR symbol.
/// Fields index into the pattern list the group was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderGroup {
    /// Finder at the right-angle corner
    pub top_left: usize,
    /// Finder along the first row
    pub top_right: usize,
    /// Finder along the first column
    pub bottom_left: usize,
    /// Average module size of the three finders
    pub module_size: f32,
    /// Version implied by the finder spacing
    pub version_estimate: u8,
    /// Lower is better
    pub score: f32,
}

impl FinderGroup {
    /// The three pattern indices
    pub fn members(&self) -> [usize; 3] {
        [self.top_left, self.top_right, self.bottom_left]
    }

    /// Smallest member index, i.e. when this symbol was first seen
    pub fn first_seen(&self) -> usize {
        self.top_left.min(self.top_right).min(self.bottom_left)
    }

    /// Whether `point` lies on the symbol this group outlines, quiet zone
    /// excluded. Finder centres sit 3.5 modules in from the outer edge.
    pub fn covers(&self, patterns: &[FinderPattern], point: &Point) -> bool {
        let tl = patterns[self.top_left].center;
        let tr = patterns[self.top_right].center;
        let bl = patterns[self.bottom_left].center;

        let det = tl.cross(&tr, &bl);
        let row = tl.distance(&tr);
        let col = tl.distance(&bl);
        if det.abs() < f32::EPSILON || row == 0.0 || col == 0.0 {
            return false;
        }

        // Coordinates along the row and column axes, 0 and 1 at the finder centres
        let u = tl.cross(point, &bl) / det;
        let v = tl.cross(&tr, point) / det;
        let margin = 3.5 * self.module_size;
        let (u_margin, v_margin) = (margin / row, margin / col);
        (-u_margin..=1.0 + u_margin).contains(&u) && (-v_margin..=1.0 + v_margin).contains(&v)
    }
}

/// Version whose dimension best matches the spacing between two finder centres
pub fn version_from_spacing(distance: f32, module_size: f32) -> i32 {
    let dimension = distance / module_size + 7.0;
    ((dimension - 17.0) / 4.0).round() as i32
}

fn try_group(patterns: &[FinderPattern], corner: usize, a: usize, b: usize) -> Option<FinderGroup> {
    let tl = &patterns[corner];
    let pa = &patterns[a];
    let pb = &patterns[b];

    let sizes = [tl.module_size, pa.module_size, pb.module_size];
    let min_size = sizes.iter().copied().fold(f32::INFINITY, f32::min);
    let max_size = sizes.iter().copied().fold(0.0, f32::max);
    if min_size <= 0.0 {
        return None;
    }
    let size_ratio = max_size / min_size;
    if size_ratio > MAX_SIZE_RATIO {
        return None;
    }

    let cos = tl.center.cos_angle(&pa.center, &pb.center)?.abs();
    if cos > MAX_CORNER_COS {
        return None;
    }

    let leg_a = tl.center.distance(&pa.center);
    let leg_b = tl.center.distance(&pb.center);
    let leg_ratio = leg_a.max(leg_b) / leg_a.min(leg_b);
    if leg_ratio > MAX_LEG_RATIO {
        return None;
    }

    let module_size = (sizes[0] + sizes[1] + sizes[2]) / 3.0;
    let version_a = version_from_spacing(leg_a, module_size);
    let version_b = version_from_spacing(leg_b, module_size);
    if (version_a - version_b).abs() > 1 {
        return None;
    }
    let estimate = version_from_spacing((leg_a + leg_b) / 2.0, module_size);
    if estimate < VERSION_MIN as i32 - 1 || estimate > VERSION_MAX as i32 + 1 {
        return None;
    }

    // Clockwise (y down) from top-right to bottom-left
    let (top_right, bottom_left) = if tl.center.cross(&pa.center, &pb.center) > 0.0 {
        (a, b)
    } else {
        (b, a)
    };

    Some(FinderGroup {
        top_left: corner,
        top_right,
        bottom_left,
        module_size,
        version_estimate: estimate.clamp(VERSION_MIN as i32, VERSION_MAX as i32) as u8,
        score: size_ratio * 2.0 + leg_ratio + cos,
    })
}

/// Candidate groups, best score first, at most `max_groups` of them
pub fn group_patterns(patterns: &[FinderPattern], max_groups: usize) -> Vec<FinderGroup> {
    let n = patterns.len().min(MAX_PATTERNS);
    let mut groups = Vec::new();

    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                // The corner is the vertex opposite the longest side
                let (ci, cj, ck) = (&patterns[i].center, &patterns[j].center, &patterns[k].center);
                let opposite = [
                    cj.distance(ck),
                    ci.distance(ck),
                    ci.distance(cj),
                ];
                let corner = if opposite[0] >= opposite[1] && opposite[0] >= opposite[2] {
                    (i, j, k)
                } else if opposite[1] >= opposite[2] {
                    (j, i, k)
                } else {
                    (k, i, j)
                };
                if let Some(group) = try_group(patterns, corner.0, corner.1, corner.2) {
                    groups.push(group);
                }
            }
        }
    }

    groups.sort_by(|a, b| a.score.total_cmp(&b.score));
    groups.truncate(max_groups);
    groups
}

/// Image position of the fourth corner of the parallelogram spanned by a group
pub fn implied_corner(tl: &Point, tr: &Point, bl: &Point) -> Point {
    Point::new(tr.x + bl.x - tl.x, tr.y + bl.y - tl.y)
}
