/// 2D point in image (pixel-edge) or module coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Z component of `(a - self) x (b - self)`; positive when `b` is clockwise
    /// from `a` in image coordinates (y down)
    pub fn cross(&self, a: &Point, b: &Point) -> f32 {
        (a.x - self.x) * (b.y - self.y) - (a.y - self.y) * (b.x - self.x)
    }

    /// Cosine of the angle at `self` between rays to `a` and `b`
    pub fn cos_angle(&self, a: &Point, b: &Point) -> Option<f32> {
        let (v1x, v1y) = (a.x - self.x, a.y - self.y);
        let (v2x, v2y) = (b.x - self.x, b.y - self.y);
        let denom = (v1x * v1x + v1y * v1y).sqrt() * (v2x * v2x + v2y * v2y).sqrt();
        if denom == 0.0 {
            return None;
        }
        Some((v1x * v2x + v1y * v2y) / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_cross_orientation() {
        let tl = Point::new(10.0, 10.0);
        let tr = Point::new(50.0, 10.0);
        let bl = Point::new(10.0, 50.0);
        assert!(tl.cross(&tr, &bl) > 0.0);
        assert!(tl.cross(&bl, &tr) < 0.0);
    }

    #[test]
    fn test_cos_angle() {
        let p = Point::new(0.0, 0.0);
        let right = p.cos_angle(&Point::new(1.0, 0.0), &Point::new(0.0, 1.0));
        assert!(right.is_some_and(|c| c.abs() < 1e-6));
        assert_eq!(p.cos_angle(&p, &Point::new(1.0, 0.0)), None);
    }
}
