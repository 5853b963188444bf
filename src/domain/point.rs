use geo::Coord;

/// Integer point on the field, in field units (pixels for the editor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round a real coordinate to the nearest integer point
    pub fn from_coord(c: Coord<f64>) -> Self {
        Self {
            x: c.x.round() as i32,
            y: c.y.round() as i32,
        }
    }

    pub fn to_coord(self) -> Coord<f64> {
        geo::coord! { x: self.x as f64, y: self.y as f64 }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }

    /// Check that the point lies inside `[0, width] x [0, height]`
    pub fn within(self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x as i64 <= width as i64 && self.y as i64 <= height as i64
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_within_is_inclusive() {
        assert!(Point::new(0, 0).within(100, 100));
        assert!(Point::new(100, 100).within(100, 100));
        assert!(!Point::new(101, 50).within(100, 100));
        assert!(!Point::new(-1, 50).within(100, 100));
    }

    #[test]
    fn test_from_coord_rounds() {
        let p = Point::from_coord(geo::coord! { x: 2.6, y: -0.4 });
        assert_eq!(p, Point::new(3, 0));
    }
}
