use geo::{LineString, Polygon};

use super::Point;

/// A painted obstacle: a simple polygon and how hard it is to cross
///
/// `walkness` is in `[0, 1]`: 0 is free ground, 1 is a wall.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub vertices: Vec<Point>,
    pub walkness: f64,
}

impl Obstacle {
    pub fn new(vertices: Vec<Point>, walkness: f64) -> Self {
        Self { vertices, walkness }
    }

    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    pub fn is_impassable(&self) -> bool {
        self.walkness >= 1.0
    }

    /// Closed geo polygon for the obstacle outline
    pub fn polygon(&self) -> Polygon<f64> {
        polygon_of(&self.vertices)
    }
}

/// Obstacles compare by outline only; the walkness is not part of identity
impl PartialEq for Obstacle {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

pub(crate) fn polygon_of(vertices: &[Point]) -> Polygon<f64> {
    let ring: LineString<f64> = vertices.iter().map(|p| p.to_coord()).collect();
    Polygon::new(ring, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![Point::new(0, 0), Point::new(10, 0), Point::new(0, 10)]
    }

    #[test]
    fn test_equality_ignores_walkness() {
        let a = Obstacle::new(triangle(), 0.2);
        let b = Obstacle::new(triangle(), 0.9);
        assert_eq!(a, b);

        let mut shifted = triangle();
        shifted[0] = Point::new(1, 0);
        assert_ne!(a, Obstacle::new(shifted, 0.2));
    }

    #[test]
    fn test_polygon_is_closed() {
        let poly = Obstacle::new(triangle(), 0.5).polygon();
        // geo closes the ring by repeating the first coordinate
        assert_eq!(poly.exterior().0.len(), 4);
    }

    #[test]
    fn test_validity() {
        assert!(Obstacle::new(triangle(), 0.0).is_valid());
        assert!(!Obstacle::new(triangle()[..2].to_vec(), 0.0).is_valid());
        assert!(Obstacle::new(triangle(), 1.0).is_impassable());
    }
}
