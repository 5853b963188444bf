use crate::domain::Point;
use crate::search::PathPoint;

use super::{dedup, path_point};

/// Resample a polyline so consecutive points are `interval` apart
///
/// Every original vertex is kept; each segment gets extra points at whole
/// multiples of `interval` from its start. The remainder of a segment shorter
/// than `interval` ends at the next original vertex.
pub fn splice(path: &[PathPoint], interval: f64, cell_size: u32) -> Vec<PathPoint> {
    if path.len() < 2 || interval <= 0.0 {
        return path.to_vec();
    }

    let mut spliced = vec![path[0]];
    for w in path.windows(2) {
        let (a, b) = (w[0].real, w[1].real);
        let length = a.distance(b);
        let dx = (b.x - a.x) as f64 / length;
        let dy = (b.y - a.y) as f64 / length;

        let mut travelled = interval;
        while travelled < length {
            let real = Point::from_coord(geo::coord! {
                x: a.x as f64 + dx * travelled,
                y: a.y as f64 + dy * travelled,
            });
            spliced.push(path_point(real, cell_size));
            travelled += interval;
        }
        spliced.push(w[1]);
    }

    dedup(spliced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::GridCoord;

    fn pp(x: i32, y: i32) -> PathPoint {
        PathPoint::new(GridCoord::new(x / 4, y / 4), Point::new(x, y))
    }

    #[test]
    fn test_even_spacing_on_straight_segment() {
        let spliced = splice(&[pp(0, 0), pp(40, 0)], 10.0, 4);
        let xs: Vec<i32> = spliced.iter().map(|p| p.real.x).collect();
        assert_eq!(xs, vec![0, 10, 20, 30, 40]);
        assert_eq!(spliced[2].mesh, GridCoord::new(5, 0));
    }

    #[test]
    fn test_remainder_ends_at_vertex() {
        let spliced = splice(&[pp(0, 0), pp(0, 25), pp(30, 25)], 10.0, 4);
        let reals: Vec<Point> = spliced.iter().map(|p| p.real).collect();
        assert_eq!(
            reals,
            vec![
                Point::new(0, 0),
                Point::new(0, 10),
                Point::new(0, 20),
                Point::new(0, 25),
                Point::new(10, 25),
                Point::new(20, 25),
                Point::new(30, 25),
            ]
        );
    }

    #[test]
    fn test_no_gap_exceeds_interval() {
        let path = vec![pp(0, 0), pp(37, 91), pp(120, 13)];
        let spliced = splice(&path, 7.0, 4);
        for w in spliced.windows(2) {
            // one unit of slack for rounding onto the integer grid
            assert!(w[0].real.distance(w[1].real) <= 8.0);
        }
        assert_eq!(spliced.first(), path.first());
        assert_eq!(spliced.last(), path.last());
    }

    #[test]
    fn test_short_input_unchanged() {
        assert_eq!(splice(&[pp(3, 3)], 5.0, 4), vec![pp(3, 3)]);
        let pair = vec![pp(0, 0), pp(20, 0)];
        assert_eq!(splice(&pair, 0.0, 4), pair);
    }
}
