use geo::Polygon;

use crate::domain::{Obstacle, Point};
use crate::geometry::{polygon_holds_segment, segment_intersects_polygon};
use crate::search::PathPoint;

/// Obstacle outlines prepared for repeated line-of-sight checks
pub struct Occluders {
    polygons: Vec<Polygon<f64>>,
}

impl Occluders {
    /// Obstacles with zero walkness cost nothing to enter and never occlude
    pub fn new(obstacles: &[Obstacle]) -> Self {
        Self {
            polygons: obstacles
                .iter()
                .filter(|o| o.walkness > 0.0)
                .map(|o| o.polygon())
                .collect(),
        }
    }

    /// A straight move from `a` to `b` is blocked when it touches an
    /// obstacle without staying entirely inside that same obstacle
    pub fn blocks(&self, a: Point, b: Point) -> bool {
        self.polygons
            .iter()
            .any(|poly| segment_intersects_polygon(a, b, poly) && !polygon_holds_segment(poly, a, b))
    }
}

/// Line-of-sight reduction, repeated until no further point can be dropped
pub fn smooth(path: &[PathPoint], obstacles: &[Obstacle]) -> Vec<PathPoint> {
    smooth_with(path, &Occluders::new(obstacles), None)
}

/// Line-of-sight reduction with an optional cap on shortcut length
///
/// First and last points always survive. The result is a fixed point of a
/// single pass, so smoothing it again returns it unchanged.
pub fn smooth_with(
    path: &[PathPoint],
    occluders: &Occluders,
    max_span: Option<f64>,
) -> Vec<PathPoint> {
    let mut current = dedup(path.to_vec());
    loop {
        let next = dedup(smooth_pass(&current, occluders, max_span));
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

fn smooth_pass(path: &[PathPoint], occluders: &Occluders, max_span: Option<f64>) -> Vec<PathPoint> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut smoothed = vec![path[0]];
    let mut anchor = 0;

    for i in 2..path.len() {
        if i - anchor < 2 {
            continue;
        }
        let from = path[anchor].real;
        let to = path[i].real;
        let too_long = max_span.is_some_and(|span| from.distance(to) > span);
        if too_long || occluders.blocks(from, to) {
            anchor = i - 1;
            smoothed.push(path[anchor]);
        }
    }

    smoothed.push(path[path.len() - 1]);
    smoothed
}

/// Drop consecutive points that sit on the same field position
pub(crate) fn dedup(mut path: Vec<PathPoint>) -> Vec<PathPoint> {
    path.dedup_by(|b, a| a.real == b.real);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{GridCoord, Mesh};
    use crate::search::find;

    fn pp(x: i32, y: i32) -> PathPoint {
        PathPoint::new(GridCoord::new(x / 2, y / 2), Point::new(x, y))
    }

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32, walkness: f64) -> Obstacle {
        Obstacle::new(
            vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
            walkness,
        )
    }

    #[test]
    fn test_straight_line_collapses() {
        let path: Vec<PathPoint> = (0..10).map(|k| pp(k * 2, k * 2)).collect();
        let smoothed = smooth(&path, &[]);
        assert_eq!(smoothed, vec![pp(0, 0), pp(18, 18)]);
    }

    #[test]
    fn test_short_paths_pass_through() {
        assert!(smooth(&[], &[]).is_empty());
        assert_eq!(smooth(&[pp(0, 0)], &[]), vec![pp(0, 0)]);
        let pair = vec![pp(0, 0), pp(4, 4)];
        assert_eq!(smooth(&pair, &[]), pair);
    }

    #[test]
    fn test_keeps_corner_around_obstacle() {
        let wall = rect(10, 0, 20, 20, 1.0);
        // L-shaped detour below the wall
        let path = vec![pp(0, 10), pp(0, 30), pp(30, 30), pp(30, 10)];
        let smoothed = smooth(&path, &[wall.clone()]);

        assert_eq!(smoothed.first(), path.first());
        assert_eq!(smoothed.last(), path.last());
        let occluders = Occluders::new(&[wall]);
        for w in smoothed.windows(2) {
            assert!(!occluders.blocks(w[0].real, w[1].real));
        }
        assert!(smoothed.len() >= 3);
    }

    #[test]
    fn test_segment_inside_one_obstacle_is_not_blocked() {
        let swamp = rect(10, 10, 50, 50, 0.5);
        let occluders = Occluders::new(&[swamp]);
        assert!(!occluders.blocks(Point::new(20, 20), Point::new(40, 30)));
        assert!(occluders.blocks(Point::new(0, 30), Point::new(40, 30)));
        assert!(!occluders.blocks(Point::new(0, 0), Point::new(60, 0)));
    }

    #[test]
    fn test_free_obstacles_never_block() {
        let meadow = rect(10, 10, 50, 50, 0.0);
        let occluders = Occluders::new(&[meadow]);
        assert!(!occluders.blocks(Point::new(0, 30), Point::new(60, 30)));
    }

    #[test]
    fn test_smoothing_is_idempotent() {
        let obstacles = vec![rect(30, 0, 40, 70, 1.0), rect(60, 30, 70, 100, 1.0)];
        let mesh = Mesh::build(100, 100, &obstacles, 2);
        let raw = find(&mesh, Point::new(10, 10), Point::new(90, 90))
            .unwrap()
            .path;

        let once = smooth(&raw, &obstacles);
        let twice = smooth(&once, &obstacles);
        assert_eq!(once, twice);
        assert!(once.len() < raw.len());
    }

    #[test]
    fn test_span_cap_keeps_intermediate_points() {
        let path: Vec<PathPoint> = (0..6).map(|k| pp(k * 10, 0)).collect();
        let capped = smooth_with(&path, &Occluders::new(&[]), Some(10.0));
        assert_eq!(capped, path);
    }

    #[test]
    fn test_dedup_removes_repeats() {
        let path = vec![pp(0, 0), pp(0, 0), pp(2, 2), pp(2, 2), pp(4, 4)];
        assert_eq!(dedup(path), vec![pp(0, 0), pp(2, 2), pp(4, 4)]);
    }
}
