use geo::{Closest, ClosestPoint, Line};

use crate::domain::Point;

pub fn line_between(a: Point, b: Point) -> Line<f64> {
    Line::new(a.to_coord(), b.to_coord())
}

/// Project `p` onto the segment `a`-`b`, clamped to the segment ends
///
/// The projection is rounded back onto the integer field grid.
pub fn nearest_point_on_segment(a: Point, b: Point, p: Point) -> Point {
    if a == b {
        return a;
    }
    let target = geo::Point::from(p.to_coord());
    match line_between(a, b).closest_point(&target) {
        Closest::Intersection(q) | Closest::SinglePoint(q) => Point::from_coord(q.0),
        Closest::Indeterminate => a,
    }
}

/// Distance from `p` to the closest point of segment `a`-`b`
pub fn distance_to_segment(a: Point, b: Point, p: Point) -> f64 {
    if a == b {
        return a.distance(p);
    }
    let target = geo::Point::from(p.to_coord());
    match line_between(a, b).closest_point(&target) {
        Closest::Intersection(q) | Closest::SinglePoint(q) => {
            (q.x() - p.x as f64).hypot(q.y() - p.y as f64)
        }
        Closest::Indeterminate => a.distance(p),
    }
}
