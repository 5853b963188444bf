use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Centroid, Contains, Intersects, Line, Polygon};

use crate::domain::Point;
use crate::domain::obstacle::polygon_of;

use super::segment::line_between;

/// Closed point-in-polygon test (boundary counts as inside)
///
/// For the simple polygons the editor allows this agrees with the even-odd
/// rule everywhere off the boundary.
pub fn contains_point(polygon: &Polygon<f64>, p: Point) -> bool {
    polygon.intersects(&p.to_coord())
}

/// Do two polygon areas share any point, boundary included
pub fn polygons_intersect(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    a.intersects(b)
}

/// Does the segment `a`-`b` touch the polygon area at all
pub fn segment_intersects_polygon(a: Point, b: Point, polygon: &Polygon<f64>) -> bool {
    if a == b {
        return contains_point(polygon, a);
    }
    line_between(a, b).intersects(polygon)
}

/// Does the polygon hold the whole segment `a`-`b` (interior or boundary)
pub fn polygon_holds_segment(polygon: &Polygon<f64>, a: Point, b: Point) -> bool {
    if a == b {
        return contains_point(polygon, a);
    }
    if !contains_point(polygon, a) || !contains_point(polygon, b) {
        return false;
    }
    polygon.contains(&line_between(a, b))
}

/// Area centroid of a vertex ring, rounded to the field grid
pub fn centroid(vertices: &[Point]) -> Option<Point> {
    if vertices.is_empty() {
        return None;
    }
    polygon_of(vertices)
        .centroid()
        .map(|c| Point::from_coord(c.0))
}

/// Check that a closed vertex ring does not touch or cross itself
pub fn is_simple(vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let edges: Vec<Line<f64>> = (0..n)
        .map(|i| line_between(vertices[i], vertices[(i + 1) % n]))
        .collect();

    if edges.iter().any(|e| e.start == e.end) {
        return false;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(edges[i], edges[j]) {
                None => {}
                // Neighbouring edges always share their common vertex
                Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
                Some(_) => return false,
            }
        }
    }
    true
}
