//! Post-processing of raw search output into the route shown to the user.
//!
//! The raw A* path is smoothed by line of sight, resampled at a fixed
//! interval, then smoothed once more with shortcuts capped at that interval
//! so the even sampling survives.

pub mod smooth;
pub mod splice;

pub use smooth::{Occluders, smooth, smooth_with};
pub use splice::splice;

use smooth::dedup;

use crate::domain::{Obstacle, Point};
use crate::mesh::GridCoord;
use crate::search::PathPoint;

/// A refined route and what it cost to find
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub points: Vec<PathPoint>,
    /// Weighted search cost in field units; a route restored from a map
    /// file carries its polyline length instead
    pub cost: f64,
}

impl Route {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Route point for an arbitrary field position
pub(crate) fn path_point(real: Point, cell_size: u32) -> PathPoint {
    let size = cell_size.max(1) as f64;
    PathPoint::new(
        GridCoord::new(
            (real.x as f64 / size).round() as i32,
            (real.y as f64 / size).round() as i32,
        ),
        real,
    )
}

/// Smooth, resample and tidy a raw search path
pub fn refine(
    path: &[PathPoint],
    obstacles: &[Obstacle],
    interval: f64,
    cell_size: u32,
) -> Vec<PathPoint> {
    if path.len() < 2 {
        return path.to_vec();
    }

    let occluders = Occluders::new(obstacles);
    let smoothed = smooth_with(path, &occluders, None);

    // Rounded samples can graze a corner the exact segment misses; such
    // segments stay unsampled
    let mut spliced = vec![smoothed[0]];
    for w in smoothed.windows(2) {
        let piece = splice(w, interval, cell_size);
        if piece
            .windows(2)
            .any(|s| occluders.blocks(s[0].real, s[1].real))
        {
            spliced.push(w[1]);
        } else {
            spliced.extend_from_slice(&piece[1..]);
        }
    }

    smooth_with(&spliced, &occluders, Some(interval))
}

/// Total polyline length in field units
pub fn route_length(path: &[PathPoint]) -> f64 {
    path.windows(2)
        .map(|w| w[0].real.distance(w[1].real))
        .sum()
}
