//! Cost-weighted A* over the rasterized field.
//!
//! Moves are 8-connected. Stepping onto node `B` costs the geometric length
//! of the step (1 or sqrt(2), in mesh units) plus the walkness of `B`; nodes
//! with walkness 1 are walls. A diagonal step is only taken when both
//! orthogonal nodes beside it are open, so a diagonal chain of wall nodes
//! still separates the field. The octile distance never overestimates that
//! cost, so the first time the goal is popped its cost is optimal.

use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::f64::consts::SQRT_2;

use crate::domain::Point;
use crate::error::SearchError;
use crate::mesh::{GridCoord, Mesh};

/// One node of a route: where it sits on the mesh and on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPoint {
    pub mesh: GridCoord,
    pub real: Point,
}

impl PathPoint {
    pub fn new(mesh: GridCoord, real: Point) -> Self {
        Self { mesh, real }
    }
}

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Nodes from start to end, both included
    pub path: Vec<PathPoint>,
    /// Accumulated edge weight in mesh units
    pub cost: f64,
    pub nodes_expanded: usize,
}

#[derive(Debug)]
struct OpenNode {
    coord: GridCoord,
    g: f64,
    f: f64,
    /// Insertion order, so equal `f` pops first-in first-out
    seq: u64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap is a max-heap
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* planner bound to one mesh
pub struct AStarPlanner<'a> {
    mesh: &'a Mesh,
}

impl<'a> AStarPlanner<'a> {
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// Search between two field points, snapping each to its nearest node
    pub fn find_path(&self, start: Point, end: Point) -> Result<SearchResult, SearchError> {
        let (Some(start), Some(end)) = (self.mesh.nearest(start), self.mesh.nearest(end)) else {
            debug!("[AStar] start or end outside the field");
            return Err(SearchError::OutOfBounds);
        };
        self.find_path_grid(start, end)
    }

    /// Search between two mesh nodes
    pub fn find_path_grid(
        &self,
        start: GridCoord,
        goal: GridCoord,
    ) -> Result<SearchResult, SearchError> {
        trace!(
            "[AStar] find_path: start=({},{}) goal=({},{})",
            start.i, start.j, goal.i, goal.j
        );

        if !self.mesh.contains(start) || !self.mesh.contains(goal) {
            return Err(SearchError::OutOfBounds);
        }
        if !self.is_passable(start) || !self.is_passable(goal) {
            debug!("[AStar] start or goal is a wall");
            return Err(SearchError::Blocked);
        }

        let mut open_set = BinaryHeap::new();
        let mut closed_set = HashSet::new();
        let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
        let mut g_scores: HashMap<GridCoord, f64> = HashMap::new();
        let mut seq = 0u64;

        g_scores.insert(start, 0.0);
        open_set.push(OpenNode {
            coord: start,
            g: 0.0,
            f: heuristic(start, goal),
            seq,
        });

        let mut nodes_expanded = 0;

        while let Some(current) = open_set.pop() {
            if current.coord == goal {
                return Ok(self.reconstruct_path(&came_from, goal, current.g, nodes_expanded));
            }

            if !closed_set.insert(current.coord) {
                continue;
            }
            nodes_expanded += 1;

            for (k, neighbor) in current.coord.neighbors_8().into_iter().enumerate() {
                if closed_set.contains(&neighbor) || !self.is_passable(neighbor) {
                    continue;
                }

                let diagonal = k >= 4;
                if diagonal && !self.can_cut_corner(current.coord, neighbor) {
                    continue;
                }

                let step = if diagonal { SQRT_2 } else { 1.0 };
                let tentative_g = current.g + step + self.mesh.walkness(neighbor);

                let known_g = g_scores.get(&neighbor).copied().unwrap_or(f64::INFINITY);
                if tentative_g < known_g {
                    came_from.insert(neighbor, current.coord);
                    g_scores.insert(neighbor, tentative_g);
                    seq += 1;
                    open_set.push(OpenNode {
                        coord: neighbor,
                        g: tentative_g,
                        f: tentative_g + heuristic(neighbor, goal),
                        seq,
                    });
                }
            }
        }

        debug!(
            "[AStar] FAILED: NoPath after expanding {} nodes",
            nodes_expanded
        );
        Err(SearchError::NoPath)
    }

    fn is_passable(&self, coord: GridCoord) -> bool {
        self.mesh.get(coord).is_some_and(|c| c.walkness < 1.0)
    }

    /// A diagonal step needs both orthogonal nodes it passes between open
    fn can_cut_corner(&self, from: GridCoord, to: GridCoord) -> bool {
        self.is_passable(GridCoord::new(to.i, from.j))
            && self.is_passable(GridCoord::new(from.i, to.j))
    }

    fn reconstruct_path(
        &self,
        came_from: &HashMap<GridCoord, GridCoord>,
        goal: GridCoord,
        cost: f64,
        nodes_expanded: usize,
    ) -> SearchResult {
        let mut coords = vec![goal];
        let mut current = goal;
        while let Some(&prev) = came_from.get(&current) {
            coords.push(prev);
            current = prev;
        }
        coords.reverse();

        let path: Vec<PathPoint> = coords
            .into_iter()
            .map(|c| PathPoint::new(c, self.mesh.real_of(c)))
            .collect();

        trace!(
            "[AStar] SUCCESS: {} nodes, cost={:.2}, expanded={}",
            path.len(),
            cost,
            nodes_expanded
        );

        SearchResult {
            path,
            cost,
            nodes_expanded,
        }
    }
}

/// Octile distance between two nodes
fn heuristic(from: GridCoord, to: GridCoord) -> f64 {
    let dx = (from.i - to.i).abs() as f64;
    let dy = (from.j - to.j).abs() as f64;
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    lo * SQRT_2 + (hi - lo)
}

/// Search with a fresh planner
pub fn find(mesh: &Mesh, start: Point, end: Point) -> Result<SearchResult, SearchError> {
    AStarPlanner::new(mesh).find_path(start, end)
}
