use log::{debug, warn};

use crate::domain::obstacle::polygon_of;
use crate::domain::{Obstacle, Point};
use crate::error::EditError;
use crate::geometry::{distance_to_segment, is_simple, nearest_point_on_segment, polygons_intersect};

use super::Field;

impl Field {
    /// Add a polygon obstacle if it overlaps nothing already on the field
    ///
    /// The caller is responsible for handing over a simple polygon.
    pub fn add_obstacle(&mut self, vertices: Vec<Point>, walkness: f64) -> Result<(), EditError> {
        self.ensure_idle()?;
        self.check_new_obstacle(&vertices, walkness)?;
        self.obstacles.push(Obstacle::new(vertices, walkness));
        debug!("Added obstacle #{}", self.obstacles.len() - 1);
        self.structural_change();
        Ok(())
    }

    /// Remove the first obstacle containing `p`
    pub fn remove_obstacle_at(&mut self, p: Point) -> Result<Obstacle, EditError> {
        self.ensure_idle()?;
        let idx = self.obstacle_index_at(p).ok_or(EditError::NotFound)?;
        Ok(self.take_obstacle(idx))
    }

    /// Remove the obstacle with exactly this outline
    pub fn remove_obstacle(&mut self, obstacle: &Obstacle) -> Result<Obstacle, EditError> {
        self.ensure_idle()?;
        let idx = self
            .obstacles
            .iter()
            .position(|o| o == obstacle)
            .ok_or(EditError::NotFound)?;
        Ok(self.take_obstacle(idx))
    }

    /// Insert a vertex on the edge of the containing obstacle closest to `p`
    ///
    /// The new vertex is `p` projected onto that edge, so the outline keeps
    /// its shape until the vertex is dragged.
    pub fn add_vertex(&mut self, p: Point) -> Result<(), EditError> {
        self.ensure_idle()?;
        let idx = self.obstacle_index_at(p).ok_or(EditError::NotFound)?;

        let vertices = &self.obstacles[idx].vertices;
        let n = vertices.len();
        let edge = (0..n)
            .min_by(|&a, &b| {
                let da = distance_to_segment(vertices[a], vertices[(a + 1) % n], p);
                let db = distance_to_segment(vertices[b], vertices[(b + 1) % n], p);
                da.total_cmp(&db)
            })
            .ok_or(EditError::NotFound)?;

        let (a, b) = (vertices[edge], vertices[(edge + 1) % n]);
        let projected = nearest_point_on_segment(a, b, p);
        if projected == a || projected == b {
            return Err(EditError::Degenerate);
        }

        let mut candidate = vertices.clone();
        candidate.insert(edge + 1, projected);
        self.check_reshaped(idx, &candidate)?;

        debug!(
            "Inserted vertex {:?} into obstacle #{} after vertex {}",
            projected, idx, edge
        );
        self.obstacles[idx].vertices = candidate;
        self.structural_change();
        Ok(())
    }

    /// Delete the vertex nearest `p` within the grab radius
    ///
    /// An obstacle left with fewer than three vertices is removed entirely.
    pub fn remove_vertex(&mut self, p: Point) -> Result<(), EditError> {
        self.ensure_idle()?;
        let (idx, vertex) = self.nearest_vertex(p).ok_or(EditError::NotFound)?;

        let mut candidate = self.obstacles[idx].vertices.clone();
        candidate.remove(vertex);
        if candidate.len() < 3 {
            self.take_obstacle(idx);
            return Ok(());
        }
        self.check_reshaped(idx, &candidate)?;

        self.obstacles[idx].vertices = candidate;
        self.structural_change();
        Ok(())
    }

    /// Obstacle and vertex index of the vertex nearest `p`, if within grab radius
    pub fn nearest_vertex(&self, p: Point) -> Option<(usize, usize)> {
        let radius = self.config.grab_radius;
        self.obstacles
            .iter()
            .enumerate()
            .flat_map(|(oi, o)| {
                o.vertices
                    .iter()
                    .enumerate()
                    .map(move |(vi, v)| (oi, vi, v.distance(p)))
            })
            .filter(|&(_, _, d)| d <= radius)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(oi, vi, _)| (oi, vi))
    }

    pub(super) fn check_new_obstacle(
        &self,
        vertices: &[Point],
        walkness: f64,
    ) -> Result<(), EditError> {
        if vertices.len() < 3 {
            return Err(EditError::Degenerate);
        }
        if !(0.0..=1.0).contains(&walkness) {
            return Err(EditError::InvalidWalkness);
        }
        if !vertices.iter().all(|v| v.within(self.width, self.height)) {
            return Err(EditError::OutOfBounds);
        }
        if self.overlaps_others(vertices, None) {
            warn!("Rejected obstacle overlapping an existing one");
            return Err(EditError::Overlap);
        }
        Ok(())
    }

    /// Validate a replacement outline for obstacle `idx`
    fn check_reshaped(&self, idx: usize, vertices: &[Point]) -> Result<(), EditError> {
        if !is_simple(vertices) {
            return Err(EditError::NotSimple);
        }
        if self.overlaps_others(vertices, Some(idx)) {
            warn!("Rejected reshape of obstacle #{}: overlap", idx);
            return Err(EditError::Overlap);
        }
        Ok(())
    }

    /// Would this outline touch any obstacle other than `skip`
    pub(super) fn overlaps_others(&self, vertices: &[Point], skip: Option<usize>) -> bool {
        let candidate = polygon_of(vertices);
        self.obstacles
            .iter()
            .enumerate()
            .filter(|&(i, _)| Some(i) != skip)
            .any(|(_, o)| polygons_intersect(&candidate, &o.polygon()))
    }

    fn take_obstacle(&mut self, idx: usize) -> Obstacle {
        let removed = self.obstacles.remove(idx);
        debug!("Removed obstacle #{}", idx);
        self.structural_change();
        removed
    }
}
