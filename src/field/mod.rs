//! The editable field: obstacles, waypoints, mesh and the cached route.
//!
//! `Field` is the surface the editor UI drives. Every mutation that changes
//! the obstacle set goes through here so the non-overlap invariant holds
//! before the mesh is rebuilt.

pub mod editor;
pub mod session;

pub use session::DragHandle;

use log::{debug, info, warn};
use std::path::Path;

use crate::config::PlannerConfig;
use crate::config::limits::{MAX_FIELD_SIZE, MIN_CELL_SIZE, MIN_FIELD_SIZE};
use crate::domain::{Obstacle, Point};
use crate::error::{EditError, MapError, SearchError};
use crate::geometry::contains_point;
use crate::map::{self, MapData};
use crate::mesh::Mesh;
use crate::route::{self, Route, path_point};
use crate::search;

use session::DragSession;

#[derive(Debug)]
pub struct Field {
    width: u32,
    height: u32,
    config: PlannerConfig,
    obstacles: Vec<Obstacle>,
    mesh: Mesh,
    start: Option<Point>,
    end: Option<Point>,
    route: Option<Route>,
    drawing: Option<Vec<Point>>,
    drag: Option<DragSession>,
    /// Bumped on every structural change to the obstacle set
    generation: u64,
}

impl Field {
    pub fn new(width: u32, height: u32, config: PlannerConfig) -> Self {
        let mesh = Mesh::build(width, height, &[], config.cell_size);
        Self {
            width,
            height,
            config,
            obstacles: Vec::new(),
            mesh,
            start: None,
            end: None,
            route: None,
            drawing: None,
            drag: None,
            generation: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Resize the field; this drops every obstacle
    ///
    /// Both edges must lie within the field size limits, and no draw or
    /// drag session may be open.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EditError> {
        self.ensure_idle()?;
        let edges = MIN_FIELD_SIZE..=MAX_FIELD_SIZE;
        if !edges.contains(&width) || !edges.contains(&height) {
            return Err(EditError::OutOfBounds);
        }
        self.width = width;
        self.height = height;
        self.obstacles.clear();
        self.start = self.start.filter(|p| p.within(width, height));
        self.end = self.end.filter(|p| p.within(width, height));
        info!("Resized field to {}x{}", width, height);
        self.structural_change();
        Ok(())
    }

    /// Change the mesh stride and regenerate the mesh
    pub fn set_cell_size(&mut self, cell_size: u32) {
        self.config.cell_size = cell_size.max(MIN_CELL_SIZE);
        self.route = None;
        self.rebuild_mesh();
    }

    /// Double the mesh stride (coarser mesh)
    pub fn coarsen_mesh(&mut self) {
        self.set_cell_size(self.config.cell_size.saturating_mul(2));
    }

    /// Halve the mesh stride, never below the minimum
    pub fn refine_mesh(&mut self) {
        self.set_cell_size(self.config.cell_size / 2);
    }

    pub fn set_start(&mut self, p: Point) {
        self.start = Some(p);
        self.replan();
    }

    pub fn set_end(&mut self, p: Point) {
        self.end = Some(p);
        self.replan();
    }

    /// Walkness at a field point: the containing obstacle's, else 0
    pub fn factor_at(&self, p: Point) -> f64 {
        self.obstacle_index_at(p)
            .map(|idx| self.obstacles[idx].walkness)
            .unwrap_or(0.0)
    }

    /// Search, refine and cache a route from start to end
    ///
    /// Returns the weighted route cost in field units.
    pub fn find_path(&mut self) -> Result<f64, SearchError> {
        self.route = None;
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(SearchError::MissingEndpoint);
        };

        let result = search::find(&self.mesh, start, end)?;
        let points = route::refine(
            &result.path,
            &self.obstacles,
            self.config.splice_interval,
            self.config.cell_size,
        );
        let cost = result.cost * self.config.cell_size as f64;
        debug!(
            "Route found: cost {:.2}, {} raw nodes, {} refined points, {} expanded",
            cost,
            result.path.len(),
            points.len(),
            result.nodes_expanded
        );
        self.route = Some(Route { points, cost });
        Ok(cost)
    }

    /// `find_path` flattened to a length, with -1 for a missing endpoint
    /// and 0 when no route exists
    pub fn find_path_length(&mut self) -> f64 {
        match self.find_path() {
            Ok(cost) => cost,
            Err(e) => e.sentinel(),
        }
    }

    /// Replace the field with the contents of a map file
    ///
    /// The field is cleared first, so a failed load leaves it empty. A load
    /// replaces everything a session could be editing, so an open draw or
    /// drag session is discarded rather than refused.
    pub fn load_map(&mut self, path: &Path) -> Result<(), MapError> {
        self.close_sessions();
        self.obstacles.clear();
        self.start = None;
        self.end = None;
        self.structural_change();

        let data = match map::load_map(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to load map {:?}: {}", path, e);
                return Err(e);
            }
        };
        self.apply(data);
        Ok(())
    }

    pub fn save_map(&self, path: &Path) -> Result<(), MapError> {
        map::save_map(path, &self.snapshot())
    }

    /// Current state in map-file form
    pub fn snapshot(&self) -> MapData {
        MapData {
            width: self.width,
            height: self.height,
            obstacles: self.obstacles.clone(),
            start: self.start,
            end: self.end,
            path: self
                .route
                .as_ref()
                .map(|r| r.points.iter().map(|p| p.real).collect())
                .unwrap_or_default(),
        }
    }

    /// Adopt loaded map data, including its cached route
    ///
    /// The restored route keeps only its points; its cost is the polyline
    /// length.
    pub fn apply(&mut self, data: MapData) {
        self.close_sessions();
        self.width = data.width;
        self.height = data.height;
        self.obstacles = data.obstacles;
        self.start = data.start;
        self.end = data.end;
        self.structural_change();

        if !data.path.is_empty() {
            let points: Vec<_> = data
                .path
                .into_iter()
                .map(|p| path_point(p, self.config.cell_size))
                .collect();
            let cost = route::route_length(&points);
            self.route = Some(Route { points, cost });
        }
    }

    pub(crate) fn obstacle_index_at(&self, p: Point) -> Option<usize> {
        self.obstacles
            .iter()
            .position(|o| contains_point(&o.polygon(), p))
    }

    fn replan(&mut self) {
        if self.start.is_none() || self.end.is_none() {
            return;
        }
        if let Err(e) = self.find_path() {
            debug!("No route after waypoint change: {}", e);
        }
    }

    fn close_sessions(&mut self) {
        self.drawing = None;
        self.drag = None;
    }

    /// Reject structural edits while a draw or drag session is open
    fn ensure_idle(&self) -> Result<(), EditError> {
        if self.drawing.is_some() || self.drag.is_some() {
            return Err(EditError::SessionOpen);
        }
        Ok(())
    }

    fn structural_change(&mut self) {
        self.generation += 1;
        self.route = None;
        self.rebuild_mesh();
    }

    fn rebuild_mesh(&mut self) {
        self.mesh = Mesh::build(
            self.width,
            self.height,
            &self.obstacles,
            self.config.cell_size,
        );
    }
}
