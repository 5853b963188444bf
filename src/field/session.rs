//! Interactive editing sessions.
//!
//! Drawing builds a new obstacle one vertex at a time and validates it on
//! commit. Dragging moves one vertex; each move is checked against the other
//! obstacles and a rejected move leaves the vertex where it was. The outline
//! may fold over itself mid-drag, but a drag that ends on a self-intersecting
//! outline is rolled back. The mesh is regenerated once, when the drag ends.

use log::{debug, trace};

use crate::domain::obstacle::polygon_of;
use crate::domain::{Obstacle, Point};
use crate::error::EditError;
use crate::geometry::{is_simple, polygons_intersect, segment_intersects_polygon};

use super::Field;

/// Stable reference to the vertex under a drag
///
/// Valid until the obstacle set changes structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragHandle {
    pub obstacle: usize,
    pub vertex: usize,
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DragSession {
    handle: DragHandle,
    /// Vertex position when the drag began
    origin: Point,
}

impl Field {
    pub fn start_draw(&mut self) -> Result<(), EditError> {
        self.ensure_idle()?;
        self.drawing = Some(Vec::new());
        Ok(())
    }

    /// Vertices placed so far, if a draw session is open
    pub fn drawing(&self) -> Option<&[Point]> {
        self.drawing.as_deref()
    }

    /// Append a vertex to the polygon being drawn
    ///
    /// The vertex and the edge leading to it must stay clear of every
    /// existing obstacle.
    pub fn add_draw_vertex(&mut self, p: Point) -> Result<(), EditError> {
        let drawing = self.drawing.as_ref().ok_or(EditError::NoSession)?;
        if !p.within(self.width, self.height) {
            return Err(EditError::OutOfBounds);
        }
        if self.obstacle_index_at(p).is_some() {
            return Err(EditError::Overlap);
        }

        match drawing.len() {
            0 => {}
            1 => {
                let last = drawing[0];
                if self
                    .obstacles
                    .iter()
                    .any(|o| segment_intersects_polygon(last, p, &o.polygon()))
                {
                    return Err(EditError::Overlap);
                }
            }
            _ => {
                let mut candidate = drawing.clone();
                candidate.push(p);
                let outline = polygon_of(&candidate);
                if self
                    .obstacles
                    .iter()
                    .any(|o| polygons_intersect(&outline, &o.polygon()))
                {
                    return Err(EditError::Overlap);
                }
            }
        }

        trace!("Draw vertex {:?}", p);
        if let Some(drawing) = self.drawing.as_mut() {
            drawing.push(p);
        }
        Ok(())
    }

    /// Drop the most recently placed vertex
    pub fn undo_draw(&mut self) -> Result<Option<Point>, EditError> {
        let drawing = self.drawing.as_mut().ok_or(EditError::NoSession)?;
        Ok(drawing.pop())
    }

    /// Close the drawing into an obstacle
    ///
    /// On rejection the session stays open with its vertices intact.
    pub fn commit_draw(&mut self, walkness: f64) -> Result<(), EditError> {
        let vertices = self.drawing.as_ref().ok_or(EditError::NoSession)?;
        self.check_new_obstacle(vertices, walkness)?;
        if !is_simple(vertices) {
            return Err(EditError::NotSimple);
        }

        let vertices = self.drawing.take().unwrap_or_default();
        debug!(
            "Committed drawn obstacle with {} vertices, walkness {}",
            vertices.len(),
            walkness
        );
        self.obstacles.push(Obstacle::new(vertices, walkness));
        self.structural_change();
        Ok(())
    }

    /// Abandon the drawing, returning whatever was placed
    pub fn cancel_draw(&mut self) -> Option<Vec<Point>> {
        self.drawing.take()
    }

    /// Grab the vertex nearest `p` within the grab radius
    pub fn begin_drag(&mut self, p: Point) -> Result<DragHandle, EditError> {
        self.ensure_idle()?;
        let (obstacle, vertex) = self.nearest_vertex(p).ok_or(EditError::NotFound)?;
        let handle = DragHandle {
            obstacle,
            vertex,
            generation: self.generation,
        };
        let origin = self.obstacles[obstacle].vertices[vertex];
        debug!("Dragging vertex {} of obstacle #{}", vertex, obstacle);
        self.drag = Some(DragSession { handle, origin });
        Ok(handle)
    }

    /// Move the grabbed vertex to `p` unless the reshaped polygon would leave
    /// the field or touch another obstacle
    pub fn move_drag(&mut self, p: Point) -> Result<(), EditError> {
        let handle = self.drag.ok_or(EditError::NoSession)?.handle;
        self.check_handle(handle)?;
        if !p.within(self.width, self.height) {
            return Err(EditError::OutOfBounds);
        }

        // Only other obstacles are checked; the outline may fold over itself
        // while the vertex is in motion
        let mut candidate = self.obstacles[handle.obstacle].vertices.clone();
        candidate[handle.vertex] = p;
        if self.overlaps_others(&candidate, Some(handle.obstacle)) {
            trace!("Drag to {:?} rejected: overlap", p);
            return Err(EditError::Overlap);
        }

        self.obstacles[handle.obstacle].vertices[handle.vertex] = p;
        // Stale until the drag ends and the mesh is rebuilt
        self.route = None;
        Ok(())
    }

    /// Finish the drag and regenerate the mesh
    ///
    /// If the outline crosses itself the vertex returns to where the drag
    /// began and `NotSimple` is reported. The session is closed either way.
    pub fn end_drag(&mut self) -> Result<Point, EditError> {
        let session = self.drag.take().ok_or(EditError::NoSession)?;
        let handle = session.handle;
        let p = self.vertex(handle)?;
        if !is_simple(&self.obstacles[handle.obstacle].vertices) {
            debug!("Drag to {:?} rejected: outline crosses itself", p);
            self.obstacles[handle.obstacle].vertices[handle.vertex] = session.origin;
            self.structural_change();
            return Err(EditError::NotSimple);
        }
        debug!("Drag ended: {:?} -> {:?}", session.origin, p);
        self.structural_change();
        Ok(p)
    }

    /// Abort the drag, putting the vertex back where it started
    pub fn cancel_drag(&mut self) -> Result<(), EditError> {
        let session = self.drag.take().ok_or(EditError::NoSession)?;
        let handle = session.handle;
        if self.check_handle(handle).is_ok() {
            self.obstacles[handle.obstacle].vertices[handle.vertex] = session.origin;
        }
        self.structural_change();
        Ok(())
    }

    /// Current position of the vertex a handle refers to
    pub fn vertex(&self, handle: DragHandle) -> Result<Point, EditError> {
        self.check_handle(handle)?;
        Ok(self.obstacles[handle.obstacle].vertices[handle.vertex])
    }

    fn check_handle(&self, handle: DragHandle) -> Result<(), EditError> {
        if handle.generation != self.generation {
            return Err(EditError::StaleHandle);
        }
        self.obstacles
            .get(handle.obstacle)
            .and_then(|o| o.vertices.get(handle.vertex))
            .map(|_| ())
            .ok_or(EditError::StaleHandle)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PlannerConfig;
    use crate::domain::Point;
    use crate::error::EditError;
    use crate::field::Field;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    fn field() -> Field {
        Field::new(200, 200, PlannerConfig::default())
    }

    #[test]
    fn test_draw_and_commit() {
        let mut field = field();
        field.start_draw().unwrap();
        for p in rect(10, 10, 40, 40) {
            field.add_draw_vertex(p).unwrap();
        }
        assert_eq!(field.drawing().map(|d| d.len()), Some(4));

        field.commit_draw(0.75).unwrap();
        assert!(field.drawing().is_none());
        assert_eq!(field.count(), 1);
        assert_eq!(field.factor_at(Point::new(20, 20)), 0.75);
    }

    #[test]
    fn test_draw_requires_session() {
        let mut field = field();
        assert_eq!(
            field.add_draw_vertex(Point::new(1, 1)),
            Err(EditError::NoSession)
        );
        assert_eq!(field.commit_draw(0.5), Err(EditError::NoSession));
        assert_eq!(field.undo_draw(), Err(EditError::NoSession));
    }

    #[test]
    fn test_draw_vertex_rejections() {
        let mut field = field();
        field.add_obstacle(rect(50, 50, 100, 100), 1.0).unwrap();
        field.start_draw().unwrap();

        assert_eq!(
            field.add_draw_vertex(Point::new(300, 10)),
            Err(EditError::OutOfBounds)
        );
        assert_eq!(
            field.add_draw_vertex(Point::new(60, 60)),
            Err(EditError::Overlap)
        );

        field.add_draw_vertex(Point::new(10, 75)).unwrap();
        // Edge would cut straight through the obstacle
        assert_eq!(
            field.add_draw_vertex(Point::new(150, 75)),
            Err(EditError::Overlap)
        );

        field.add_draw_vertex(Point::new(40, 150)).unwrap();
        // Closing the triangle would swallow the obstacle's corner
        assert_eq!(
            field.add_draw_vertex(Point::new(150, 150)),
            Err(EditError::Overlap)
        );
        assert_eq!(field.drawing().map(|d| d.len()), Some(2));
    }

    #[test]
    fn test_undo_and_cancel() {
        let mut field = field();
        field.start_draw().unwrap();
        field.add_draw_vertex(Point::new(10, 10)).unwrap();
        field.add_draw_vertex(Point::new(20, 10)).unwrap();

        assert_eq!(field.undo_draw(), Ok(Some(Point::new(20, 10))));
        assert_eq!(field.cancel_draw(), Some(vec![Point::new(10, 10)]));
        assert!(field.drawing().is_none());
        assert_eq!(field.count(), 0);
    }

    #[test]
    fn test_rejected_commit_keeps_drawing() {
        let mut field = field();
        field.start_draw().unwrap();
        field.add_draw_vertex(Point::new(10, 10)).unwrap();
        field.add_draw_vertex(Point::new(20, 10)).unwrap();
        assert_eq!(field.commit_draw(0.5), Err(EditError::Degenerate));

        field.add_draw_vertex(Point::new(20, 20)).unwrap();
        assert_eq!(field.commit_draw(2.0), Err(EditError::InvalidWalkness));
        assert_eq!(field.drawing().map(|d| d.len()), Some(3));

        field.commit_draw(0.5).unwrap();
        assert_eq!(field.count(), 1);
    }

    #[test]
    fn test_self_intersecting_drawing_rejected() {
        let mut field = field();
        field.start_draw().unwrap();
        for p in [
            Point::new(0, 0),
            Point::new(10, 10),
            Point::new(10, 0),
            Point::new(0, 10),
        ] {
            field.add_draw_vertex(p).unwrap();
        }
        assert_eq!(field.commit_draw(0.5), Err(EditError::NotSimple));
    }

    #[test]
    fn test_sessions_block_other_edits() {
        let mut field = field();
        field.add_obstacle(rect(10, 10, 40, 40), 0.5).unwrap();
        field.start_draw().unwrap();

        assert_eq!(field.begin_drag(Point::new(10, 10)), Err(EditError::SessionOpen));
        assert_eq!(
            field.add_obstacle(rect(100, 100, 120, 120), 0.5),
            Err(EditError::SessionOpen)
        );
        assert_eq!(field.add_vertex(Point::new(20, 20)), Err(EditError::SessionOpen));
        field.cancel_draw();

        field.begin_drag(Point::new(10, 10)).unwrap();
        assert_eq!(field.start_draw(), Err(EditError::SessionOpen));
        assert_eq!(
            field.remove_obstacle_at(Point::new(20, 20)),
            Err(EditError::SessionOpen)
        );
    }

    #[test]
    fn test_drag_moves_vertex() {
        let mut field = field();
        field.add_obstacle(rect(10, 10, 40, 40), 0.5).unwrap();

        let handle = field.begin_drag(Point::new(42, 41)).unwrap();
        assert_eq!((handle.obstacle, handle.vertex), (0, 2));
        field.move_drag(Point::new(60, 60)).unwrap();
        assert_eq!(field.vertex(handle), Ok(Point::new(60, 60)));

        assert_eq!(field.end_drag(), Ok(Point::new(60, 60)));
        assert_eq!(field.factor_at(Point::new(45, 45)), 0.5);
        // The obstacle set changed, so the old handle is spent
        assert_eq!(field.vertex(handle), Err(EditError::StaleHandle));
    }

    #[test]
    fn test_rejected_drag_restores_position() {
        let mut field = field();
        field.add_obstacle(rect(10, 10, 40, 40), 0.5).unwrap();
        field.add_obstacle(rect(60, 10, 90, 40), 1.0).unwrap();

        let handle = field.begin_drag(Point::new(40, 10)).unwrap();
        assert_eq!(
            field.move_drag(Point::new(70, 20)),
            Err(EditError::Overlap)
        );
        assert_eq!(field.vertex(handle), Ok(Point::new(40, 10)));

        field.move_drag(Point::new(50, 5)).unwrap();
        assert_eq!(
            field.move_drag(Point::new(65, 25)),
            Err(EditError::Overlap)
        );
        assert_eq!(field.vertex(handle), Ok(Point::new(50, 5)));
        assert_eq!(
            field.move_drag(Point::new(-5, 5)),
            Err(EditError::OutOfBounds)
        );
        assert_eq!(field.vertex(handle), Ok(Point::new(50, 5)));

        field.end_drag().unwrap();
        assert_eq!(field.obstacles()[0].vertices[1], Point::new(50, 5));
    }

    #[test]
    fn test_folded_outline_rolls_back_on_release() {
        let mut field = field();
        field.add_obstacle(rect(10, 10, 40, 40), 0.5).unwrap();

        field.begin_drag(Point::new(10, 10)).unwrap();
        // Folding is allowed while the vertex is still moving
        field.move_drag(Point::new(50, 25)).unwrap();
        assert_eq!(field.obstacles()[0].vertices[0], Point::new(50, 25));

        assert_eq!(field.end_drag(), Err(EditError::NotSimple));
        assert_eq!(field.obstacles()[0].vertices, rect(10, 10, 40, 40));
        assert_eq!(field.end_drag(), Err(EditError::NoSession));
        assert!(field.start_draw().is_ok());
    }

    #[test]
    fn test_fold_undone_before_release_is_kept() {
        let mut field = field();
        field.add_obstacle(rect(10, 10, 40, 40), 0.5).unwrap();

        field.begin_drag(Point::new(10, 10)).unwrap();
        field.move_drag(Point::new(50, 25)).unwrap();
        field.move_drag(Point::new(5, 8)).unwrap();
        assert_eq!(field.end_drag(), Ok(Point::new(5, 8)));
        assert_eq!(field.obstacles()[0].vertices[0], Point::new(5, 8));
    }

    #[test]
    fn test_cancel_drag_restores_origin() {
        let mut field = field();
        field.add_obstacle(rect(10, 10, 40, 40), 0.5).unwrap();

        field.begin_drag(Point::new(10, 10)).unwrap();
        field.move_drag(Point::new(5, 5)).unwrap();
        field.cancel_drag().unwrap();

        assert_eq!(field.obstacles()[0].vertices, rect(10, 10, 40, 40));
        assert_eq!(field.end_drag(), Err(EditError::NoSession));
    }

    #[test]
    fn test_drag_needs_nearby_vertex() {
        let mut field = field();
        field.add_obstacle(rect(10, 10, 40, 40), 0.5).unwrap();
        assert_eq!(field.begin_drag(Point::new(25, 25)), Err(EditError::NotFound));
        assert_eq!(field.move_drag(Point::new(1, 1)), Err(EditError::NoSession));
    }
}
