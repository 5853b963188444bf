use geo::Polygon;
use log::debug;

use crate::domain::{Obstacle, Point};
use crate::geometry::contains_point;

/// Integer index of a mesh node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCoord {
    pub i: i32,
    pub j: i32,
}

impl GridCoord {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// 8-connected neighbours: the four orthogonal ones first, then diagonals
    pub fn neighbors_8(self) -> [GridCoord; 8] {
        let GridCoord { i, j } = self;
        [
            GridCoord::new(i + 1, j),
            GridCoord::new(i - 1, j),
            GridCoord::new(i, j + 1),
            GridCoord::new(i, j - 1),
            GridCoord::new(i + 1, j + 1),
            GridCoord::new(i + 1, j - 1),
            GridCoord::new(i - 1, j + 1),
            GridCoord::new(i - 1, j - 1),
        ]
    }
}

/// One sampled node of the mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshCell {
    pub coord: GridCoord,
    /// Field position the walkness was sampled at
    pub real: Point,
    pub walkness: f64,
}

/// Uniform grid overlay of the field
///
/// Node `(i, j)` exists for every `i * cell_size < width` and
/// `j * cell_size < height`; any trailing strip narrower than a cell is not
/// covered by a node of its own.
#[derive(Debug, Clone)]
pub struct Mesh {
    width: u32,
    height: u32,
    cell_size: u32,
    cols: i32,
    rows: i32,
    cells: Vec<MeshCell>,
}

impl Mesh {
    /// Rasterize the obstacle set at stride `cell_size`
    ///
    /// Each node takes the walkness of the first obstacle whose outline
    /// contains it, or 0 when none does. Obstacles must not overlap, so the
    /// order of the slice does not matter.
    pub fn build(width: u32, height: u32, obstacles: &[Obstacle], cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        let cols = width.div_ceil(cell_size) as i32;
        let rows = height.div_ceil(cell_size) as i32;

        let polygons: Vec<(Polygon<f64>, f64)> = obstacles
            .iter()
            .map(|o| (o.polygon(), o.walkness))
            .collect();

        let mut cells = Vec::with_capacity((cols as usize) * (rows as usize));
        for j in 0..rows {
            for i in 0..cols {
                let real = Point::new(i * cell_size as i32, j * cell_size as i32);
                let walkness = polygons
                    .iter()
                    .find(|(poly, _)| contains_point(poly, real))
                    .map(|&(_, w)| w)
                    .unwrap_or(0.0);
                cells.push(MeshCell {
                    coord: GridCoord::new(i, j),
                    real,
                    walkness,
                });
            }
        }

        debug!(
            "Built mesh {}x{} ({} cells) for {}x{} field, {} obstacles",
            cols,
            rows,
            cells.len(),
            width,
            height,
            obstacles.len()
        );

        Self {
            width,
            height,
            cell_size,
            cols,
            rows,
            cells,
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of nodes along x and y
    pub fn dimensions(&self) -> (i32, i32) {
        (self.cols, self.rows)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &MeshCell> {
        self.cells.iter()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.i >= 0 && coord.j >= 0 && coord.i < self.cols && coord.j < self.rows
    }

    pub fn get(&self, coord: GridCoord) -> Option<&MeshCell> {
        if !self.contains(coord) {
            return None;
        }
        self.cells
            .get((coord.j as usize) * (self.cols as usize) + coord.i as usize)
    }

    /// Walkness of a node; missing nodes behave as walls
    pub fn walkness(&self, coord: GridCoord) -> f64 {
        self.get(coord).map(|c| c.walkness).unwrap_or(1.0)
    }

    /// Nearest mesh node to a field point, `None` outside the field
    pub fn nearest(&self, p: Point) -> Option<GridCoord> {
        if self.cells.is_empty() || !p.within(self.width, self.height) {
            return None;
        }
        let size = self.cell_size as f64;
        let i = ((p.x as f64 / size).round() as i32).clamp(0, self.cols - 1);
        let j = ((p.y as f64 / size).round() as i32).clamp(0, self.rows - 1);
        Some(GridCoord::new(i, j))
    }

    /// Field position of a node, whether or not it exists
    pub fn real_of(&self, coord: GridCoord) -> Point {
        Point::new(
            coord.i * self.cell_size as i32,
            coord.j * self.cell_size as i32,
        )
    }
}
