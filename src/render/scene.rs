use crate::domain::Point;
use crate::field::Field;
use crate::geometry::centroid;

use super::{RenderOptions, Rgb, palette, shade};

/// Marker radius for start and end
const WAYPOINT_RADIUS: u32 = 4;

/// One shaded shape, in field coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Square mesh cell with its top-left corner at `origin`
    Cell { origin: Point, size: u32, fill: Rgb },
    Polygon {
        vertices: Vec<Point>,
        fill: Rgb,
        outline: Rgb,
        /// Where to place the walkness label
        label: Option<Point>,
        walkness: f64,
    },
    /// Polygon still being drawn; the last vertex is highlighted
    Drawing { vertices: Vec<Point>, border: Rgb },
    Polyline { points: Vec<Point>, stroke: Rgb },
    Marker { at: Point, radius: u32, fill: Rgb },
}

/// Everything needed to paint the field, back to front
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Field {
    /// Describe the current field state for painting
    pub fn scene(&self, options: &RenderOptions) -> Scene {
        let mut primitives = Vec::new();

        if options.show_grid {
            let size = self.mesh().cell_size();
            primitives.extend(self.mesh().cells().map(|cell| Primitive::Cell {
                origin: cell.real,
                size,
                fill: shade(cell.walkness),
            }));
        }

        if options.show_obstacles {
            primitives.extend(self.obstacles().iter().map(|o| Primitive::Polygon {
                vertices: o.vertices.clone(),
                fill: shade(o.walkness),
                outline: palette::OUTLINE,
                label: centroid(&o.vertices),
                walkness: o.walkness,
            }));
        }

        if let Some(drawing) = self.drawing()
            && !drawing.is_empty()
        {
            primitives.push(Primitive::Drawing {
                vertices: drawing.to_vec(),
                border: palette::DRAW_BORDER,
            });
        }

        if options.show_path
            && let Some(route) = self.route()
            && route.len() >= 2
        {
            primitives.push(Primitive::Polyline {
                points: route.points.iter().map(|p| p.real).collect(),
                stroke: palette::PATH,
            });
        }

        if options.show_waypoints {
            let markers = [(self.start(), palette::START), (self.end(), palette::END)];
            for (at, fill) in markers {
                if let Some(at) = at {
                    primitives.push(Primitive::Marker {
                        at,
                        radius: WAYPOINT_RADIUS,
                        fill,
                    });
                }
            }
        }

        Scene {
            width: self.width(),
            height: self.height(),
            primitives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;

    fn square(x: i32, y: i32, size: i32) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    fn sample_field() -> Field {
        let mut field = Field::new(100, 100, PlannerConfig::default().with_cell_size(10));
        field.add_obstacle(square(40, 40, 20), 1.0).unwrap();
        field.set_start(Point::new(10, 10));
        field.set_end(Point::new(90, 90));
        field
    }

    #[test]
    fn test_default_scene_layers() {
        let scene = sample_field().scene(&RenderOptions::default());

        assert!(matches!(scene.primitives[0], Primitive::Polygon { .. }));
        assert!(matches!(scene.primitives[1], Primitive::Polyline { .. }));
        assert_eq!(scene.len(), 4);

        let Primitive::Polygon { fill, label, .. } = &scene.primitives[0] else {
            panic!("expected obstacle polygon");
        };
        assert_eq!(*fill, palette::HARD);
        assert_eq!(*label, Some(Point::new(50, 50)));
    }

    #[test]
    fn test_grid_layer_covers_mesh() {
        let field = sample_field();
        let options = RenderOptions {
            show_obstacles: false,
            show_path: false,
            show_waypoints: false,
            ..RenderOptions::default().with_grid(true)
        };
        let scene = field.scene(&options);

        assert_eq!(scene.len(), field.mesh().len());
        let hard_cells = scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Cell { fill, .. } if *fill == palette::HARD))
            .count();
        // Nodes at 40, 50 and 60 on both axes fall inside the closed square
        assert_eq!(hard_cells, 9);
    }

    #[test]
    fn test_drawing_is_always_shown() {
        let mut field = Field::new(100, 100, PlannerConfig::default());
        field.start_draw().unwrap();
        field.add_draw_vertex(Point::new(5, 5)).unwrap();

        let options = RenderOptions {
            show_obstacles: false,
            show_path: false,
            show_waypoints: false,
            show_grid: false,
        };
        let scene = field.scene(&options);
        assert_eq!(
            scene.primitives,
            vec![Primitive::Drawing {
                vertices: vec![Point::new(5, 5)],
                border: palette::DRAW_BORDER,
            }]
        );
    }
}
