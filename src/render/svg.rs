use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::Point;

use super::{Primitive, Scene, palette};

const POLY_OUTLINE_WIDTH: f32 = 2.0;
const POINT_OUTLINE_WIDTH: f32 = 0.8;
const PATH_WIDTH: f32 = 1.5;
/// Highlight ring around the last vertex of a drawing
const LAST_POINT_RADIUS: u32 = 6;

/// Write a scene as a standalone SVG document
pub fn write_svg(path: &Path, scene: &Scene) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create SVG file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(scene_to_svg(scene).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Render a scene to SVG markup
pub fn scene_to_svg(scene: &Scene) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height
    ));
    lines.push(format!(
        r#"  <rect width="{}" height="{}" fill="{}"/>"#,
        scene.width,
        scene.height,
        palette::EASY.hex()
    ));

    for primitive in &scene.primitives {
        match primitive {
            Primitive::Cell { origin, size, fill } => {
                lines.push(format!(
                    r#"  <rect x="{}" y="{}" width="{size}" height="{size}" fill="{}"/>"#,
                    origin.x,
                    origin.y,
                    fill.hex()
                ));
            }
            Primitive::Polygon {
                vertices,
                fill,
                outline,
                label,
                walkness,
            } => {
                lines.push(format!(
                    r#"  <polygon points="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    points_attr(vertices),
                    fill.hex(),
                    outline.hex(),
                    POLY_OUTLINE_WIDTH
                ));
                if let Some(at) = label {
                    lines.push(format!(
                        r#"  <text x="{}" y="{}" text-anchor="middle" font-size="10">{:.2}</text>"#,
                        at.x, at.y, walkness
                    ));
                }
            }
            Primitive::Drawing { vertices, border } => {
                lines.push(format!(
                    r#"  <polygon points="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    points_attr(vertices),
                    palette::EASY.hex(),
                    border.hex(),
                    POLY_OUTLINE_WIDTH
                ));
                if let Some(last) = vertices.last() {
                    lines.push(format!(
                        r#"  <circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}"/>"#,
                        last.x,
                        last.y,
                        LAST_POINT_RADIUS,
                        palette::DRAW_LAST_POINT.hex()
                    ));
                }
            }
            Primitive::Polyline { points, stroke } => {
                lines.push(format!(
                    r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                    points_attr(points),
                    stroke.hex(),
                    PATH_WIDTH
                ));
            }
            Primitive::Marker { at, radius, fill } => {
                lines.push(format!(
                    r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    at.x,
                    at.y,
                    radius,
                    fill.hex(),
                    palette::OUTLINE.hex(),
                    POINT_OUTLINE_WIDTH
                ));
            }
        }
    }

    lines.push("</svg>\n".to_string());
    lines.join("\n")
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Rgb;
    use std::fs;
    use tempfile::tempdir;

    fn scene() -> Scene {
        Scene {
            width: 120,
            height: 80,
            primitives: vec![
                Primitive::Polygon {
                    vertices: vec![Point::new(10, 10), Point::new(50, 10), Point::new(30, 40)],
                    fill: Rgb(143, 143, 143),
                    outline: palette::OUTLINE,
                    label: Some(Point::new(30, 20)),
                    walkness: 0.5,
                },
                Primitive::Marker {
                    at: Point::new(5, 5),
                    radius: 4,
                    fill: palette::START,
                },
            ],
        }
    }

    #[test]
    fn test_scene_to_svg() {
        let svg = scene_to_svg(&scene());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 120 80""#));
        assert!(svg.contains(r##"points="10,10 50,10 30,40" fill="#8f8f8f""##));
        assert!(svg.contains(">0.50</text>"));
        assert!(svg.contains(r##"fill="#38ba70""##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_write_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("field.svg");

        write_svg(&path, &scene()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, scene_to_svg(&scene()));
    }
}
