//! Loading and saving obstacle maps.

pub mod xml;

use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::limits::{MAX_FIELD_SIZE, MIN_FIELD_SIZE};
use crate::domain::{Obstacle, Point};
use crate::error::MapError;
use xml::{MapDocument, PathElement, PointElement, PolyElement, PolygonsElement};

/// Everything a map file carries
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    pub width: u32,
    pub height: u32,
    pub obstacles: Vec<Obstacle>,
    pub start: Option<Point>,
    pub end: Option<Point>,
    /// Cached route points in field coordinates
    pub path: Vec<Point>,
}

/// Read and validate a map file
pub fn load_map(path: &Path) -> Result<MapData, MapError> {
    let text = fs::read_to_string(path)?;
    let data = parse_map(&text)?;
    debug!(
        "Loaded map {:?}: {}x{}, {} obstacles, {} path points",
        path,
        data.width,
        data.height,
        data.obstacles.len(),
        data.path.len()
    );
    Ok(data)
}

/// Write a map file, replacing any existing one
pub fn save_map(path: &Path, data: &MapData) -> Result<(), MapError> {
    let text = to_xml(data)?;
    fs::write(path, text)?;
    debug!("Saved map {:?}", path);
    Ok(())
}

/// Parse map text, checking every value against the declared field size
///
/// Overlapping obstacles are accepted as written.
pub fn parse_map(text: &str) -> Result<MapData, MapError> {
    let doc: MapDocument =
        quick_xml::de::from_str(text).map_err(|e| MapError::Malformed(e.to_string()))?;

    let width = field_edge("width", &doc.width)?;
    let height = field_edge("height", &doc.height)?;

    let mut obstacles = Vec::with_capacity(doc.polygons.polys.len());
    for poly in &doc.polygons.polys {
        let walkness = walkness_value(&poly.walkness)?;
        let vertices = poly
            .points
            .iter()
            .map(|p| checked_point(p, width, height))
            .collect::<Result<Vec<_>, _>>()?;
        if vertices.len() < 3 {
            return Err(MapError::InvalidValue(format!(
                "polygon with {} vertices",
                vertices.len()
            )));
        }
        obstacles.push(Obstacle::new(vertices, walkness));
    }

    let path = doc
        .path
        .points
        .iter()
        .map(|p| checked_point(p, width, height))
        .collect::<Result<Vec<_>, _>>()?;
    let start = doc
        .start
        .as_ref()
        .map(|p| checked_point(p, width, height))
        .transpose()?;
    let end = doc
        .end
        .as_ref()
        .map(|p| checked_point(p, width, height))
        .transpose()?;

    Ok(MapData {
        width,
        height,
        obstacles,
        start,
        end,
        path,
    })
}

/// Render a map as indented XML
pub fn to_xml(data: &MapData) -> Result<String, MapError> {
    let doc = MapDocument {
        width: data.width.to_string(),
        height: data.height.to_string(),
        polygons: PolygonsElement {
            polys: data
                .obstacles
                .iter()
                .map(|o| PolyElement {
                    walkness: o.walkness.to_string(),
                    points: o.vertices.iter().copied().map(point_element).collect(),
                })
                .collect(),
        },
        path: PathElement {
            points: data.path.iter().copied().map(point_element).collect(),
        },
        start: data.start.map(point_element),
        end: data.end.map(point_element),
    };

    let mut buffer = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);
    doc.serialize(serializer)
        .map_err(|e| MapError::Malformed(e.to_string()))?;
    buffer.push('\n');
    Ok(buffer)
}

/// Editor-facing status code for a load or save: 0 on success
pub fn error_code<T>(result: &Result<T, MapError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.code(),
    }
}

fn integer(name: &str, text: &str) -> Result<i64, MapError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| MapError::InvalidValue(format!("{} '{}' is not an integer", name, text)))
}

fn walkness_value(text: &str) -> Result<f64, MapError> {
    let walkness = text
        .trim()
        .parse::<f64>()
        .map_err(|_| MapError::InvalidValue(format!("walkness '{}' is not a number", text)))?;
    if !(0.0..=1.0).contains(&walkness) {
        return Err(MapError::InvalidValue(format!(
            "walkness {} outside [0, 1]",
            walkness
        )));
    }
    Ok(walkness)
}

fn field_edge(name: &str, text: &str) -> Result<u32, MapError> {
    let value = integer(name, text)?;
    if value < MIN_FIELD_SIZE as i64 || value > MAX_FIELD_SIZE as i64 {
        return Err(MapError::InvalidValue(format!(
            "{} {} outside [{}, {}]",
            name, value, MIN_FIELD_SIZE, MAX_FIELD_SIZE
        )));
    }
    Ok(value as u32)
}

fn checked_point(p: &PointElement, width: u32, height: u32) -> Result<Point, MapError> {
    let x = integer("x", &p.x)?;
    let y = integer("y", &p.y)?;
    if x < 0 || y < 0 || x > width as i64 || y > height as i64 {
        return Err(MapError::InvalidValue(format!(
            "point ({}, {}) outside {}x{} field",
            x, y, width, height
        )));
    }
    Ok(Point::new(x as i32, y as i32))
}

fn point_element(p: Point) -> PointElement {
    PointElement {
        x: p.x.to_string(),
        y: p.y.to_string(),
    }
}
