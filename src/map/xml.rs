//! Serde mirror of the map file layout
//!
//! ```xml
//! <map width="800" height="600">
//!   <polygons>
//!     <poly walkness="0.5"><point x="10" y="10"/>...</poly>
//!   </polygons>
//!   <path><point x="0" y="0"/>...</path>
//!   <start x="0" y="0"/>
//!   <end x="90" y="90"/>
//! </map>
//! ```
//!
//! Numeric attributes are kept as text here. The loader parses them itself,
//! so a value that is present but unreadable is an invalid value rather
//! than a malformed document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "map")]
pub struct MapDocument {
    #[serde(rename = "@width")]
    pub width: String,
    #[serde(rename = "@height")]
    pub height: String,
    #[serde(default)]
    pub polygons: PolygonsElement,
    #[serde(default)]
    pub path: PathElement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<PointElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<PointElement>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PolygonsElement {
    #[serde(rename = "poly", default)]
    pub polys: Vec<PolyElement>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolyElement {
    #[serde(rename = "@walkness")]
    pub walkness: String,
    #[serde(rename = "point", default)]
    pub points: Vec<PointElement>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PathElement {
    #[serde(rename = "point", default)]
    pub points: Vec<PointElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointElement {
    #[serde(rename = "@x")]
    pub x: String,
    #[serde(rename = "@y")]
    pub y: String,
}
