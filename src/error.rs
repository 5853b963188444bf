//! Error types for map loading, route search and obstacle editing

use thiserror::Error;

/// Failure while reading or writing a map file
#[derive(Error, Debug)]
pub enum MapError {
    #[error("map file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed map file: {0}")]
    Malformed(String),

    #[error("value out of range: {0}")]
    InvalidValue(String),
}

impl MapError {
    /// Numeric code reported to the editor: -1 I/O, -2 malformed, -3 out of range
    pub fn code(&self) -> i32 {
        match self {
            MapError::Io(_) => -1,
            MapError::Malformed(_) => -2,
            MapError::InvalidValue(_) => -3,
        }
    }
}

/// Why a route could not be produced
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("start and end must both be set")]
    MissingEndpoint,

    #[error("start or end lies outside the field")]
    OutOfBounds,

    #[error("start or end sits on an impassable cell")]
    Blocked,

    #[error("no route between start and end")]
    NoPath,
}

impl SearchError {
    /// Length reported in place of a route: -1 when the request was
    /// incomplete, 0 when nothing was found
    pub fn sentinel(&self) -> f64 {
        match self {
            SearchError::MissingEndpoint => -1.0,
            _ => 0.0,
        }
    }
}

/// Rejected obstacle edit
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    #[error("an editing session is still open")]
    SessionOpen,

    #[error("no editing session is open")]
    NoSession,

    #[error("nothing to edit at the given point")]
    NotFound,

    #[error("polygon would overlap another obstacle")]
    Overlap,

    #[error("point lies outside the field")]
    OutOfBounds,

    #[error("polygon needs at least three vertices")]
    Degenerate,

    #[error("walkness must lie in [0, 1]")]
    InvalidWalkness,

    #[error("polygon would intersect itself")]
    NotSimple,

    #[error("drag handle no longer refers to a live vertex")]
    StaleHandle,
}
