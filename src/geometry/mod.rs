pub mod polygon;
pub mod segment;

pub use polygon::{
    centroid, contains_point, is_simple, polygon_holds_segment, polygons_intersect,
    segment_intersects_polygon,
};
pub use segment::{distance_to_segment, nearest_point_on_segment};
