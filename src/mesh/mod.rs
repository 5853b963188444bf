pub mod builder;

pub use builder::{GridCoord, Mesh, MeshCell};
