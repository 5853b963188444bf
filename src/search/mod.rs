pub mod astar;

pub use astar::{AStarPlanner, PathPoint, SearchResult, find};
