pub mod obstacle;
pub mod point;

pub use obstacle::Obstacle;
pub use point::Point;
