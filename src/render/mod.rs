//! Backend-neutral description of what the editor draws.
//!
//! The core never paints; it hands out a [`Scene`] of shaded primitives that
//! a widget, or the SVG exporter here, turns into pixels.

pub mod scene;
pub mod svg;

pub use scene::{Primitive, Scene};
pub use svg::{scene_to_svg, write_svg};

/// Which layers to include in a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Shade every mesh cell by its sampled walkness
    pub show_grid: bool,
    pub show_obstacles: bool,
    pub show_path: bool,
    pub show_waypoints: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_grid: false,
            show_obstacles: true,
            show_path: true,
            show_waypoints: true,
        }
    }
}

impl RenderOptions {
    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub mod palette {
    use super::Rgb;

    pub const EASY: Rgb = Rgb(212, 212, 212);
    pub const HARD: Rgb = Rgb(74, 74, 74);
    pub const START: Rgb = Rgb(56, 186, 112);
    pub const END: Rgb = Rgb(204, 103, 59);
    pub const OUTLINE: Rgb = Rgb(0, 0, 0);
    pub const DRAW_BORDER: Rgb = Rgb(53, 51, 97);
    pub const DRAW_LAST_POINT: Rgb = Rgb(76, 76, 224);
    pub const PATH: Rgb = Rgb(200, 40, 40);
}

/// Linear blend: `factor` 0 gives `easy`, 1 gives `hard`
pub fn mix(easy: Rgb, hard: Rgb, factor: f64) -> Rgb {
    let t = factor.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
    Rgb(
        channel(easy.0, hard.0),
        channel(easy.1, hard.1),
        channel(easy.2, hard.2),
    )
}

/// Fill colour for a region of the given walkness
pub fn shade(walkness: f64) -> Rgb {
    mix(palette::EASY, palette::HARD, walkness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        assert_eq!(shade(0.0), palette::EASY);
        assert_eq!(shade(1.0), palette::HARD);
        assert_eq!(shade(0.5), Rgb(143, 143, 143));
    }

    #[test]
    fn test_mix_clamps_factor() {
        assert_eq!(shade(-1.0), palette::EASY);
        assert_eq!(shade(7.0), palette::HARD);
    }

    #[test]
    fn test_hex() {
        assert_eq!(palette::START.hex(), "#38ba70");
    }
}
