use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fixed bounds shared by the editor and the map format.
pub mod limits {
    /// Smallest field edge accepted from a map file
    pub const MIN_FIELD_SIZE: u32 = 100;
    /// Largest field edge accepted from a map file
    pub const MAX_FIELD_SIZE: u32 = 2000;
    /// Mesh stride never drops below this
    pub const MIN_CELL_SIZE: u32 = 2;
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_cell_size() -> u32 {
    4
}
fn default_grab_radius() -> f64 {
    6.0
}
fn default_splice_interval() -> f64 {
    10.0
}

/// Tunables for mesh building, vertex grabbing and route refinement
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Mesh stride in field units
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// How close a click must land to a vertex to grab it
    #[serde(default = "default_grab_radius")]
    pub grab_radius: f64,
    /// Spacing between resampled route points
    #[serde(default = "default_splice_interval")]
    pub splice_interval: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            grab_radius: default_grab_radius(),
            splice_interval: default_splice_interval(),
        }
    }
}

impl PlannerConfig {
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size.max(limits::MIN_CELL_SIZE);
        self
    }

    pub fn with_splice_interval(mut self, interval: f64) -> Self {
        if interval > 0.0 {
            self.splice_interval = interval;
        }
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub planner: PlannerConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            verbose: false,
            planner: PlannerConfig::default(),
        }
    }
}

impl FileConfig {
    /// Load the first readable config from the usual search locations
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match Self::parse(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Read and parse a specific config file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&contents).context("Failed to parse config file")
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(contents)?;
        config.planner.cell_size = config.planner.cell_size.max(limits::MIN_CELL_SIZE);
        Ok(config)
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("pathfield.toml"));
    paths.push(PathBuf::from(".pathfield.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("pathfield").join("config.toml"));
        paths.push(config_dir.join("pathfield.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".pathfield.toml"));
    }

    paths
}
