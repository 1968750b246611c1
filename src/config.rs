use std::{fs, path::Path};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    /// layout tuning
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// horizontal separation between ranks
    pub rank_sep: f64,
    /// vertical separation between nodes in the same rank
    pub node_sep: f64,
    /// graph margins
    pub margin_x: f64,
    pub margin_y: f64,
    /// minimum allowed distance between any two node positions
    pub min_distance: f64,
    /// fallback grid cell size for nodes the layered pass never reached
    pub grid_x: f64,
    pub grid_y: f64,
    /// fallback grid width in cells
    pub fallback_columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rank_sep: 200.0,
            node_sep: 120.0,
            margin_x: 100.0,
            margin_y: 100.0,
            min_distance: 120.0,
            grid_x: 300.0,
            grid_y: 200.0,
            fallback_columns: 4,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Self {
        let data = fs::read_to_string(path.as_ref()).expect(&format!("failed to load config file {:?}", path.as_ref()));

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Self {
        let config = toml::from_str::<Config>(toml_str).expect("failed to parse the toml str");
        config
    }
}
