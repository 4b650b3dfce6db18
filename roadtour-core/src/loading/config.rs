use std::path::PathBuf;

use serde::Deserialize;

use crate::DEFAULT_SPEED_KMH;

/// Location of the node/edge tables and graph construction parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoadGraphConfig {
    pub node_csv: PathBuf,
    pub edge_csv: PathBuf,
    /// Speed (km/h) used for edges without a usable `maxspeed`
    #[serde(default = "default_speed_kmh")]
    pub default_speed_kmh: f64,
}

impl RoadGraphConfig {
    pub fn new(node_csv: impl Into<PathBuf>, edge_csv: impl Into<PathBuf>) -> Self {
        Self {
            node_csv: node_csv.into(),
            edge_csv: edge_csv.into(),
            default_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

fn default_speed_kmh() -> f64 {
    DEFAULT_SPEED_KMH
}
