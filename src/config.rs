use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use roadtour_core::routing::DEFAULT_CACHE_CAPACITY;
use roadtour_core::{DelayModel, RoadGraphConfig};
use serde::Deserialize;

/// Contents of the optional `roadtour.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data: Option<RoadGraphConfig>,
    pub delay: DelayModel,
    pub solver: SolverConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub parallel_matrix: bool,
    pub cache_capacity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            parallel_matrix: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Command line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub nodes: Option<PathBuf>,
    pub edges: Option<PathBuf>,
    pub default_speed_kmh: Option<f64>,
    pub parallel_matrix: bool,
}

impl AppConfig {
    /// Reads the config file at `path`, or returns defaults without one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies command line overrides; the graph tables must be known afterwards.
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        let data = match (self.data.take(), overrides.nodes, overrides.edges) {
            (file, Some(nodes), Some(edges)) => {
                let mut data = RoadGraphConfig::new(nodes, edges);
                if let Some(file) = file {
                    data.default_speed_kmh = file.default_speed_kmh;
                }
                data
            }
            (Some(mut data), nodes, edges) => {
                if let Some(nodes) = nodes {
                    data.node_csv = nodes;
                }
                if let Some(edges) = edges {
                    data.edge_csv = edges;
                }
                data
            }
            (None, _, _) => {
                bail!("Road network not configured: pass --nodes and --edges or a [data] section")
            }
        };

        self.data = Some(RoadGraphConfig {
            default_speed_kmh: overrides
                .default_speed_kmh
                .unwrap_or(data.default_speed_kmh),
            ..data
        });
        self.solver.parallel_matrix |= overrides.parallel_matrix;
        Ok(self)
    }
}
