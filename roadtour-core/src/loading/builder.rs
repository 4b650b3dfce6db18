use log::info;

use super::config::RoadGraphConfig;
use super::records::{read_edge_csv, read_node_csv};
use crate::{Error, RoadGraph};

/// Creates a road graph from the node and edge tables named in the configuration
///
/// # Errors
///
/// Returns an error if the files are missing or unreadable, a row cannot be
/// parsed, or the records do not form a consistent graph
pub fn create_road_graph(config: &RoadGraphConfig) -> Result<RoadGraph, Error> {
    validate_config(config)?;

    info!("Reading road nodes: {}", config.node_csv.display());
    let nodes = read_node_csv(&config.node_csv)?;

    info!("Reading road edges: {}", config.edge_csv.display());
    let edges = read_edge_csv(&config.edge_csv)?;

    info!("Loaded {} node and {} edge records", nodes.len(), edges.len());
    RoadGraph::build_with_speed(&nodes, &edges, config.default_speed_kmh)
}

fn validate_config(config: &RoadGraphConfig) -> Result<(), Error> {
    for path in [&config.node_csv, &config.edge_csv] {
        if !path.exists() {
            return Err(Error::InvalidData(format!(
                "Input table not found: {}",
                path.display()
            )));
        }
    }

    if !(config.default_speed_kmh.is_finite() && config.default_speed_kmh > 0.0) {
        return Err(Error::InvalidData(format!(
            "Default speed must be positive, got {}",
            config.default_speed_kmh
        )));
    }

    Ok(())
}
