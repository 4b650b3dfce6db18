//! This module is responsible for loading node and edge records extracted
//! from OpenStreetMap (CSV tables) and building a road graph from them.

mod builder;
mod config;
pub(crate) mod de;
mod records;

pub use builder::create_road_graph;
pub use config::RoadGraphConfig;
pub use records::{
    EdgeRecord, NodeRecord, read_edge_csv, read_edge_records, read_node_csv, read_node_records,
};
