//! Road network routing and multi-stop tour optimization.
//!
//! The crate is organized around a read-only [`RoadGraph`]. A [`Router`]
//! answers single-source shortest path queries over it, and the [`tour`]
//! module reuses the router as a distance oracle for the travelling salesman
//! heuristic (farthest-pair seeded insertion followed by 2-opt).

pub mod delay;
mod error;
pub mod export;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod tour;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::Error;

pub use delay::DelayModel;
pub use loading::{EdgeRecord, NodeRecord, RoadGraphConfig, create_road_graph};
pub use model::{RoadEdge, RoadGraph, RoadNode};
pub use routing::{Route, Router, ShortestPathCache, ShortestPathTree, shortest_path_tree};
pub use tour::{DistanceMatrix, PathMatrix, Tour, TourResult, TourSolver};

/// External (OSM) identifier of a road network node
pub type NodeId = i64;

/// Travel time in minutes
pub type Cost = f64;

/// Speed assumed for road segments without a usable speed limit, km/h
pub const DEFAULT_SPEED_KMH: f64 = 40.0;
