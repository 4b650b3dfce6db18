// Re-export key components
pub use crate::delay::DelayModel;
pub use crate::loading::{EdgeRecord, NodeRecord, RoadGraphConfig, create_road_graph};
pub use crate::model::{RoadEdge, RoadGraph, RoadNode};
pub use crate::routing::{Route, Router, ShortestPathTree, shortest_path_tree};
pub use crate::tour::{
    DistanceMatrix, PathMatrix, Tour, TourResult, TourSolver, build_matrix,
    build_matrix_parallel, construct, improve, solve_tour,
};

// Core types
pub use crate::Cost; // minutes
pub use crate::Error;
pub use crate::NodeId;
