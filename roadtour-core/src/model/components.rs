//! Road network components - nodes and edges

use geo::Point;
use serde::Serialize;

use crate::{Cost, NodeId};

/// `highway` tag value of a signal-controlled intersection
pub const SIGNAL_HIGHWAY_TAG: &str = "traffic_signals";

/// Road graph node
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNode {
    /// OSM ID of the node
    pub id: NodeId,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
    /// OSM `highway` tag of the node, if any
    pub highway: Option<String>,
}

impl RoadNode {
    pub fn is_signal(&self) -> bool {
        self.highway.as_deref() == Some(SIGNAL_HIGHWAY_TAG)
    }
}

/// Directed road graph edge (one direction of a street segment)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadEdge {
    /// External (OSM way) identifier
    pub id: String,
    /// Travel time in minutes, `f64::INFINITY` for a forbidden direction
    pub cost: Cost,
    /// Segment length in meters
    pub length: f64,
}

impl RoadEdge {
    pub fn is_traversable(&self) -> bool {
        self.cost.is_finite()
    }
}

/// Travel time in minutes over `length_m` meters at `speed_kmh`.
pub fn travel_time(length_m: f64, speed_kmh: f64) -> Cost {
    (length_m / 1000.0) / speed_kmh * 60.0
}
