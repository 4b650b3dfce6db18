//! Road network model
//!
//! Nodes and directed edges of the drivable street graph. Every street is
//! stored in both directions; the direction a one-way street forbids carries
//! an infinite travel time.

pub mod components;
pub mod network;

pub use components::{RoadEdge, RoadNode, SIGNAL_HIGHWAY_TAG, travel_time};
pub use network::{IndexedPoint, RoadGraph};
