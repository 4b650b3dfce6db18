//! Post-hoc delay correction of realized travel times.
//!
//! Shortest paths are computed on pure travel time. The delays here
//! (maneuvers, traffic signals, departure and final stop) are added to the
//! realized path afterwards and never feed back into edge weights.

use serde::{Deserialize, Serialize};

use crate::{Cost, NodeId, RoadGraph};

/// Delay parameters, all in minutes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayModel {
    /// Delay per node passed on the path
    pub maneuver_delay: Cost,
    /// Delay per signal-controlled intersection on the path
    pub signal_delay: Cost,
    /// Delay of departing, applied once more for the final stop
    pub departure_stop_delay: Cost,
}

impl Default for DelayModel {
    fn default() -> Self {
        Self {
            maneuver_delay: 0.05,
            signal_delay: 0.5,
            departure_stop_delay: 0.5,
        }
    }
}

impl DelayModel {
    /// Delay-free model; adjusted costs equal travel times
    pub fn zero() -> Self {
        Self {
            maneuver_delay: 0.0,
            signal_delay: 0.0,
            departure_stop_delay: 0.0,
        }
    }

    /// `travel_time + |path| * maneuver + signals * signal + 2 * departure_stop`
    pub fn adjusted_cost(&self, graph: &RoadGraph, path: &[NodeId], travel_time: Cost) -> Cost {
        self.correct(travel_time, path.len(), signal_count(graph, path))
    }

    /// Same correction as [`DelayModel::adjusted_cost`] over the flattened
    /// legs of a tour.
    pub fn adjusted_tour_cost<P>(&self, graph: &RoadGraph, legs: &[P], travel_time: Cost) -> Cost
    where
        P: AsRef<[NodeId]>,
    {
        let nodes = legs.iter().map(|leg| leg.as_ref().len()).sum();
        self.correct(travel_time, nodes, signal_count_legs(graph, legs))
    }

    #[allow(clippy::cast_precision_loss)]
    fn correct(&self, travel_time: Cost, nodes: usize, signals: usize) -> Cost {
        travel_time
            + nodes as f64 * self.maneuver_delay
            + signals as f64 * self.signal_delay
            + self.departure_stop_delay * 2.0
    }
}

/// Number of signal-controlled intersections on a path
pub fn signal_count(graph: &RoadGraph, path: &[NodeId]) -> usize {
    path.iter()
        .filter_map(|&id| graph.node(id))
        .filter(|node| node.is_signal())
        .count()
}

/// Number of signal-controlled intersections over several legs
pub fn signal_count_legs<P>(graph: &RoadGraph, legs: &[P]) -> usize
where
    P: AsRef<[NodeId]>,
{
    legs.iter()
        .flat_map(|leg| leg.as_ref().iter())
        .filter_map(|&id| graph.node(id))
        .filter(|node| node.is_signal())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{node, signal, street};

    fn graph() -> RoadGraph {
        RoadGraph::build(
            &[
                node(1, 0.0, 0.0),
                signal(2, 1.0, 0.0),
                node(3, 2.0, 0.0),
                signal(4, 3.0, 0.0),
            ],
            &[
                street(1, 2, 1.0, false),
                street(2, 3, 1.0, false),
                street(3, 4, 1.0, false),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_signal_count() {
        let graph = graph();
        assert_eq!(signal_count(&graph, &[1, 2, 3, 4]), 2);
        assert_eq!(signal_count(&graph, &[1, 3]), 0);
        assert_eq!(signal_count(&graph, &[]), 0);
        assert_eq!(signal_count_legs(&graph, &[vec![1, 2], vec![2, 3, 4]]), 3);
    }

    #[test]
    fn test_adjusted_cost() {
        let graph = graph();
        let delay = DelayModel {
            maneuver_delay: 0.1,
            signal_delay: 1.0,
            departure_stop_delay: 0.25,
        };

        // 10 + 4 * 0.1 + 2 * 1.0 + 0.25 * 2
        let adjusted = delay.adjusted_cost(&graph, &[1, 2, 3, 4], 10.0);
        assert!((adjusted - 12.9).abs() < 1e-9);

        // legs flatten: 5 nodes, 3 signals
        let legs = [vec![1, 2], vec![2, 3, 4]];
        let adjusted = delay.adjusted_tour_cost(&graph, &legs, 10.0);
        assert!((adjusted - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_model_is_identity() {
        let graph = graph();
        assert_eq!(DelayModel::zero().adjusted_cost(&graph, &[1, 2, 3], 7.5), 7.5);
    }
}
