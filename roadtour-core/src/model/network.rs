use geo::Point;
use hashbrown::HashMap;
use log::info;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::components::{RoadEdge, RoadNode, travel_time};
use crate::loading::{EdgeRecord, NodeRecord};
use crate::{Cost, DEFAULT_SPEED_KMH, Error, NodeId};

/// Node coordinates tagged with the node id, stored in the spatial index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeId>;

/// Directed road graph.
///
/// Built once from node and edge records and read-only afterwards, so it can
/// be shared between threads without synchronization.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    pub(crate) graph: DiGraph<RoadNode, RoadEdge>,
    index: HashMap<NodeId, NodeIndex>,
    rtree: RTree<IndexedPoint>,
}

impl RoadGraph {
    /// Builds the graph assuming [`DEFAULT_SPEED_KMH`] for edges without a speed limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if an edge references an unknown node,
    /// a node id is duplicated, or an edge has an invalid length or speed.
    pub fn build(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Result<Self, Error> {
        Self::build_with_speed(nodes, edges, DEFAULT_SPEED_KMH)
    }

    /// Builds the graph with a custom fallback speed (km/h) for edges without a speed limit.
    ///
    /// # Errors
    ///
    /// See [`RoadGraph::build`].
    pub fn build_with_speed(
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
        default_speed_kmh: f64,
    ) -> Result<Self, Error> {
        if !(default_speed_kmh.is_finite() && default_speed_kmh > 0.0) {
            return Err(Error::InvalidData(format!(
                "Default speed must be positive, got {default_speed_kmh}"
            )));
        }

        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len() * 2);
        let mut index = HashMap::with_capacity(nodes.len());

        for record in nodes {
            if index.contains_key(&record.osmid) {
                return Err(Error::MalformedRecord(format!(
                    "duplicate node {}",
                    record.osmid
                )));
            }
            let idx = graph.add_node(RoadNode {
                id: record.osmid,
                geometry: Point::new(record.x, record.y),
                highway: record.highway.clone().filter(|tag| !tag.is_empty()),
            });
            index.insert(record.osmid, idx);
        }

        for record in edges {
            let (Some(&u), Some(&v)) = (index.get(&record.u), index.get(&record.v)) else {
                let missing = if index.contains_key(&record.u) {
                    record.v
                } else {
                    record.u
                };
                return Err(Error::MalformedRecord(format!(
                    "edge {} ({} -> {}) references unknown node {missing}",
                    record.osmid, record.u, record.v
                )));
            };

            let speed = record.maxspeed.unwrap_or(default_speed_kmh);
            if !(record.length.is_finite() && record.length >= 0.0) {
                return Err(Error::MalformedRecord(format!(
                    "edge {} has invalid length {}",
                    record.osmid, record.length
                )));
            }
            if !(speed.is_finite() && speed > 0.0) {
                return Err(Error::MalformedRecord(format!(
                    "edge {} has invalid speed {speed}",
                    record.osmid
                )));
            }

            let cost = travel_time(record.length, speed);
            let (forward, backward) = match (record.oneway, record.reversed) {
                (true, false) => (cost, f64::INFINITY),
                (true, true) => (f64::INFINITY, cost),
                (false, _) => (cost, cost),
            };

            let edge = |cost| RoadEdge {
                id: record.osmid.clone(),
                cost,
                length: record.length,
            };
            // Later records for the same ordered pair replace earlier ones
            graph.update_edge(u, v, edge(forward));
            if u != v {
                graph.update_edge(v, u, edge(backward));
            }
        }

        let rtree = RTree::bulk_load(
            graph
                .node_weights()
                .map(|node| IndexedPoint::new([node.geometry.x(), node.geometry.y()], node.id))
                .collect(),
        );

        info!(
            "Road graph built: {} nodes, {} directed edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            index,
            rtree,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.index
            .get(&id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RoadNode> {
        self.graph.node_weights()
    }

    /// Outgoing edges of `id`, including forbidden (infinite cost) directions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if `id` is not part of the graph.
    pub fn neighbors(
        &self,
        id: NodeId,
    ) -> Result<impl Iterator<Item = (NodeId, &RoadEdge)>, Error> {
        let idx = self.node_index(id).ok_or(Error::UnknownNode(id))?;
        Ok(self
            .graph
            .edges(idx)
            .map(|edge| (self.graph[edge.target()].id, edge.weight())))
    }

    /// Cost of the directed edge `u -> v`, `None` if no such edge exists.
    /// A forbidden one-way direction yields `Some(f64::INFINITY)`.
    pub fn edge_cost(&self, u: NodeId, v: NodeId) -> Option<Cost> {
        self.edge(u, v).map(|edge| edge.cost)
    }

    pub fn edge(&self, u: NodeId, v: NodeId) -> Option<&RoadEdge> {
        let (u, v) = (self.node_index(u)?, self.node_index(v)?);
        self.graph
            .find_edge(u, v)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    /// Node closest (planar distance) to the given coordinate.
    pub fn nearest_node(&self, x: f64, y: f64) -> Option<NodeId> {
        self.rtree.nearest_neighbor(&[x, y]).map(|point| point.data)
    }

    pub(crate) fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }
}
