use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::cache::ShortestPathCache;
use super::dijkstra::{ShortestPathTree, shortest_path_tree};
use crate::{Cost, DelayModel, Error, NodeId, RoadGraph};

/// Number of cached shortest path trees of a [`Router::new`]
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Point-to-point shortest route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub source: NodeId,
    pub goal: NodeId,
    /// Pure travel time in minutes
    pub cost: Cost,
    pub nodes: Vec<NodeId>,
}

impl Route {
    /// Travel time corrected by maneuver, signal and stop delays
    pub fn adjusted_cost(&self, graph: &RoadGraph, delay: &DelayModel) -> Cost {
        delay.adjusted_cost(graph, &self.nodes, self.cost)
    }
}

/// Shortest path engine over a borrowed road graph.
///
/// Trees computed for a source are kept in an LRU cache so repeated goal
/// queries against the same source do not rerun Dijkstra.
#[derive(Debug)]
pub struct Router<'g> {
    graph: &'g RoadGraph,
    cache: ShortestPathCache,
}

impl<'g> Router<'g> {
    pub fn new(graph: &'g RoadGraph) -> Self {
        Self::with_capacity(graph, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(graph: &'g RoadGraph, capacity: usize) -> Self {
        Self {
            graph,
            cache: ShortestPathCache::new(capacity),
        }
    }

    /// Router whose cache holds exactly one tree per visit-set node
    pub fn for_visit_set(graph: &'g RoadGraph, visit_set: &[NodeId]) -> Self {
        Self::with_capacity(graph, visit_set.len().max(1))
    }

    pub fn graph(&self) -> &'g RoadGraph {
        self.graph
    }

    pub fn cache(&self) -> &ShortestPathCache {
        &self.cache
    }

    /// Shortest path tree rooted at `source`, served from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSource`] if `source` is not a graph node.
    pub fn solve(&mut self, source: NodeId) -> Result<Arc<ShortestPathTree>, Error> {
        if let Some(tree) = self.cache.get(source) {
            return Ok(tree);
        }

        let tree = Arc::new(shortest_path_tree(self.graph, source)?);
        debug!("Computed shortest path tree for source {source}");
        self.cache.put(Arc::clone(&tree));
        Ok(tree)
    }

    /// Shortest route from `source` to `goal`, `None` if `goal` is unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSource`] or [`Error::UnknownNode`] for ids
    /// that are not part of the graph.
    pub fn route(&mut self, source: NodeId, goal: NodeId) -> Result<Option<Route>, Error> {
        let tree = self.solve(source)?;
        if !self.graph.contains(goal) {
            return Err(Error::UnknownNode(goal));
        }

        let Some(cost) = tree.cost(goal) else {
            return Ok(None);
        };

        Ok(Some(Route {
            source,
            goal,
            cost,
            nodes: tree.path_to(goal)?,
        }))
    }

    /// Minimal travel time from `source` to `goal`, `None` if unreachable.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn cost(&mut self, source: NodeId, goal: NodeId) -> Result<Option<Cost>, Error> {
        let tree = self.solve(source)?;
        if !self.graph.contains(goal) {
            return Err(Error::UnknownNode(goal));
        }

        Ok(tree.cost(goal))
    }
}
