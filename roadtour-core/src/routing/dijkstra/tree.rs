use std::collections::BinaryHeap;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use log::trace;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::state::State;
use crate::{Cost, Error, NodeId, RoadGraph};

/// Result of a single-source shortest path query.
///
/// Holds the minimal travel time from the source to every reached node and
/// the predecessor of each reached node on its optimal path. The source maps
/// to `None` ("no predecessor"); unreached nodes have no entry at all.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: NodeId,
    costs: HashMap<NodeId, Cost>,
    predecessors: HashMap<NodeId, Option<NodeId>>,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Minimal travel time to `node`, `None` if unreachable
    pub fn cost(&self, node: NodeId) -> Option<Cost> {
        self.costs.get(&node).copied()
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.costs.contains_key(&node)
    }

    /// Predecessor of `node` on its shortest path, `None` for the source or
    /// an unreached node
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessors.get(&node).copied().flatten()
    }

    /// Number of reached nodes, the source included
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn costs(&self) -> impl Iterator<Item = (NodeId, Cost)> + '_ {
        self.costs.iter().map(|(&node, &cost)| (node, cost))
    }

    /// Reconstructs the shortest path from the source to `goal` by walking
    /// predecessor links backwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPath`] if `goal` was not reached from the source.
    pub fn path_to(&self, goal: NodeId) -> Result<Vec<NodeId>, Error> {
        if goal != self.source && !self.predecessors.contains_key(&goal) {
            return Err(Error::NoPath {
                from: self.source,
                goal,
            });
        }

        let mut path = vec![goal];
        let mut current = goal;
        while let Some(&Some(prev)) = self.predecessors.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();

        Ok(path)
    }
}

/// Dijkstra's algorithm over the road graph.
///
/// Label-setting search with lazy deletion: stale heap entries are skipped
/// instead of decreasing keys in place. Edges with infinite cost (the
/// forbidden direction of a one-way street) are never relaxed.
///
/// # Errors
///
/// Returns [`Error::UnknownSource`] if `source` is not a node of `graph`.
pub fn shortest_path_tree(graph: &RoadGraph, source: NodeId) -> Result<ShortestPathTree, Error> {
    let start = graph
        .node_index(source)
        .ok_or(Error::UnknownSource(source))?;

    let estimated_nodes = graph.node_count().min(4096);
    let mut distances: HashMap<NodeIndex, Cost> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        id: source,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node, .. }) = heap.pop() {
        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        for edge in graph.graph.edges(node) {
            let weight = edge.weight().cost;
            if !weight.is_finite() {
                continue;
            }

            let next = edge.target();
            let next_cost = cost + weight;
            let improved = match distances.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    true
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        true
                    } else {
                        false
                    }
                }
            };

            if improved {
                predecessors.insert(next, node);
                heap.push(State {
                    cost: next_cost,
                    id: graph.graph[next].id,
                    node: next,
                });
            }
        }
    }

    trace!("Dijkstra from {source} reached {} nodes", distances.len());

    let id = |idx: NodeIndex| graph.graph[idx].id;
    let mut tree_predecessors: HashMap<NodeId, Option<NodeId>> = predecessors
        .into_iter()
        .filter(|&(node, _)| node != start)
        .map(|(node, prev)| (id(node), Some(id(prev))))
        .collect();
    tree_predecessors.insert(source, None);

    Ok(ShortestPathTree {
        source,
        costs: distances
            .into_iter()
            .map(|(node, cost)| (id(node), cost))
            .collect(),
        predecessors: tree_predecessors,
    })
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::test_utils::{diamond, grid, node, street};

    fn path_cost(graph: &RoadGraph, path: &[NodeId]) -> Cost {
        path.iter()
            .tuple_windows()
            .map(|(&u, &v)| graph.edge_cost(u, v).unwrap())
            .sum()
    }

    #[test]
    fn test_source_has_zero_cost_and_no_predecessor() {
        let graph = diamond();
        let tree = shortest_path_tree(&graph, 1).unwrap();

        assert_eq!(tree.source(), 1);
        assert_eq!(tree.cost(1), Some(0.0));
        assert_eq!(tree.predecessor(1), None);
        assert_eq!(tree.path_to(1).unwrap(), vec![1]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_unknown_source() {
        let graph = diamond();
        assert!(matches!(
            shortest_path_tree(&graph, 99),
            Err(Error::UnknownSource(99))
        ));
    }

    #[test]
    fn test_one_way_diamond_routes_around() {
        let graph = diamond();

        let forward = shortest_path_tree(&graph, 1).unwrap();
        let backward = shortest_path_tree(&graph, 2).unwrap();

        let there = forward.cost(2).unwrap();
        let back = backward.cost(1).unwrap();
        assert!(there < back);
        assert!((there - 1.0).abs() < 1e-9);
        assert!((back - 6.0).abs() < 1e-9);

        assert_eq!(forward.path_to(2).unwrap(), vec![1, 2]);
        assert_eq!(backward.path_to(1).unwrap(), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_unreachable_goal_reports_no_path() {
        // 1 -> 2 is one-way and 2 has no other streets
        let graph = RoadGraph::build(
            &[node(1, 0.0, 0.0), node(2, 1.0, 0.0), node(3, 5.0, 5.0)],
            &[street(1, 2, 1.0, true)],
        )
        .unwrap();

        let tree = shortest_path_tree(&graph, 2).unwrap();
        assert!(!tree.is_reachable(1));
        assert_eq!(tree.cost(1), None);
        assert!(matches!(
            tree.path_to(1),
            Err(Error::NoPath { from: 2, goal: 1 })
        ));
        // Isolated node
        assert!(matches!(tree.path_to(3), Err(Error::NoPath { .. })));
    }

    #[test]
    fn test_costs_satisfy_bellman_optimality() {
        let graph = grid(6);

        for source in [1, 8, 21, 36] {
            let tree = shortest_path_tree(&graph, source).unwrap();
            assert_eq!(tree.cost(source), Some(0.0));

            for (v, cost_v) in tree.costs() {
                let mut best_incoming = f64::INFINITY;
                for u in graph.nodes().map(|n| n.id) {
                    let (Some(cost_u), Some(weight)) = (tree.cost(u), graph.edge_cost(u, v)) else {
                        continue;
                    };
                    if weight.is_finite() {
                        // No finite edge can improve a settled label
                        assert!(cost_v <= cost_u + weight + 1e-9);
                        best_incoming = best_incoming.min(cost_u + weight);
                    }
                }
                if v != source {
                    assert!((cost_v - best_incoming).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_paths_are_consistent_with_costs() {
        let graph = grid(6);
        let tree = shortest_path_tree(&graph, 15).unwrap();

        for (goal, cost) in tree.costs() {
            let path = tree.path_to(goal).unwrap();
            assert_eq!(path.first(), Some(&15));
            assert_eq!(path.last(), Some(&goal));

            let walked = path_cost(&graph, &path);
            assert!(walked.is_finite(), "path {path:?} uses a forbidden direction");
            assert!((walked - cost).abs() <= 1e-9 * cost.max(1.0));
        }
    }

    #[test]
    fn test_blocked_direction_is_never_used() {
        let graph = grid(5);
        for source in graph.nodes().map(|n| n.id) {
            let tree = shortest_path_tree(&graph, source).unwrap();
            for (goal, _) in tree.costs() {
                let path = tree.path_to(goal).unwrap();
                for (&u, &v) in path.iter().tuple_windows() {
                    assert!(graph.edge(u, v).unwrap().is_traversable());
                }
            }
        }
    }
}
