use itertools::Itertools;
use log::info;
use serde::Serialize;

use super::matrix::first_duplicate;
use super::{
    DistanceMatrix, PathMatrix, build_matrix, build_matrix_parallel, construct, improve_traced,
};
use crate::routing::Router;
use crate::{Cost, DelayModel, Error, NodeId, RoadGraph};

/// Optimized tour over a visit set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourResult {
    /// Visit set in input order
    pub visit_set: Vec<NodeId>,
    /// Closed tour as indices into `visit_set`
    pub order: Vec<usize>,
    /// Closed tour as node ids
    pub tour: Vec<NodeId>,
    /// Total travel time in minutes
    pub cost: Cost,
    /// Travel time corrected by the delay model
    pub adjusted_cost: Cost,
    /// Road network path of every leg, in tour order
    pub legs: Vec<Vec<NodeId>>,
    /// Travel time of every leg
    pub leg_costs: Vec<Cost>,
    /// Tour costs accepted by the local search, starting with the initial tour
    pub improvement: Vec<Cost>,
}

/// Travelling salesman heuristic over the road graph
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TourSolver {
    pub delay: DelayModel,
    /// Compute distance matrix rows on the rayon thread pool
    pub parallel_matrix: bool,
}

impl TourSolver {
    pub fn new(delay: DelayModel) -> Self {
        Self {
            delay,
            parallel_matrix: false,
        }
    }

    #[must_use]
    pub fn with_parallel_matrix(mut self, parallel_matrix: bool) -> Self {
        self.parallel_matrix = parallel_matrix;
        self
    }

    /// Solves the tour over `visit_set` with a router sized to the visit set.
    ///
    /// # Errors
    ///
    /// See [`solve_tour`].
    pub fn solve(&self, graph: &RoadGraph, visit_set: &[NodeId]) -> Result<TourResult, Error> {
        validate_visit_set(visit_set)?;

        let (costs, paths) = if self.parallel_matrix {
            build_matrix_parallel(graph, visit_set)?
        } else {
            let mut router = Router::for_visit_set(graph, visit_set);
            build_matrix(&mut router, visit_set)?
        };

        self.solve_matrices(graph, visit_set, &costs, &paths)
    }

    /// Solves the tour reusing an existing router (and its cache).
    ///
    /// # Errors
    ///
    /// See [`solve_tour`].
    pub fn solve_with_router(
        &self,
        router: &mut Router<'_>,
        visit_set: &[NodeId],
    ) -> Result<TourResult, Error> {
        validate_visit_set(visit_set)?;
        let (costs, paths) = build_matrix(router, visit_set)?;
        self.solve_matrices(router.graph(), visit_set, &costs, &paths)
    }

    fn solve_matrices(
        &self,
        graph: &RoadGraph,
        visit_set: &[NodeId],
        costs: &DistanceMatrix,
        paths: &PathMatrix,
    ) -> Result<TourResult, Error> {
        let initial = construct(costs);
        info!(
            "Initial tour over {} nodes costs {:.3} min",
            visit_set.len(),
            initial.cost(costs)
        );

        let (tour, improvement) = improve_traced(initial, costs);
        let cost = tour.cost(costs);
        info!(
            "Local search accepted {} moves, tour costs {cost:.3} min",
            improvement.len() - 1
        );

        let order = tour.into_indices();
        let mut legs = Vec::with_capacity(order.len().saturating_sub(1));
        let mut leg_costs = Vec::with_capacity(legs.capacity());
        for (&from, &to) in order.iter().tuple_windows() {
            let leg = paths.get(from, to).ok_or(Error::NoPath {
                from: visit_set[from],
                goal: visit_set[to],
            })?;
            legs.push(leg.to_vec());
            leg_costs.push(costs.get(from, to));
        }

        Ok(TourResult {
            visit_set: visit_set.to_vec(),
            tour: order.iter().map(|&index| visit_set[index]).collect(),
            order,
            cost,
            adjusted_cost: self.delay.adjusted_tour_cost(graph, &legs, cost),
            legs,
            leg_costs,
            improvement,
        })
    }
}

/// Finds a short closed tour visiting every node of `visit_set`.
///
/// # Errors
///
/// Returns [`Error::InvalidVisitSet`] for an empty visit set or duplicate
/// nodes, [`Error::UnknownSource`] for nodes missing from the graph and
/// [`Error::NoPath`] when the tour has to use an unreachable leg.
pub fn solve_tour(
    router: &mut Router<'_>,
    visit_set: &[NodeId],
    delay: &DelayModel,
) -> Result<TourResult, Error> {
    TourSolver::new(*delay).solve_with_router(router, visit_set)
}

fn validate_visit_set(visit_set: &[NodeId]) -> Result<(), Error> {
    if visit_set.is_empty() {
        return Err(Error::InvalidVisitSet("visit set is empty".to_string()));
    }
    if let Some(node) = first_duplicate(visit_set) {
        return Err(Error::InvalidVisitSet(format!(
            "node {node} appears more than once"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{diamond, grid, node, street};

    #[test]
    fn test_tour_over_diamond() {
        let graph = diamond();
        let mut router = Router::new(&graph);
        let result = solve_tour(&mut router, &[1, 2, 3, 4], &DelayModel::zero()).unwrap();

        assert_eq!(result.tour.first(), result.tour.last());
        assert_eq!(result.order.len(), 5);
        assert_eq!(result.legs.len(), 4);
        // 1 -> 2 -> 4 -> 3 -> 1 uses the one-way street forwards
        assert!((result.cost - 7.0).abs() < 1e-9);
        assert_eq!(result.adjusted_cost, result.cost);

        for (leg, (&from, &to)) in result.legs.iter().zip(result.tour.iter().tuple_windows()) {
            assert_eq!(leg.first(), Some(&from));
            assert_eq!(leg.last(), Some(&to));
        }
        let leg_total: Cost = result.leg_costs.iter().sum();
        assert!((leg_total - result.cost).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let graph = grid(6);
        let visit_set = [1, 6, 16, 21, 31, 36];

        let sequential = TourSolver::default().solve(&graph, &visit_set).unwrap();
        let parallel = TourSolver::default()
            .with_parallel_matrix(true)
            .solve(&graph, &visit_set)
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_improvement_trace_ends_at_tour_cost() {
        let graph = grid(6);
        let result = TourSolver::default()
            .solve(&graph, &[2, 11, 17, 24, 29, 35, 8])
            .unwrap();

        assert_eq!(*result.improvement.last().unwrap(), result.cost);
        assert!(result.improvement.windows(2).all(|w| w[1] < w[0]));
        assert!(result.adjusted_cost > result.cost);
    }

    #[test]
    fn test_single_node_tour() {
        let graph = diamond();
        let result = TourSolver::default().solve(&graph, &[3]).unwrap();

        assert_eq!(result.tour, vec![3, 3]);
        assert_eq!(result.legs, vec![vec![3]]);
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn test_invalid_visit_sets() {
        let graph = diamond();
        let solver = TourSolver::default();

        assert!(matches!(
            solver.solve(&graph, &[]),
            Err(Error::InvalidVisitSet(_))
        ));
        assert!(matches!(
            solver.solve(&graph, &[1, 2, 1]),
            Err(Error::InvalidVisitSet(_))
        ));
        assert!(matches!(
            solver.solve(&graph, &[1, 50]),
            Err(Error::UnknownSource(50))
        ));
    }

    #[test]
    fn test_unreachable_leg_fails_the_tour() {
        // 3 can be entered but never left
        let graph = RoadGraph::build(
            &[node(1, 0.0, 0.0), node(2, 1.0, 0.0), node(3, 2.0, 0.0)],
            &[street(1, 2, 1.0, false), street(2, 3, 1.0, true)],
        )
        .unwrap();

        assert!(matches!(
            TourSolver::default().solve(&graph, &[1, 2, 3]),
            Err(Error::NoPath { .. })
        ));
    }
}
