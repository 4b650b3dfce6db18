use std::ops::Index;

use hashbrown::HashSet;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::routing::{Router, ShortestPathTree, shortest_path_tree};
use crate::{Cost, Error, NodeId, RoadGraph};

/// Dense matrix of shortest travel times between visit-set nodes.
/// Unreachable pairs hold `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    rows: Vec<Vec<Cost>>,
}

impl DistanceMatrix {
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the rows do not form a square matrix
    /// or contain negative or NaN costs.
    pub fn from_rows(rows: Vec<Vec<Cost>>) -> Result<Self, Error> {
        let n = rows.len();
        if let Some(row) = rows.iter().position(|row| row.len() != n) {
            return Err(Error::InvalidData(format!(
                "distance matrix row {row} has {} entries, expected {n}",
                rows[row].len()
            )));
        }
        if rows.iter().flatten().any(|cost| cost.is_nan() || *cost < 0.0) {
            return Err(Error::InvalidData(
                "distance matrix contains negative or NaN costs".to_string(),
            ));
        }
        Ok(Self { rows })
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, from: usize, to: usize) -> Cost {
        self.rows[from][to]
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = Cost;

    fn index(&self, (from, to): (usize, usize)) -> &Self::Output {
        &self.rows[from][to]
    }
}

/// Dense matrix of realized shortest paths between visit-set nodes.
/// Unreachable pairs hold `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathMatrix {
    rows: Vec<Vec<Option<Vec<NodeId>>>>,
}

impl PathMatrix {
    pub fn get(&self, from: usize, to: usize) -> Option<&[NodeId]> {
        self.rows[from][to].as_deref()
    }
}

type MatrixRow = (Vec<Cost>, Vec<Option<Vec<NodeId>>>);

/// Builds the distance and path matrices of `visit_set`, running the
/// shortest path engine once per visit node (through the router cache).
///
/// # Errors
///
/// Returns [`Error::UnknownSource`] if a visit node is not part of the graph.
pub fn build_matrix(
    router: &mut Router<'_>,
    visit_set: &[NodeId],
) -> Result<(DistanceMatrix, PathMatrix), Error> {
    validate_nodes(router.graph(), visit_set)?;
    info!("Building {0}x{0} distance matrix", visit_set.len());

    let mut rows = Vec::with_capacity(visit_set.len());
    for &source in visit_set {
        let tree = router.solve(source)?;
        rows.push(matrix_row(&tree, visit_set));
    }

    Ok(assemble(rows))
}

/// Parallel variant of [`build_matrix`]: rows are computed independently
/// on the rayon thread pool, without a shared cache.
///
/// # Errors
///
/// Returns [`Error::UnknownSource`] if a visit node is not part of the graph.
pub fn build_matrix_parallel(
    graph: &RoadGraph,
    visit_set: &[NodeId],
) -> Result<(DistanceMatrix, PathMatrix), Error> {
    validate_nodes(graph, visit_set)?;
    info!(
        "Building {0}x{0} distance matrix in parallel",
        visit_set.len()
    );

    let rows = visit_set
        .par_iter()
        .map(|&source| {
            shortest_path_tree(graph, source).map(|tree| matrix_row(&tree, visit_set))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(assemble(rows))
}

fn validate_nodes(graph: &RoadGraph, visit_set: &[NodeId]) -> Result<(), Error> {
    match visit_set.iter().find(|&&id| !graph.contains(id)) {
        Some(&id) => Err(Error::UnknownSource(id)),
        None => Ok(()),
    }
}

fn matrix_row(tree: &ShortestPathTree, visit_set: &[NodeId]) -> MatrixRow {
    visit_set
        .iter()
        .map(|&goal| match tree.cost(goal) {
            Some(cost) => (cost, tree.path_to(goal).ok()),
            None => {
                warn!("Visit node {goal} is unreachable from {}", tree.source());
                (f64::INFINITY, None)
            }
        })
        .unzip()
}

fn assemble(rows: Vec<MatrixRow>) -> (DistanceMatrix, PathMatrix) {
    let (costs, paths): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
    (DistanceMatrix { rows: costs }, PathMatrix { rows: paths })
}

/// First node of `visit_set` that appears more than once
pub(crate) fn first_duplicate(visit_set: &[NodeId]) -> Option<NodeId> {
    let mut seen = HashSet::with_capacity(visit_set.len());
    visit_set.iter().copied().find(|&id| !seen.insert(id))
}
