//! Multi-stop tour optimization.
//!
//! The visit set is first turned into dense distance/path matrices by running
//! the shortest path engine once per visit node. A closed tour is then built
//! by farthest-pair seeded cheapest insertion and refined by first-improvement
//! 2-opt. Both steps scan candidates in ascending index order, so results are
//! reproducible for a given matrix.

mod insertion;
mod matrix;
mod solver;
mod two_opt;

use itertools::Itertools;
use serde::Serialize;

pub use insertion::construct;
pub use matrix::{DistanceMatrix, PathMatrix, build_matrix, build_matrix_parallel};
pub use solver::{TourResult, TourSolver, solve_tour};
pub use two_opt::{improve, improve_traced};

use crate::Cost;

/// Closed walk over visit-set indices: first and last entries are equal and
/// every other index appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tour(Vec<usize>);

impl Tour {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of matrix entries along consecutive tour positions
    pub fn cost(&self, matrix: &DistanceMatrix) -> Cost {
        sequence_cost(matrix, &self.0)
    }

    /// Whether this is a closed tour covering every index of `0..n` once
    pub fn is_valid(&self, n: usize) -> bool {
        if n == 0 {
            return self.0.is_empty();
        }
        if self.0.len() != n + 1 || self.0.first() != self.0.last() {
            return false;
        }
        let mut seen = vec![false; n];
        for &index in &self.0[..n] {
            if index >= n || seen[index] {
                return false;
            }
            seen[index] = true;
        }
        true
    }
}

pub(crate) fn sequence_cost(matrix: &DistanceMatrix, sequence: &[usize]) -> Cost {
    sequence
        .iter()
        .tuple_windows()
        .map(|(&from, &to)| matrix.get(from, to))
        .sum()
}
