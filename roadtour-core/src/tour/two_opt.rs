use log::debug;

use super::{DistanceMatrix, Tour, sequence_cost};
use crate::Cost;

/// Improves a closed tour with first-improvement 2-opt.
///
/// See [`improve_traced`].
pub fn improve(tour: Tour, matrix: &DistanceMatrix) -> Tour {
    improve_traced(tour, matrix).0
}

/// Improves a closed tour with first-improvement 2-opt and returns the
/// accepted tour costs, starting with the cost of the input tour.
///
/// Every pair `1 <= i < j <= n - 1` is tried in ascending order by reversing
/// `tour[i..=j]`; the endpoints stay fixed so the tour remains closed. The
/// first strictly cheaper tour is accepted and the scan restarts. The search
/// stops at a 2-opt local optimum. Accepted costs are strictly decreasing, so
/// it always terminates.
pub fn improve_traced(tour: Tour, matrix: &DistanceMatrix) -> (Tour, Vec<Cost>) {
    let mut current = tour.into_indices();
    let mut best_cost = sequence_cost(matrix, &current);
    let mut accepted = vec![best_cost];

    let len = current.len();
    if len < 4 {
        return (Tour::new(current), accepted);
    }

    let mut candidate = current.clone();
    'scan: loop {
        for i in 1..len - 2 {
            for j in i + 1..len - 1 {
                candidate.copy_from_slice(&current);
                candidate[i..=j].reverse();

                let cost = sequence_cost(matrix, &candidate);
                if cost < best_cost {
                    debug!("2-opt move ({i}, {j}): {best_cost:.3} -> {cost:.3}");
                    std::mem::swap(&mut current, &mut candidate);
                    best_cost = cost;
                    accepted.push(cost);
                    continue 'scan;
                }
            }
        }
        break;
    }

    (Tour::new(current), accepted)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::tour::construct;

    fn scenario() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 2.0, 12.0, 10.0],
            vec![2.0, 0.0, 6.0, 4.0],
            vec![7.0, 6.0, 0.0, 15.0],
            vec![10.0, 4.0, 5.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_does_not_worsen_constructed_tour() {
        let matrix = scenario();
        let initial = construct(&matrix);
        let initial_cost = initial.cost(&matrix);

        let improved = improve(initial, &matrix);
        assert!(improved.is_valid(4));
        assert!(improved.cost(&matrix) <= initial_cost);
    }

    #[test]
    fn test_first_improvement_trace() {
        let matrix = scenario();
        let (tour, accepted) = improve_traced(Tour::new(vec![0, 1, 2, 3, 0]), &matrix);

        assert_eq!(accepted, vec![33.0, 32.0, 27.0, 18.0]);
        assert_eq!(tour.indices(), &[0, 1, 3, 2, 0]);
    }

    #[test]
    fn test_local_optimum_is_left_unchanged() {
        let matrix = scenario();
        let (tour, accepted) = improve_traced(Tour::new(vec![0, 3, 2, 1, 0]), &matrix);

        assert_eq!(tour.indices(), &[0, 3, 2, 1, 0]);
        assert_eq!(accepted, vec![23.0]);
    }

    #[test]
    fn test_short_tours_are_returned_as_is() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]).unwrap();
        let (tour, accepted) = improve_traced(Tour::new(vec![0, 1, 0]), &matrix);
        assert_eq!(tour.indices(), &[0, 1, 0]);
        assert_eq!(accepted, vec![3.0]);
    }

    #[test]
    fn test_accepted_costs_strictly_decrease() {
        for n in 4..10 {
            let rows = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| if i == j { 0.0 } else { ((i * 11 + j * 5) % 19 + 1) as f64 })
                        .collect()
                })
                .collect();
            let matrix = DistanceMatrix::from_rows(rows).unwrap();

            // Identity order is a poor start for these matrices
            let start = Tour::new((0..n).chain([0]).collect());
            let (tour, accepted) = improve_traced(start, &matrix);

            assert!(tour.is_valid(n));
            assert!(accepted.iter().tuple_windows().all(|(a, b)| b < a));
            assert_eq!(*accepted.last().unwrap(), tour.cost(&matrix));
        }
    }
}
