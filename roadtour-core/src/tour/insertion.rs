use fixedbitset::FixedBitSet;
use log::debug;

use super::{DistanceMatrix, Tour};
use crate::Cost;

/// Builds an initial closed tour by farthest-pair seeded cheapest insertion.
///
/// The tour is seeded with the pair of cities with the largest round-trip
/// cost, then grown by repeatedly inserting the unvisited city whose
/// insertion ratio `(d[a][k] + d[k][b]) / d[a][b]` over some tour edge
/// `(a, b)` is smallest. Candidates are scanned by city, then by tour
/// position, and the first minimum found wins.
pub fn construct(matrix: &DistanceMatrix) -> Tour {
    let n = matrix.size();
    match n {
        0 => return Tour::new(Vec::new()),
        1 => return Tour::new(vec![0, 0]),
        _ => {}
    }

    let (first, second) = farthest_pair(matrix);
    let mut tour = Vec::with_capacity(n + 1);
    tour.extend([first, second, first]);

    let mut visited = FixedBitSet::with_capacity(n);
    visited.insert(first);
    visited.insert(second);
    debug!("Seeded tour with farthest pair ({first}, {second})");

    while tour.len() < n + 1 {
        let Some((city, position)) = best_insertion(matrix, &tour, &visited) else {
            break;
        };
        tour.insert(position + 1, city);
        visited.insert(city);
    }

    Tour::new(tour)
}

/// Pair `(i, j)`, `i < j`, with the strictly largest `d[i][j] + d[j][i]`
fn farthest_pair(matrix: &DistanceMatrix) -> (usize, usize) {
    let n = matrix.size();
    let mut best_pair = (0, 1);
    let mut max_round_trip = f64::NEG_INFINITY;

    for i in 0..n {
        for j in i + 1..n {
            let round_trip = matrix.get(i, j) + matrix.get(j, i);
            if round_trip > max_round_trip {
                max_round_trip = round_trip;
                best_pair = (i, j);
            }
        }
    }

    best_pair
}

/// Cheapest `(city, position)` to insert, `city` going right after `tour[position]`.
/// `None` once every city is on the tour.
fn best_insertion(
    matrix: &DistanceMatrix,
    tour: &[usize],
    visited: &FixedBitSet,
) -> Option<(usize, usize)> {
    let mut best: Option<(Cost, usize, usize)> = None;

    for city in (0..matrix.size()).filter(|&city| !visited.contains(city)) {
        for position in 0..tour.len() - 1 {
            let ratio = insertion_ratio(matrix, tour[position], city, tour[position + 1]);
            match best {
                Some((best_ratio, _, _)) if ratio >= best_ratio => {}
                _ => best = Some((ratio, city, position)),
            }
        }
    }

    best.map(|(_, city, position)| (city, position))
}

/// Relative cost of detouring `from -> to` through `city`; `+inf` for a
/// zero-cost edge or an undefined (`inf / inf`) ratio.
fn insertion_ratio(matrix: &DistanceMatrix, from: usize, city: usize, to: usize) -> Cost {
    let direct = matrix.get(from, to);
    if direct == 0.0 {
        return f64::INFINITY;
    }

    let ratio = (matrix.get(from, city) + matrix.get(city, to)) / direct;
    if ratio.is_nan() { f64::INFINITY } else { ratio }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_farthest_pair_takes_first_maximum() {
        // (0, 3) and (2, 3) both have round trip 20; (0, 3) is found first
        assert_eq!(farthest_pair(&scenario()), (0, 3));
    }

    #[test]
    fn test_insertion_does_not_exceed_seed_cost() {
        let matrix = scenario();
        let (first, second) = farthest_pair(&matrix);
        let seed = Tour::new(vec![first, second, first]);
        assert_eq!(seed.cost(&matrix), 20.0);

        let tour = construct(&matrix);
        assert_eq!(tour.indices(), &[0, 1, 3, 2, 0]);
        assert!(tour.is_valid(4));
        assert_eq!(tour.cost(&matrix), 18.0);
        assert!(tour.cost(&matrix) <= seed.cost(&matrix));
    }

    #[test]
    fn test_zero_cost_edge_is_never_split() {
        // Cities 0 and 1 coincide; the seed edge between them must not be chosen
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 0.0, 5.0],
            vec![0.0, 0.0, 5.0],
            vec![5.0, 5.0, 0.0],
        ])
        .unwrap();
        assert_eq!(insertion_ratio(&matrix, 0, 2, 1), f64::INFINITY);

        let tour = construct(&matrix);
        assert!(tour.is_valid(3));
    }

    #[test]
    fn test_unreachable_pairs_still_yield_a_valid_tour() {
        let inf = f64::INFINITY;
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, inf, inf],
            vec![inf, 0.0, inf],
            vec![inf, inf, 0.0],
        ])
        .unwrap();
        assert_eq!(insertion_ratio(&matrix, 0, 2, 1), f64::INFINITY);

        let tour = construct(&matrix);
        assert_eq!(tour.indices(), &[0, 2, 1, 0]);
    }

    #[test]
    fn test_small_sizes() {
        assert!(construct(&DistanceMatrix::from_rows(vec![]).unwrap()).is_empty());
        assert_eq!(
            construct(&DistanceMatrix::from_rows(vec![vec![0.0]]).unwrap()).indices(),
            &[0, 0]
        );
        let pair = DistanceMatrix::from_rows(vec![vec![0.0, 3.0], vec![4.0, 0.0]]).unwrap();
        assert_eq!(construct(&pair).indices(), &[0, 1, 0]);
    }

    #[test]
    fn test_tours_are_valid_for_many_sizes() {
        for n in 2..12 {
            let rows = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| if i == j { 0.0 } else { ((i * 7 + j * 13) % 17 + 1) as f64 })
                        .collect()
                })
                .collect();
            let matrix = DistanceMatrix::from_rows(rows).unwrap();
            assert!(construct(&matrix).is_valid(n), "invalid tour for n = {n}");
        }
    }
}
