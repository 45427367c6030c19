//! Non-dominated sorting and crowding distance (§4.8).
//!
//! # Reference
//! No teacher analogue (the teacher's GA is single-objective, see
//! `ga/problem.rs`'s scalar `compute_fitness`). Implements Deb et al. (2002)
//! directly against [`crate::individual::Fitness`]'s `(hard, soft)` pair,
//! using `ordered-float` for the objective-value sort crowding distance needs
//! (the same reason the reference pack's genetic-algorithm crates pull it in).

use std::collections::HashMap;

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::individual::Fitness;

/// Partitions `fitnesses` into non-dominated fronts (front 0 is the Pareto
/// front of the whole set), by index into the input slice.
pub fn non_dominated_sort(fitnesses: &[Fitness]) -> Vec<Vec<usize>> {
    let n = fitnesses.len();
    let mut domination_count = vec![0usize; n];
    let mut dominates = vec![Vec::new(); n];
    let mut fronts = vec![Vec::new()];

    for p in 0..n {
        for q in 0..n {
            if p == q {
                continue;
            }
            if fitnesses[p].dominates(&fitnesses[q]) {
                dominates[p].push(q);
            } else if fitnesses[q].dominates(&fitnesses[p]) {
                domination_count[p] += 1;
            }
        }
        if domination_count[p] == 0 {
            fronts[0].push(p);
        }
    }

    let mut i = 0;
    while !fronts[i].is_empty() {
        let mut next_front = Vec::new();
        for &p in &fronts[i] {
            for &q in &dominates[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next_front.push(q);
                }
            }
        }
        i += 1;
        fronts.push(next_front);
    }
    fronts.pop();
    fronts
}

fn objective(f: &Fitness, obj: usize) -> f64 {
    if obj == 0 {
        f.hard
    } else {
        f.soft
    }
}

/// Crowding distance within one front, keyed by the same indices `front` holds.
/// Boundary individuals (extreme for either objective) get `f64::INFINITY` so
/// they are never discarded ahead of an interior point.
pub fn crowding_distance(front: &[usize], fitnesses: &[Fitness]) -> HashMap<usize, f64> {
    let mut distance: HashMap<usize, f64> = front.iter().map(|&i| (i, 0.0)).collect();
    if front.len() <= 2 {
        for &i in front {
            distance.insert(i, f64::INFINITY);
        }
        return distance;
    }

    for obj in 0..2 {
        let mut sorted = front.to_vec();
        sorted.sort_by_key(|&i| OrderedFloat(objective(&fitnesses[i], obj)));

        let min_v = objective(&fitnesses[sorted[0]], obj);
        let max_v = objective(&fitnesses[*sorted.last().unwrap()], obj);
        distance.insert(sorted[0], f64::INFINITY);
        distance.insert(*sorted.last().unwrap(), f64::INFINITY);

        let range = max_v - min_v;
        if range <= 0.0 {
            continue;
        }
        for w in 1..sorted.len() - 1 {
            let prev = objective(&fitnesses[sorted[w - 1]], obj);
            let next = objective(&fitnesses[sorted[w + 1]], obj);
            if let Some(d) = distance.get_mut(&sorted[w]) {
                if d.is_finite() {
                    *d += (next - prev) / range;
                }
            }
        }
    }
    distance
}

/// `(front_rank, crowding_distance)` per index, in input order. Lower rank is
/// better; within a rank, higher crowding distance is better (the "crowded
/// comparison operator", §4.8).
pub fn rank_all(fitnesses: &[Fitness]) -> Vec<(usize, f64)> {
    let fronts = non_dominated_sort(fitnesses);
    let mut result = vec![(usize::MAX, 0.0); fitnesses.len()];
    for (rank, front) in fronts.iter().enumerate() {
        let distances = crowding_distance(front, fitnesses);
        for &i in front {
            result[i] = (rank, distances[&i]);
        }
    }
    result
}

fn crowded_better(a: (usize, f64), b: (usize, f64)) -> bool {
    a.0 < b.0 || (a.0 == b.0 && a.1 > b.1)
}

/// Binary tournament parent selection (§4.8 step 1): draws two distinct
/// candidate indices uniformly from `[0, ranks.len())` and returns the
/// crowded-comparison winner. Falls back to the sole candidate when the pool
/// has only one member.
pub fn binary_tournament(ranks: &[(usize, f64)], rng: &mut impl Rng) -> usize {
    if ranks.len() == 1 {
        return 0;
    }
    let a = rng.random_range(0..ranks.len());
    let mut b = rng.random_range(0..ranks.len() - 1);
    if b >= a {
        b += 1;
    }
    if crowded_better(ranks[a], ranks[b]) {
        a
    } else {
        b
    }
}

/// Survival selection (§4.8 step 7): fills the next generation front by
/// front, truncating the last admitted front by descending crowding distance
/// so the result has exactly `n` indices (or fewer, if `fitnesses` is
/// shorter).
pub fn select_survivors(fitnesses: &[Fitness], n: usize) -> Vec<usize> {
    let fronts = non_dominated_sort(fitnesses);
    let mut selected = Vec::with_capacity(n);

    for front in &fronts {
        if selected.len() + front.len() <= n {
            selected.extend_from_slice(front);
        } else {
            let remaining = n - selected.len();
            if remaining == 0 {
                break;
            }
            let distances = crowding_distance(front, fitnesses);
            let mut sorted_front = front.clone();
            sorted_front.sort_by(|&a, &b| {
                OrderedFloat(distances[&b]).cmp(&OrderedFloat(distances[&a]))
            });
            selected.extend_from_slice(&sorted_front[..remaining]);
        }
        if selected.len() >= n {
            break;
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_zero_is_non_dominated_set() {
        let fitnesses = vec![
            Fitness::new(0.0, 5.0),
            Fitness::new(1.0, 2.0),
            Fitness::new(2.0, 10.0), // dominated by both
            Fitness::new(0.0, 1.0),  // dominates index 0 and 3... check below
        ];
        let fronts = non_dominated_sort(&fitnesses);
        assert!(fronts[0].contains(&3));
        assert!(!fronts[0].contains(&2));
    }

    #[test]
    fn test_boundary_points_get_infinite_crowding() {
        let fitnesses = vec![Fitness::new(0.0, 0.0), Fitness::new(1.0, 1.0), Fitness::new(2.0, 2.0)];
        let front: Vec<usize> = vec![0, 1, 2];
        let distances = crowding_distance(&front, &fitnesses);
        assert_eq!(distances[&0], f64::INFINITY);
        assert_eq!(distances[&2], f64::INFINITY);
        assert!(distances[&1].is_finite());
    }

    #[test]
    fn test_select_survivors_respects_population_size() {
        let fitnesses: Vec<Fitness> = (0..10).map(|i| Fitness::new((i % 3) as f64, i as f64)).collect();
        let survivors = select_survivors(&fitnesses, 4);
        assert_eq!(survivors.len(), 4);
    }

    #[test]
    fn test_select_survivors_prefers_non_dominated_front() {
        let fitnesses = vec![
            Fitness::new(0.0, 0.0), // dominates everyone
            Fitness::new(1.0, 1.0),
            Fitness::new(2.0, 2.0),
        ];
        let survivors = select_survivors(&fitnesses, 1);
        assert_eq!(survivors, vec![0]);
    }

    #[test]
    fn test_binary_tournament_single_candidate() {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let ranks = vec![(0, 1.0)];
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(binary_tournament(&ranks, &mut rng), 0);
    }
}
