//! Identity-keyed crossover (§4.5).
//!
//! # Reference
//! Grounded on `ga/operators.rs`'s `GeneticOperators::crossover` dispatch
//! shape, replacing position-keyed OSV swapping with a hash-table join on
//! `GeneIdentity` so gene order never matters.

use rand::Rng;

use crate::domain::gene::GeneIdentity;
use crate::error::{Result, ScheduleError};
use crate::individual::Individual;

/// Swaps `instructor_id`, `room_id`, and `quanta` between matching-identity
/// genes of `p1`/`p2` with independent probability `cx_prob`, leaving
/// identity fields untouched in both offspring. An identity that owns more
/// than one gene (one per required session block) has every one of its
/// genes paired up index-wise and swapped together, not just the first.
///
/// In strict mode, a key-set mismatch between parents is an
/// `InvariantViolation` (§9 "PopulationCorruption"); otherwise the operator
/// silently restricts itself to the intersection of identities.
pub fn crossover(
    p1: &Individual,
    p2: &Individual,
    cx_prob: f64,
    strict: bool,
    rng: &mut impl Rng,
) -> Result<(Individual, Individual)> {
    let mut child1 = p1.clone();
    let mut child2 = p2.clone();

    let index1 = child1.index_by_identity();
    let index2 = child2.index_by_identity();

    if strict {
        let keys1: std::collections::BTreeSet<&GeneIdentity> = index1.keys().copied().collect();
        let keys2: std::collections::BTreeSet<&GeneIdentity> = index2.keys().copied().collect();
        if keys1 != keys2 {
            return Err(ScheduleError::invariant_violation(
                "crossover: strict mode requires identical identity key sets between parents",
            ));
        }
    }

    let common_identities: Vec<GeneIdentity> = index1
        .keys()
        .filter(|k| index2.contains_key(*k))
        .map(|k| (*k).clone())
        .collect();

    let mut changed = false;
    for identity in &common_identities {
        if !rng.random_bool(cx_prob) {
            continue;
        }
        // An identity may own several genes (one per required session); pair
        // them up in index order so every gene under the shared key, not
        // just one, takes part in the swap.
        let mut idxs1 = index1[identity].clone();
        let mut idxs2 = index2[identity].clone();
        idxs1.sort_unstable();
        idxs2.sort_unstable();

        for (&i1, &i2) in idxs1.iter().zip(idxs2.iter()) {
            std::mem::swap(&mut child1.genes[i1].instructor_id, &mut child2.genes[i2].instructor_id);
            std::mem::swap(&mut child1.genes[i1].room_id, &mut child2.genes[i2].room_id);
            std::mem::swap(&mut child1.genes[i1].quanta, &mut child2.genes[i2].quanta);
            changed = true;
        }
    }

    if changed {
        child1.invalidate_fitness();
        child2.invalidate_fitness();
    }

    Ok((child1, child2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{CourseKey, SessionType};
    use crate::domain::SessionGene;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn gene(code: &str, instructor: &str, room: &str, quanta: Vec<usize>) -> SessionGene {
        let mut g = SessionGene::placeholder(GeneIdentity::new(
            CourseKey::new(code, SessionType::Theory),
            ["G1".to_string()],
        ));
        g.instructor_id = Some(instructor.to_string());
        g.room_id = Some(room.to_string());
        g.set_quanta(quanta);
        g
    }

    #[test]
    fn test_crossover_preserves_identity_and_swaps_resources() {
        let p1 = Individual::new(vec![gene("A", "I1", "R1", vec![0, 1])]);
        let p2 = Individual::new(vec![gene("A", "I2", "R2", vec![5, 6])]);
        let mut rng = SmallRng::seed_from_u64(1);

        let (c1, c2) = crossover(&p1, &p2, 1.0, false, &mut rng).unwrap();

        assert_eq!(c1.genes[0].identity, p1.genes[0].identity);
        assert_eq!(c2.genes[0].identity, p2.genes[0].identity);
        // With cx_prob=1.0, resources must have swapped.
        assert_eq!(c1.genes[0].instructor_id.as_deref(), Some("I2"));
        assert_eq!(c2.genes[0].instructor_id.as_deref(), Some("I1"));
    }

    #[test]
    fn test_zero_cx_prob_leaves_offspring_unchanged() {
        let p1 = Individual::new(vec![gene("A", "I1", "R1", vec![0])]);
        let p2 = Individual::new(vec![gene("A", "I2", "R2", vec![5])]);
        let mut rng = SmallRng::seed_from_u64(2);

        let (c1, c2) = crossover(&p1, &p2, 0.0, false, &mut rng).unwrap();
        assert_eq!(c1.genes[0].instructor_id.as_deref(), Some("I1"));
        assert_eq!(c2.genes[0].instructor_id.as_deref(), Some("I2"));
    }

    #[test]
    fn test_strict_mode_rejects_mismatched_keys() {
        let p1 = Individual::new(vec![gene("A", "I1", "R1", vec![0])]);
        let p2 = Individual::new(vec![gene("B", "I2", "R2", vec![5])]);
        let mut rng = SmallRng::seed_from_u64(3);

        let result = crossover(&p1, &p2, 1.0, true, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_crossover_swaps_pairwise_across_multiple_shared_identities() {
        let p1 = Individual::new(vec![
            gene("A", "I1", "R1", vec![0]),
            gene("B", "I3", "R3", vec![2]),
        ]);
        let p2 = Individual::new(vec![
            gene("A", "I2", "R2", vec![5]),
            gene("B", "I4", "R4", vec![7]),
        ]);
        let mut rng = SmallRng::seed_from_u64(5);

        let (c1, c2) = crossover(&p1, &p2, 1.0, true, &mut rng).unwrap();

        // identities untouched on both offspring, in original per-parent order
        assert_eq!(c1.genes[0].identity, p1.genes[0].identity);
        assert_eq!(c1.genes[1].identity, p1.genes[1].identity);
        assert_eq!(c2.genes[0].identity, p2.genes[0].identity);
        assert_eq!(c2.genes[1].identity, p2.genes[1].identity);

        // resources swapped pairwise, per identity
        assert_eq!(c1.genes[0].instructor_id.as_deref(), Some("I2"));
        assert_eq!(c1.genes[1].instructor_id.as_deref(), Some("I4"));
        assert_eq!(c2.genes[0].instructor_id.as_deref(), Some("I1"));
        assert_eq!(c2.genes[1].instructor_id.as_deref(), Some("I3"));
    }

    #[test]
    fn test_crossover_swaps_every_gene_under_a_multi_session_identity() {
        // Identity "A" owns two genes per parent (e.g. required_quanta
        // spanning two separate session blocks) — every one of them must
        // swap, not just the first found.
        let p1 = Individual::new(vec![
            gene("A", "I1", "R1", vec![0]),
            gene("A", "I3", "R3", vec![2]),
        ]);
        let p2 = Individual::new(vec![
            gene("A", "I2", "R2", vec![5]),
            gene("A", "I4", "R4", vec![7]),
        ]);
        let mut rng = SmallRng::seed_from_u64(6);

        let (c1, c2) = crossover(&p1, &p2, 1.0, true, &mut rng).unwrap();

        assert_eq!(c1.genes[0].instructor_id.as_deref(), Some("I2"));
        assert_eq!(c1.genes[1].instructor_id.as_deref(), Some("I4"));
        assert_eq!(c2.genes[0].instructor_id.as_deref(), Some("I1"));
        assert_eq!(c2.genes[1].instructor_id.as_deref(), Some("I3"));
    }

    #[test]
    fn test_permissive_mode_operates_on_intersection() {
        let p1 = Individual::new(vec![gene("A", "I1", "R1", vec![0]), gene("B", "I3", "R3", vec![2])]);
        let p2 = Individual::new(vec![gene("A", "I2", "R2", vec![5])]);
        let mut rng = SmallRng::seed_from_u64(4);

        let (c1, _c2) = crossover(&p1, &p2, 1.0, false, &mut rng).unwrap();
        assert_eq!(c1.genes.len(), 2); // gene B untouched, still present
    }
}
