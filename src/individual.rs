//! Individual (chromosome) and Population.
//!
//! # Reference
//! Grounded on `ga/chromosome.rs`'s `ScheduleChromosome` (owner of the
//! mutable encoding plus cached fitness), restructured around an ordered
//! `Vec<SessionGene>` with identity-keyed lookup instead of the teacher's
//! OSV/MAV permutation vectors.

use std::collections::{BTreeSet, HashMap};

use crate::domain::gene::GeneIdentity;
use crate::domain::SessionGene;

/// Two-objective fitness, always ordered `(hard, soft)` (§9: never collapsed
/// to one objective). `hard` is a weighted violation count; `soft` is a
/// weighted penalty sum. Both are `f64` because registry weights (§4.4) may
/// scale either objective away from a plain integer count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitness {
    pub hard: f64,
    pub soft: f64,
}

impl Fitness {
    pub fn new(hard: f64, soft: f64) -> Self {
        Self { hard, soft }
    }

    /// Pareto dominance: `self` dominates `other` if it is no worse in both
    /// objectives and strictly better in at least one.
    pub fn dominates(&self, other: &Fitness) -> bool {
        let no_worse = self.hard <= other.hard && self.soft <= other.soft;
        let strictly_better = self.hard < other.hard || self.soft < other.soft;
        no_worse && strictly_better
    }

    /// Feasible iff the unweighted hard violation count is zero. Since the
    /// default weight is `1.0`, `hard == 0.0` is the practical test; a
    /// constraint weighted to exactly cancel a real violation is a
    /// configuration error, not something this check needs to guard against.
    pub fn is_feasible(&self) -> bool {
        self.hard <= 0.0
    }
}

/// A complete candidate schedule: an ordered, position-independent gene list
/// plus a cached two-objective fitness.
///
/// Invariant (§8 property 1): the multiset of `(course_key, group_ids)` keys
/// across `genes` equals the reference set produced by the pair generator.
/// Gene *order* carries no meaning — only identity does.
#[derive(Debug, Clone)]
pub struct Individual {
    pub genes: Vec<SessionGene>,
    /// `None` marks the fitness as invalid/stale (after crossover or
    /// mutation); the scheduler re-evaluates before the next survival step.
    pub fitness: Option<Fitness>,
}

impl Individual {
    pub fn new(genes: Vec<SessionGene>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    pub fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }

    pub fn needs_evaluation(&self) -> bool {
        self.fitness.is_none()
    }

    /// Builds an identity → gene-index lookup, used by crossover and by
    /// structural-invariant checks. An identity may own more than one gene
    /// (one per required quantum block when a course needs several sessions
    /// a week), so each identity maps to *all* of its indices, in the order
    /// they appear in `genes`.
    pub fn index_by_identity(&self) -> HashMap<&GeneIdentity, Vec<usize>> {
        let mut map: HashMap<&GeneIdentity, Vec<usize>> = HashMap::new();
        for (i, g) in self.genes.iter().enumerate() {
            map.entry(&g.identity).or_default().push(i);
        }
        map
    }

    /// The multiset of gene identities carried by this individual, as a set
    /// (duplicates would indicate a structural bug — identities are unique
    /// per pair generator output).
    pub fn identity_set(&self) -> BTreeSet<GeneIdentity> {
        self.genes.iter().map(|g| g.identity.clone()).collect()
    }
}

/// A fixed-size ordered collection of individuals.
///
/// Lifecycle: created by the seeder; reshaped every generation by NSGA-II
/// survival; dropped at run end. `Population` itself carries no GA logic —
/// it is a thin, ordered container.
#[derive(Debug, Clone)]
pub struct Population {
    pub individuals: Vec<Individual>,
}

impl Population {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The individual with the smallest `(hard, soft)` by lexicographic
    /// order, i.e. feasibility first, then soft penalty.
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().filter(|i| i.fitness.is_some()).min_by(|a, b| {
            let fa = a.fitness.unwrap();
            let fb = b.fitness.unwrap();
            use ordered_float::OrderedFloat as OF;
            (OF(fa.hard), OF(fa.soft)).cmp(&(OF(fb.hard), OF(fb.soft)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{CourseKey, SessionType};
    use crate::domain::gene::GeneIdentity;

    fn gene(code: &str) -> SessionGene {
        SessionGene::placeholder(GeneIdentity::new(
            CourseKey::new(code, SessionType::Theory),
            ["G1".to_string()],
        ))
    }

    #[test]
    fn test_dominance() {
        let a = Fitness::new(0, 5.0);
        let b = Fitness::new(1, 2.0);
        let c = Fitness::new(0, 3.0);
        assert!(!a.dominates(&b)); // a has better hard, worse soft: non-dominated
        assert!(c.dominates(&a)); // c strictly better in soft, equal hard
    }

    #[test]
    fn test_identity_set_dedup_structure() {
        let ind = Individual::new(vec![gene("A"), gene("B")]);
        assert_eq!(ind.identity_set().len(), 2);
    }

    #[test]
    fn test_population_best_prefers_feasible() {
        let mut i1 = Individual::new(vec![gene("A")]);
        i1.fitness = Some(Fitness::new(1, 0.0));
        let mut i2 = Individual::new(vec![gene("B")]);
        i2.fitness = Some(Fitness::new(0, 100.0));
        let pop = Population::new(vec![i1, i2]);
        assert_eq!(pop.best().unwrap().fitness.unwrap().hard, 0);
    }
}
