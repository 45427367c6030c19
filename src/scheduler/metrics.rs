//! Per-generation metrics (§4.8 step 8, §7 diagnostics).
//!
//! # Reference
//! Grounded on `scheduler/kpi.rs`'s `ScheduleKpi::calculate` (derive a
//! metrics struct by aggregating independent measures over a population),
//! generalized from a single finished schedule to one generation of a
//! running GA.

use std::collections::HashMap;

use crate::fitness::FitnessBreakdown;
use crate::individual::{Fitness, Population};

/// Snapshot of one generation's state, enough to log and to diagnose which
/// constraints remain stubborn (§7) without re-running the evaluator.
#[derive(Debug, Clone)]
pub struct GenerationMetrics {
    pub generation: usize,
    pub best_fitness: Fitness,
    pub hard_breakdown: Vec<(&'static str, f64)>,
    pub soft_breakdown: Vec<(&'static str, f64)>,
    /// Mean pairwise Hamming-style distance between individuals' resource
    /// assignments, a cheap proxy for population diversity.
    pub diversity: f64,
    /// Total fixes made by each named repair this generation, summed across
    /// every offspring repaired.
    pub repair_fix_counts: HashMap<&'static str, usize>,
}

impl GenerationMetrics {
    pub fn new(generation: usize, best: &FitnessBreakdown, diversity: f64, repair_fix_counts: HashMap<&'static str, usize>) -> Self {
        Self {
            generation,
            best_fitness: best.fitness,
            hard_breakdown: best.hard_breakdown.clone(),
            soft_breakdown: best.soft_breakdown.clone(),
            diversity,
            repair_fix_counts,
        }
    }

    /// The one-line `info`-level summary named in §4.8 ("gen, best_hard,
    /// best_soft, diversity"). The caller is responsible for actually
    /// emitting it through `log`; this just formats it, keeping the metrics
    /// struct itself log-facade-agnostic.
    pub fn summary_line(&self) -> String {
        format!(
            "gen={} best_hard={:.2} best_soft={:.2} diversity={:.3}",
            self.generation, self.best_fitness.hard, self.best_fitness.soft, self.diversity
        )
    }
}

/// Mean pairwise fraction of genes differing in `(instructor_id, room_id,
/// quanta)` across the population, restricted to genes present in every
/// individual's identity index (so a partially-repaired, length-varying
/// individual mid-pipeline never panics here — it just contributes fewer
/// comparable genes).
pub fn population_diversity(population: &Population) -> f64 {
    let individuals = &population.individuals;
    let n = individuals.len();
    if n < 2 {
        return 0.0;
    }

    let mut total_fraction = 0.0;
    let mut pair_count = 0usize;

    for i in 0..n {
        for j in (i + 1)..n {
            let a = &individuals[i];
            let b = &individuals[j];
            let index_b = b.index_by_identity();

            let mut compared = 0usize;
            let mut differing = 0usize;
            for gene_a in &a.genes {
                if let Some(idxs) = index_b.get(&gene_a.identity) {
                    // Compare against the closest-matching same-identity gene
                    // on the `b` side; any consistent pairing is enough for
                    // a diversity proxy.
                    let Some(&idx) = idxs.first() else { continue };
                    compared += 1;
                    let gene_b = &b.genes[idx];
                    if gene_a.instructor_id != gene_b.instructor_id
                        || gene_a.room_id != gene_b.room_id
                        || gene_a.quanta != gene_b.quanta
                    {
                        differing += 1;
                    }
                }
            }
            if compared > 0 {
                total_fraction += differing as f64 / compared as f64;
                pair_count += 1;
            }
        }
    }

    if pair_count == 0 {
        0.0
    } else {
        total_fraction / pair_count as f64
    }
}
