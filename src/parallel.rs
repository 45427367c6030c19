//! Parallel-map abstraction: the single integration point for concurrency
//! (§9 "Parallelism boundary"). A correct single-threaded implementation is
//! a trivial specialization (identity map over indices).
//!
//! # Reference
//! No direct teacher analogue (the teacher's scheduler runs single-threaded);
//! grounded on the broader pack's genetic-algorithm crates, which gate a
//! `rayon`-backed fitness map behind a config flag rather than hard-wiring
//! parallelism into the evaluator.

use crate::individual::Fitness;

/// Maps a closure over a set of population indices, producing one `Fitness`
/// per index in the same order. Implementations decide sequential vs.
/// multi-threaded execution; callers never branch on which is in use.
pub trait ParallelMap: Send + Sync {
    fn map_indices(&self, indices: &[usize], f: &(dyn Fn(usize) -> Fitness + Sync)) -> Vec<Fitness>;
}

/// Trivial single-threaded specialization.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialMap;

impl ParallelMap for SequentialMap {
    fn map_indices(&self, indices: &[usize], f: &(dyn Fn(usize) -> Fitness + Sync)) -> Vec<Fitness> {
        indices.iter().map(|&i| f(i)).collect()
    }
}

/// `rayon`-backed parallel specialization, selected when `GaConfig::parallel`
/// is set (§5).
#[derive(Debug, Default, Clone, Copy)]
pub struct RayonMap;

impl ParallelMap for RayonMap {
    fn map_indices(&self, indices: &[usize], f: &(dyn Fn(usize) -> Fitness + Sync)) -> Vec<Fitness> {
        use rayon::prelude::*;
        indices.par_iter().map(|&i| f(i)).collect()
    }
}

/// Picks `RayonMap` or `SequentialMap` per `parallel`, boxed behind the
/// shared trait object so callers need not know which.
pub fn select(parallel: bool) -> Box<dyn ParallelMap> {
    if parallel {
        Box::new(RayonMap)
    } else {
        Box::new(SequentialMap)
    }
}
