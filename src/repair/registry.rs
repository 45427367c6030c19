//! Repair Registry: priority-ordered pipeline of individual-repairing rules.
//!
//! # Reference
//! Grounded on `dispatching/engine.rs`'s `RuleEngine` ordered-rule-application
//! idiom, adapted from task-priority scoring to per-pass structural repair of
//! one individual, with a fixed-point loop added per §4.7.

use std::fmt::Debug;

use log::debug;
use rand::RngCore;

use crate::config::GaConfig;
use crate::context::SchedulingContext;
use crate::individual::Individual;
use crate::pairgen::WorkItem;

/// Bundle of read-only state a repair needs; `rng` is passed alongside since
/// repairs make randomized choices among equally-valid candidates.
pub struct RepairContext<'a> {
    pub context: &'a SchedulingContext,
    pub config: &'a GaConfig,
    pub pairs: &'a [WorkItem],
}

/// One repair rule: a pure transformation of `individual` in place, returning
/// the number of fixes it made this pass. `rng` is type-erased so the
/// registry itself stays non-generic, matching [`crate::parallel::ParallelMap`]'s
/// object-safety rationale.
pub trait Repair: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    fn apply(&self, individual: &mut Individual, ctx: &RepairContext, rng: &mut dyn RngCore) -> usize;
}

struct Entry {
    rule: Box<dyn Repair>,
    enabled: bool,
}

/// Ordered registry run to a fixed point (§4.7): repeats passes over every
/// enabled repair, in registration order, until a pass fixes nothing or
/// `config.repair_max_iterations` passes have run.
///
/// Registration order is priority order; `incomplete_or_extra_sessions`
/// (the only length-changing repair) must be registered last so it always
/// runs after every other repair within a pass.
pub struct RepairRegistry {
    entries: Vec<Entry>,
}

impl Default for RepairRegistry {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl RepairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: Box<dyn Repair>) -> Self {
        self.entries.push(Entry { rule, enabled: true });
        self
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) {
        for e in &mut self.entries {
            if e.rule.name() == name {
                e.enabled = enabled;
            }
        }
    }

    /// Builds the default pipeline of all 7 named repairs (§4.7), in
    /// priority order.
    pub fn with_default_repairs() -> Self {
        use crate::repair::repairs::*;

        Self::new()
            .with_rule(Box::new(GroupOverlapRepair))
            .with_rule(Box::new(RoomConflictRepair))
            .with_rule(Box::new(InstructorConflictRepair))
            .with_rule(Box::new(InstructorQualificationRepair))
            .with_rule(Box::new(RoomTypeMismatchRepair))
            .with_rule(Box::new(SessionClusteringRepair))
            .with_rule(Box::new(IncompleteOrExtraSessionsRepair))
    }

    /// Runs the full repair pipeline on `individual`, returning the total
    /// fix count across all passes.
    pub fn run(&self, individual: &mut Individual, ctx: &RepairContext, rng: &mut dyn RngCore) -> usize {
        let (total, _) = self.run_with_breakdown(individual, ctx, rng);
        total
    }

    /// Same as [`Self::run`], additionally returning the fix count
    /// attributed to each named repair, summed across every pass. Used by
    /// [`crate::scheduler::metrics`] to report which repairs stayed active.
    pub fn run_with_breakdown(
        &self,
        individual: &mut Individual,
        ctx: &RepairContext,
        rng: &mut dyn RngCore,
    ) -> (usize, std::collections::HashMap<&'static str, usize>) {
        let mut total = 0;
        let mut breakdown: std::collections::HashMap<&'static str, usize> = std::collections::HashMap::new();
        for pass in 0..ctx.config.repair_max_iterations {
            let mut pass_fixes = 0;
            for e in &self.entries {
                if !e.enabled {
                    continue;
                }
                let fixes = e.rule.apply(individual, ctx, rng);
                if fixes > 0 {
                    debug!("repair pass {pass}: {} fixed {fixes}", e.rule.name());
                    *breakdown.entry(e.rule.name()).or_insert(0) += fixes;
                }
                pass_fixes += fixes;
            }
            total += pass_fixes;
            if pass_fixes == 0 {
                break;
            }
        }
        if total > 0 {
            individual.invalidate_fitness();
        }
        (total, breakdown)
    }
}
