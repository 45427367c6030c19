//! Generic weighted, enable-toggled registry shared by hard and soft
//! constraints (and reused in shape by the repair pipeline).
//!
//! # Reference
//! Grounded on `dispatching/engine.rs`'s `RuleEngine`/`WeightedRule`: a
//! `Vec` of `{name, rule, weight}` entries, each independently toggleable,
//! evaluated in registration order and combined by weighted sum. No runtime
//! singleton — the registry is a pure-function table built once at context
//! construction (§9 "Global state").

use std::fmt::Debug;

use crate::config::GaConfig;
use crate::context::SchedulingContext;
use crate::domain::SessionGene;
use crate::pairgen::WorkItem;

/// Bundle of everything a constraint function needs. Constraint functions
/// are pure: they read `EvalInputs` and return a value, never mutating it
/// (§4.4).
pub struct EvalInputs<'a> {
    pub genes: &'a [SessionGene],
    pub context: &'a SchedulingContext,
    pub config: &'a GaConfig,
    pub pairs: &'a [WorkItem],
}

/// A hard constraint: returns a violation count (as `f64` so registry
/// weighting can scale it; unweighted it is always a whole number).
pub trait HardConstraint: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    fn evaluate(&self, inputs: &EvalInputs) -> f64;
}

/// A soft constraint: returns a quality penalty.
pub trait SoftConstraint: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    fn evaluate(&self, inputs: &EvalInputs) -> f64;
}

struct Entry<T: ?Sized> {
    rule: Box<T>,
    enabled: bool,
    weight: f64,
}

/// An ordered, weighted, enable-toggled table of constraint evaluators.
///
/// Generic over the trait (`HardConstraint` or `SoftConstraint`) so both
/// registries share one implementation, matching how the teacher's
/// `RuleEngine` is a single generic collection type reused for every rule
/// family.
pub struct ConstraintRegistry<T: ?Sized> {
    entries: Vec<Entry<T>>,
}

impl<T: ?Sized> Default for ConstraintRegistry<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: ?Sized> ConstraintRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: Box<T>, weight: f64) -> Self {
        self.entries.push(Entry {
            rule,
            enabled: true,
            weight,
        });
        self
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool)
    where
        T: HasName,
    {
        for e in &mut self.entries {
            if e.rule.name() == name {
                e.enabled = enabled;
            }
        }
    }

    pub fn set_weight(&mut self, name: &str, weight: f64)
    where
        T: HasName,
    {
        for e in &mut self.entries {
            if e.rule.name() == name {
                e.weight = weight;
            }
        }
    }
}

/// Minimal shared surface both constraint traits expose, letting
/// `set_enabled`/`set_weight` be written once.
pub trait HasName {
    fn name(&self) -> &'static str;
}
impl HasName for dyn HardConstraint {
    fn name(&self) -> &'static str {
        HardConstraint::name(self)
    }
}
impl HasName for dyn SoftConstraint {
    fn name(&self) -> &'static str {
        SoftConstraint::name(self)
    }
}

impl ConstraintRegistry<dyn HardConstraint> {
    /// Weighted sum of all enabled hard constraints, plus the per-constraint
    /// breakdown (used by scheduler metrics to diagnose stubborn
    /// constraints per §7).
    pub fn evaluate(&self, inputs: &EvalInputs) -> (f64, Vec<(&'static str, f64)>) {
        let mut total = 0.0;
        let mut breakdown = Vec::with_capacity(self.entries.len());
        for e in &self.entries {
            if !e.enabled {
                continue;
            }
            let raw = e.rule.evaluate(inputs);
            total += raw * e.weight;
            breakdown.push((e.rule.name(), raw));
        }
        (total, breakdown)
    }
}

impl ConstraintRegistry<dyn SoftConstraint> {
    pub fn evaluate(&self, inputs: &EvalInputs) -> (f64, Vec<(&'static str, f64)>) {
        let mut total = 0.0;
        let mut breakdown = Vec::with_capacity(self.entries.len());
        for e in &self.entries {
            if !e.enabled {
                continue;
            }
            let raw = e.rule.evaluate(inputs);
            total += raw * e.weight;
            breakdown.push((e.rule.name(), raw));
        }
        (total, breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct AlwaysOne;
    impl HardConstraint for AlwaysOne {
        fn name(&self) -> &'static str {
            "always_one"
        }
        fn evaluate(&self, _inputs: &EvalInputs) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_disabled_rule_contributes_nothing() {
        let mut registry = ConstraintRegistry::<dyn HardConstraint>::new()
            .with_rule(Box::new(AlwaysOne), 3.0);
        registry.set_enabled("always_one", false);

        let config = GaConfig::default();
        let ctx_qts =
            crate::qts::QuantumTimeSystem::new(vec![crate::qts::OperationalDay::new("M", 0, 60)], 30)
                .unwrap();
        let context = SchedulingContext::new(ctx_qts, vec![], vec![], vec![], vec![]);
        let pairs = [];
        let genes = [];
        let inputs = EvalInputs {
            genes: &genes,
            context: &context,
            config: &config,
            pairs: &pairs,
        };

        let (total, breakdown) = registry.evaluate(&inputs);
        assert_eq!(total, 0.0);
        assert!(breakdown.is_empty());
    }

    #[test]
    fn test_weight_scales_contribution() {
        let registry =
            ConstraintRegistry::<dyn HardConstraint>::new().with_rule(Box::new(AlwaysOne), 3.0);

        let config = GaConfig::default();
        let ctx_qts =
            crate::qts::QuantumTimeSystem::new(vec![crate::qts::OperationalDay::new("M", 0, 60)], 30)
                .unwrap();
        let context = SchedulingContext::new(ctx_qts, vec![], vec![], vec![], vec![]);
        let pairs = [];
        let genes = [];
        let inputs = EvalInputs {
            genes: &genes,
            context: &context,
            config: &config,
            pairs: &pairs,
        };

        let (total, breakdown) = registry.evaluate(&inputs);
        assert_eq!(total, 3.0);
        assert_eq!(breakdown, vec![("always_one", 1.0)]);
    }
}
