//! Fitness Evaluator: decodes an individual's genes and reduces the two
//! constraint registries to the two-objective `Fitness` tuple.
//!
//! # Reference
//! Grounded on `scheduler/kpi.rs`'s decode-then-aggregate idiom (derive a
//! metrics struct from a finished `Schedule` by running independent
//! aggregations over its assignments).

use crate::config::GaConfig;
use crate::constraints::registry::EvalInputs;
use crate::constraints::{ConstraintRegistry, HardConstraint, SoftConstraint};
use crate::context::SchedulingContext;
use crate::individual::{Fitness, Individual};
use crate::pairgen::WorkItem;

/// Owns the two constraint registries and evaluates individuals against a
/// fixed context/pair-set. Cheap to share across parallel workers — it holds
/// no per-individual mutable state (§5).
pub struct FitnessEvaluator<'a> {
    context: &'a SchedulingContext,
    pairs: &'a [WorkItem],
    config: &'a GaConfig,
    hard_registry: ConstraintRegistry<dyn HardConstraint>,
    soft_registry: ConstraintRegistry<dyn SoftConstraint>,
}

/// Per-constraint violation/penalty breakdown, useful for scheduler metrics
/// diagnosing which rule is stubbornly unsatisfied (§7).
pub struct FitnessBreakdown {
    pub fitness: Fitness,
    pub hard_breakdown: Vec<(&'static str, f64)>,
    pub soft_breakdown: Vec<(&'static str, f64)>,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(
        context: &'a SchedulingContext,
        pairs: &'a [WorkItem],
        config: &'a GaConfig,
        hard_registry: ConstraintRegistry<dyn HardConstraint>,
        soft_registry: ConstraintRegistry<dyn SoftConstraint>,
    ) -> Self {
        Self {
            context,
            pairs,
            config,
            hard_registry,
            soft_registry,
        }
    }

    /// Builds the default registry of all 6 hard constraints (the 5 named in
    /// §4.4 plus `availability_violation`, resolving Open Question 4) and all
    /// 6 named soft constraints, each at weight `1.0`.
    pub fn with_default_registries(context: &'a SchedulingContext, pairs: &'a [WorkItem], config: &'a GaConfig) -> Self {
        use crate::constraints::hard::*;
        use crate::constraints::soft::*;

        let hard_registry = ConstraintRegistry::<dyn HardConstraint>::new()
            .with_rule(Box::new(NoGroupOverlap), 1.0)
            .with_rule(Box::new(NoInstructorConflict), 1.0)
            .with_rule(Box::new(InstructorNotQualified), 1.0)
            .with_rule(Box::new(RoomTypeMismatch), 1.0)
            .with_rule(Box::new(IncompleteOrExtraSessions), 1.0)
            .with_rule(Box::new(AvailabilityViolation), 1.0);

        let soft_registry = ConstraintRegistry::<dyn SoftConstraint>::new()
            .with_rule(Box::new(GroupGapsPenalty), 1.0)
            .with_rule(Box::new(InstructorGapsPenalty), 1.0)
            .with_rule(Box::new(GroupMiddayBreakViolation), 1.0)
            .with_rule(Box::new(CourseSplitPenalty), 1.0)
            .with_rule(Box::new(EarlyOrLateSessionPenalty), 1.0)
            .with_rule(Box::new(SessionBlockClusteringPenalty), 1.0);

        Self::new(context, pairs, config, hard_registry, soft_registry)
    }

    pub fn hard_registry_mut(&mut self) -> &mut ConstraintRegistry<dyn HardConstraint> {
        &mut self.hard_registry
    }

    pub fn soft_registry_mut(&mut self) -> &mut ConstraintRegistry<dyn SoftConstraint> {
        &mut self.soft_registry
    }

    fn inputs<'b>(&'b self, genes: &'b [crate::domain::SessionGene]) -> EvalInputs<'b> {
        EvalInputs {
            genes,
            context: self.context,
            config: self.config,
            pairs: self.pairs,
        }
    }

    /// Evaluates one individual, returning the two-objective fitness alone.
    pub fn evaluate(&self, individual: &Individual) -> Fitness {
        let inputs = self.inputs(&individual.genes);
        let (hard, _) = self.hard_registry.evaluate(&inputs);
        let (soft, _) = self.soft_registry.evaluate(&inputs);
        Fitness::new(hard, soft)
    }

    /// Evaluates one individual with the full per-constraint breakdown.
    pub fn evaluate_detailed(&self, individual: &Individual) -> FitnessBreakdown {
        let inputs = self.inputs(&individual.genes);
        let (hard, hard_breakdown) = self.hard_registry.evaluate(&inputs);
        let (soft, soft_breakdown) = self.soft_registry.evaluate(&inputs);
        FitnessBreakdown {
            fitness: Fitness::new(hard, soft),
            hard_breakdown,
            soft_breakdown,
        }
    }

    /// Evaluates every individual that needs it (`fitness.is_none()`),
    /// writing results back in place. The caller supplies the map strategy
    /// (`crate::parallel::ParallelMap`) so this stays agnostic of
    /// sequential vs. `rayon`-backed execution (§5).
    pub fn evaluate_population(&self, population: &mut crate::individual::Population, map: &dyn crate::parallel::ParallelMap) {
        let indices: Vec<usize> = population
            .individuals
            .iter()
            .enumerate()
            .filter(|(_, ind)| ind.needs_evaluation())
            .map(|(i, _)| i)
            .collect();

        let individuals = &population.individuals;
        let fitnesses = map.map_indices(&indices, &|i| self.evaluate(&individuals[i]));

        for (i, fitness) in indices.into_iter().zip(fitnesses) {
            population.individuals[i].fitness = Some(fitness);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{CourseKey, SessionType};
    use crate::domain::{Course, Group, Instructor, Room};
    use crate::qts::{OperationalDay, QuantumTimeSystem};

    fn scenario_a() -> (SchedulingContext, Vec<WorkItem>, GaConfig) {
        let qts = QuantumTimeSystem::new(vec![OperationalDay::new("Monday", 0, 120)], 30).unwrap();
        let key = CourseKey::new("C", SessionType::Theory);
        let course = Course::new(key.clone(), 2, "lecture").with_qualified_instructors(vec!["I".into()]);
        let group = Group::new("G", 20).with_availability([0, 1, 2, 3]).with_courses(vec!["C".into()]);
        let instructor = Instructor::new("I")
            .with_availability([0, 1, 2, 3])
            .with_qualifications([key]);
        let room = Room::new("R", 30, "lecture").with_availability([0, 1, 2, 3]);
        let context = SchedulingContext::new(qts, vec![course], vec![group], vec![instructor], vec![room]);
        let pairs = crate::pairgen::generate_pairs(&context);
        (context, pairs, GaConfig::default())
    }

    #[test]
    fn test_feasible_seed_scores_zero_hard_scenario_a() {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let (context, pairs, config) = scenario_a();
        let mut rng = SmallRng::seed_from_u64(7);
        let ind = crate::seeding::seed_individual(&context, &pairs, &mut rng);

        let evaluator = FitnessEvaluator::with_default_registries(&context, &pairs, &config);
        let fitness = evaluator.evaluate(&ind);
        assert_eq!(fitness.hard, 0.0);
        assert!(fitness.is_feasible());
    }

    #[test]
    fn test_room_type_mismatch_is_penalized() {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let (context, pairs, config) = scenario_a();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ind = crate::seeding::seed_individual(&context, &pairs, &mut rng);
        for gene in &mut ind.genes {
            gene.room_id = Some("missing_room".to_string());
        }
        let evaluator = FitnessEvaluator::with_default_registries(&context, &pairs, &config);
        let fitness = evaluator.evaluate(&ind);
        assert!(fitness.hard > 0.0);
    }

    #[test]
    fn test_evaluate_is_pure_across_repeated_calls() {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let (context, pairs, config) = scenario_a();
        let mut rng = SmallRng::seed_from_u64(3);
        let ind = crate::seeding::seed_individual(&context, &pairs, &mut rng);

        let evaluator = FitnessEvaluator::with_default_registries(&context, &pairs, &config);
        let first = evaluator.evaluate(&ind);
        let second = evaluator.evaluate(&ind);
        let third = evaluator.evaluate(&ind);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_empty_registries_produce_zero_fitness() {
        let (context, pairs, config) = scenario_a();
        let evaluator = FitnessEvaluator::new(
            &context,
            &pairs,
            &config,
            ConstraintRegistry::<dyn HardConstraint>::new(),
            ConstraintRegistry::<dyn SoftConstraint>::new(),
        );
        let ind = Individual::new(vec![]);
        let fitness = evaluator.evaluate(&ind);
        assert_eq!(fitness, Fitness::new(0.0, 0.0));
    }
}
