//! GA Scheduler: the NSGA-II evolution loop (§4.8).
//!
//! # Reference
//! Grounded on `scheduler/simple.rs`'s request/driver split (`ScheduleRequest`
//! as input, a stateless driver method producing the result) and `ga/mod.rs`'s
//! quick-start orchestration shape (build problem → run → return result),
//! rewired around NSGA-II selection instead of the teacher's single-objective
//! `GaRunner`.

use std::collections::HashMap;

use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::GaConfig;
use crate::context::SchedulingContext;
use crate::error::Result;
use crate::fitness::FitnessEvaluator;
use crate::individual::{Fitness, Individual, Population};
use crate::operators::{crossover, mutate};
use crate::pairgen::{self, WorkItem};
use crate::repair::{RepairContext, RepairRegistry};
use crate::scheduler::metrics::{population_diversity, GenerationMetrics};
use crate::scheduler::nsga2;
use crate::seeding;

/// Everything produced by one evolutionary run.
pub struct EvolutionResult {
    /// The final generation's population.
    pub population: Population,
    /// The terminal selection (§4.8): among the final Pareto front, the
    /// feasible individual with smallest soft penalty, or (if none feasible)
    /// the front's minimum by `(hard, soft)`.
    pub best: Individual,
    pub generations: Vec<GenerationMetrics>,
}

/// Orchestrates one end-to-end evolutionary run over a fixed context.
pub struct EvolutionDriver<'a> {
    context: &'a SchedulingContext,
    pairs: Vec<WorkItem>,
    config: GaConfig,
    repairs: RepairRegistry,
}

impl<'a> EvolutionDriver<'a> {
    pub fn new(context: &'a SchedulingContext, config: GaConfig) -> Self {
        Self {
            context,
            pairs: pairgen::generate_pairs(context),
            config,
            repairs: RepairRegistry::with_default_repairs(),
        }
    }

    pub fn with_repairs(mut self, repairs: RepairRegistry) -> Self {
        self.repairs = repairs;
        self
    }

    /// Runs the full evolutionary loop to completion (or early stop).
    ///
    /// Aborts with the driver's first fatal error (`InvalidInput` /
    /// `InvariantViolation`, §7) — e.g. a strict-mode crossover identity
    /// mismatch — rather than masking it.
    pub fn run(&self) -> Result<EvolutionResult> {
        let mut rng = SmallRng::seed_from_u64(self.config.seed);
        let evaluator = FitnessEvaluator::with_default_registries(self.context, &self.pairs, &self.config);
        let map = crate::parallel::select(self.config.parallel);

        let mut population = seeding::seed_population(self.context, &self.pairs, &self.config, &mut rng);
        evaluator.evaluate_population(&mut population, map.as_ref());

        let mut generation_log = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            let fitnesses: Vec<Fitness> = population.individuals.iter().map(|i| i.fitness.expect("evaluated")).collect();
            let ranks = nsga2::rank_all(&fitnesses);

            let mut offspring = Vec::with_capacity(self.config.pop_size);
            let mut repair_fix_counts: HashMap<&'static str, usize> = HashMap::new();

            while offspring.len() < self.config.pop_size {
                let i1 = nsga2::binary_tournament(&ranks, &mut rng);
                let i2 = nsga2::binary_tournament(&ranks, &mut rng);

                let (mut c1, mut c2) = crossover::crossover(
                    &population.individuals[i1],
                    &population.individuals[i2],
                    self.config.cx_prob,
                    self.config.crossover_strict,
                    &mut rng,
                )?;

                mutate(&mut c1, self.context, &self.config, &mut rng);
                mutate(&mut c2, self.context, &self.config, &mut rng);

                self.repair_if_needed(&mut c1, &mut rng, &mut repair_fix_counts);
                self.repair_if_needed(&mut c2, &mut rng, &mut repair_fix_counts);

                offspring.push(c1);
                if offspring.len() < self.config.pop_size {
                    offspring.push(c2);
                }
            }

            let mut offspring_pop = Population::new(offspring);
            evaluator.evaluate_population(&mut offspring_pop, map.as_ref());

            let mut combined = population.individuals;
            combined.extend(offspring_pop.individuals);
            let combined_fitnesses: Vec<Fitness> = combined.iter().map(|i| i.fitness.expect("evaluated")).collect();

            let survivor_idx = nsga2::select_survivors(&combined_fitnesses, self.config.pop_size);
            let mut survivors: Vec<Individual> = survivor_idx.into_iter().map(|i| combined[i].clone()).collect();
            survivors.truncate(self.config.pop_size);
            population = Population::new(survivors);

            let diversity = population_diversity(&population);
            let best_individual = population.best().expect("non-empty population").clone();
            let best_breakdown = evaluator.evaluate_detailed(&best_individual);
            let gm = GenerationMetrics::new(generation, &best_breakdown, diversity, repair_fix_counts);
            info!("{}", gm.summary_line());
            let feasible = best_breakdown.fitness.is_feasible();
            generation_log.push(gm);

            if self.config.early_stop_on_feasible && feasible {
                break;
            }
        }

        let best = self.terminal_selection(&population);
        Ok(EvolutionResult {
            population,
            best,
            generations: generation_log,
        })
    }

    fn repair_if_needed(&self, individual: &mut Individual, rng: &mut SmallRng, fix_counts: &mut HashMap<&'static str, usize>) {
        if individual.fitness.is_some() {
            return;
        }
        let repair_ctx = RepairContext {
            context: self.context,
            config: &self.config,
            pairs: &self.pairs,
        };
        let (_total, breakdown) = self.repairs.run_with_breakdown(individual, &repair_ctx, rng);
        for (name, count) in breakdown {
            *fix_counts.entry(name).or_insert(0) += count;
        }
    }

    /// §4.8 terminal selection: prefer the feasible individual with smallest
    /// soft penalty from the final Pareto front; if none is feasible, the
    /// front's minimum by `(hard, soft)`.
    fn terminal_selection(&self, population: &Population) -> Individual {
        let fitnesses: Vec<Fitness> = population.individuals.iter().map(|i| i.fitness.expect("evaluated")).collect();
        let fronts = nsga2::non_dominated_sort(&fitnesses);
        let front = fronts.first().cloned().unwrap_or_default();

        let best_idx = front
            .iter()
            .copied()
            .min_by(|&a, &b| {
                use ordered_float::OrderedFloat as OF;
                let fa = fitnesses[a];
                let fb = fitnesses[b];
                (OF(fa.hard), OF(fa.soft)).cmp(&(OF(fb.hard), OF(fb.soft)))
            })
            .unwrap_or(0);

        population.individuals[best_idx].clone()
    }
}
