//! University Course Timetabling engine: a multi-objective genetic algorithm
//! over a quantum-indexed operational time grid.
//!
//! Encodes one timetable as an `Individual` — an identity-keyed collection of
//! `SessionGene`s, one per scheduled block of a course/group/session-type
//! work item. Evolution never collapses hard and soft constraints into a
//! single scalar: every individual carries a two-objective `Fitness`
//! `(hard, soft)`, and selection is Pareto-based throughout.
//!
//! # Modules
//!
//! - **`error`**: crate-wide `ScheduleError`/`Result` taxonomy
//! - **`qts`**: Quantum Time System — dense `[0, T)` operational time indexing
//! - **`config`**: `GaConfig`, the single aggregate of every tunable
//! - **`domain`**: `Course`, `Group`, `Instructor`, `Room`, `SessionGene`
//! - **`context`**: `SchedulingContext`, the immutable entity bundle passed
//!   to every operator
//! - **`hierarchy`**: parent/subgroup analysis over the flat group list
//! - **`pairgen`**: enumerates the `WorkItem`s a chromosome must encode
//! - **`individual`**: `Individual`, `Population`, `Fitness`
//! - **`seeding`**: two-phase initial-population construction
//! - **`constraints`**: hard/soft constraint registries
//! - **`fitness`**: decodes an individual against both registries
//! - **`parallel`**: the single concurrency integration point
//! - **`operators`**: identity-keyed crossover and constraint-aware mutation
//! - **`repair`**: priority-ordered local-fix pipeline run before evaluation
//! - **`scheduler`**: NSGA-II selection and the generational evolution loop
//! - **`output`**: decoded, human-facing timetable types
//! - **`validation`**: load-time integrity checks over the entity set
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multi-Objective Genetic
//!   Algorithm: NSGA-II"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod constraints;
pub mod context;
pub mod domain;
pub mod error;
pub mod fitness;
pub mod hierarchy;
pub mod individual;
pub mod operators;
pub mod output;
pub mod pairgen;
pub mod parallel;
pub mod qts;
pub mod repair;
pub mod scheduler;
pub mod seeding;
pub mod validation;

pub use error::{Result, ScheduleError};
pub use individual::{Fitness, Individual, Population};
