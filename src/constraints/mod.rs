//! Constraint Registry: hard and soft evaluator tables.
//!
//! # Reference
//! Grounded on `dispatching/engine.rs`'s `RuleEngine`/`WeightedRule` pattern
//! (named, weighted, `Arc<dyn Trait>`-held entries composed into an ordered
//! collection) and `dispatching/rules/mod.rs`'s one-struct-per-rule idiom.

pub mod hard;
pub mod registry;
pub mod soft;

pub use registry::{ConstraintRegistry, EvalInputs, HardConstraint, SoftConstraint};
