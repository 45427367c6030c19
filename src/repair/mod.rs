//! Priority-ordered repair pipeline (§4.7): deterministic local fixes applied
//! to one individual after crossover/mutation, before fitness evaluation.
//!
//! # Reference
//! Grounded on `dispatching/engine.rs`'s ordered rule-application idiom.

pub mod registry;
pub mod repairs;

pub use registry::{Repair, RepairContext, RepairRegistry};
