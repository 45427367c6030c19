//! Position-independent genetic operators (§4.5, §4.6).
//!
//! # Reference
//! Grounded on `ga/operators.rs`'s configurable-strategy-struct idiom and
//! `ga/chromosome.rs`'s crossover/mutation shapes, reworked from
//! position-keyed permutation vectors to identity-keyed gene swaps.

pub mod crossover;
pub mod mutation;

pub use crossover::crossover;
pub use mutation::mutate;
