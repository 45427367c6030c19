//! NSGA-II evolution loop and supporting selection machinery (§4.8).
//!
//! # Algorithm
//!
//! `EvolutionDriver` runs the generational loop: binary-tournament parent
//! selection over NSGA-II rank and crowding distance (`nsga2`), identity-keyed
//! crossover and mutation (`crate::operators`), repair of invalidated
//! offspring (`crate::repair`), then survivor selection back down to
//! `pop_size` by combining parents and offspring and filling fronts in order
//! (`nsga2::select_survivors`). `metrics` records one `GenerationMetrics` per
//! generation for diagnostics.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multi-Objective Genetic
//!   Algorithm: NSGA-II"

pub mod driver;
pub mod metrics;
pub mod nsga2;

pub use driver::{EvolutionDriver, EvolutionResult};
pub use metrics::GenerationMetrics;
