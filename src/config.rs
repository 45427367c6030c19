//! `GaConfig`: the single aggregate of every GA/constraint/repair tunable.
//!
//! # Reference
//! Grounded on `ga/operators.rs`'s `GeneticOperators` config-struct-with-`Default`
//! idiom, expanded to cover every knob named across spec §4–§6.

use serde::{Deserialize, Serialize};

/// All tunables for one evolutionary run.
///
/// An external loader is expected to hydrate this from its own configuration
/// file format (§6); the core only defines the struct, its defaults, and its
/// `serde` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    pub pop_size: usize,
    pub generations: usize,
    pub cx_prob: f64,
    pub mut_indiv: f64,
    pub mut_gene: f64,
    pub seed: u64,

    /// Per-field mutation retention biases (§4.6).
    pub instructor_retain: f64,
    pub room_retain: f64,
    pub quanta_retain: f64,
    pub max_quanta_reassign_attempts: u32,

    /// Crossover strictness: fail on key-set mismatch vs operate on
    /// intersection (§4.5).
    pub crossover_strict: bool,

    /// Repair pipeline pass budget (§4.7).
    pub repair_max_iterations: u32,

    /// Preferred-hours window, as quantum-local minute-of-day bounds used by
    /// `early_or_late_session_penalty`.
    pub preferred_start_minute: u32,
    pub preferred_end_minute: u32,

    /// Midday-break quanta (absolute quantum indices, not minute-of-day),
    /// used by `group_midday_break_violation` and excluded from
    /// `group_gaps_penalty`/`instructor_gaps_penalty`.
    pub midday_break_quanta: Vec<usize>,

    /// Session-block clustering parameters (§4.4).
    pub block_min: usize,
    pub block_max: usize,
    pub isolated_penalty: f64,
    pub oversize_penalty: f64,

    /// Target max days a single `(course_key, group)` should span before
    /// `course_split_penalty` kicks in.
    pub course_split_target_days: u32,

    /// Whether fitness evaluation uses the `rayon`-backed parallel map.
    pub parallel: bool,

    /// Stop evolution early once the best individual reaches `hard == 0`.
    pub early_stop_on_feasible: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            pop_size: 100,
            generations: 200,
            cx_prob: 0.8,
            mut_indiv: 0.2,
            mut_gene: 0.3,
            seed: 42,

            instructor_retain: 0.7,
            room_retain: 0.5,
            quanta_retain: 0.3,
            max_quanta_reassign_attempts: 5,

            crossover_strict: false,

            repair_max_iterations: 10,

            preferred_start_minute: 9 * 60,
            preferred_end_minute: 17 * 60,

            midday_break_quanta: Vec::new(),

            block_min: 2,
            block_max: 3,
            isolated_penalty: 10.0,
            oversize_penalty: 2.0,

            course_split_target_days: 2,

            parallel: false,
            early_stop_on_feasible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let cfg = GaConfig::default();
        assert_eq!(cfg.pop_size, 100);
        assert!((cfg.instructor_retain - 0.7).abs() < 1e-12);
        assert!((cfg.room_retain - 0.5).abs() < 1e-12);
        assert!((cfg.quanta_retain - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_serde_roundtrip() {
        let cfg = GaConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: GaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pop_size, cfg.pop_size);
        assert_eq!(back.seed, cfg.seed);
    }
}
