//! Error taxonomy for the scheduling engine.
//!
//! Four categories, matching the propagation policy: `InvalidInput` and
//! `InvariantViolation` are fatal and abort a run; `InfeasibleResource` and
//! `NumericInconsistency` are recorded as violations/penalties and never
//! raised during evolution.
//!
//! # Reference
//! Grounded on `validation.rs`'s `ValidationError`/`ValidationErrorKind` shape,
//! generalized into a `thiserror` enum per the pack's scheduling-crate convention.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Taxonomy of errors raised by the scheduling engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    /// Malformed or missing entity fields, raised at load time.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Population structure mismatch or failed post-load validation.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// No candidate resource exists (e.g. no matching room). Callers should
    /// treat this as a degrade-to-fallback signal rather than an abort;
    /// it is only constructed as an error value for diagnostics, never
    /// propagated out of the seeder/mutation/repair call sites.
    #[error("infeasible resource: {0}")]
    InfeasibleResource(String),

    /// A fitness tuple produced a non-finite or negative value.
    #[error("numeric inconsistency: {0}")]
    NumericInconsistency(String),
}

impl ScheduleError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn infeasible_resource(msg: impl Into<String>) -> Self {
        Self::InfeasibleResource(msg.into())
    }

    pub fn numeric_inconsistency(msg: impl Into<String>) -> Self {
        Self::NumericInconsistency(msg.into())
    }
}
