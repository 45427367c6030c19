//! `SessionGene`: the chromosomal unit, and `GeneIdentity`, its crossover key.
//!
//! # Reference
//! Grounded on `ga/chromosome.rs`'s gene-level struct shape, restructured so
//! identity (`course_key`, `group_ids`) is immutable and separable from the
//! mutable resource assignment, per Open Question 1 in `SPEC_FULL.md` §9
//! (`group_ids` is canonically a `BTreeSet`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::course::CourseKey;

/// The identity half of a gene: `(course_key, group_ids)`. Never mutated by
/// crossover or mutation; this is what the pair generator enumerates and what
/// the structural invariant (§8 property 1) is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneIdentity {
    pub course_key: CourseKey,
    pub group_ids: BTreeSet<String>,
}

impl GeneIdentity {
    pub fn new(course_key: CourseKey, group_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            course_key,
            group_ids: group_ids.into_iter().collect(),
        }
    }
}

/// One scheduled session unit.
///
/// `identity` is fixed at construction; `instructor_id`, `room_id`, and
/// `quanta` are the mutable resource assignment that seeding, crossover,
/// mutation, and repair operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionGene {
    pub identity: GeneIdentity,
    /// `None` denotes the unresolved placeholder (`⊥`) used by seeder phase 1.
    pub instructor_id: Option<String>,
    pub room_id: Option<String>,
    /// Non-empty, strictly increasing quantum indices once resolved; empty
    /// only for the transient phase-1 placeholder state.
    pub quanta: Vec<usize>,
}

impl SessionGene {
    /// Phase-1 skeleton gene: fixed identity, unresolved resources.
    pub fn placeholder(identity: GeneIdentity) -> Self {
        Self {
            identity,
            instructor_id: None,
            room_id: None,
            quanta: Vec::new(),
        }
    }

    pub fn course_key(&self) -> &CourseKey {
        &self.identity.course_key
    }

    pub fn group_ids(&self) -> &BTreeSet<String> {
        &self.identity.group_ids
    }

    pub fn is_resolved(&self) -> bool {
        self.instructor_id.is_some() && self.room_id.is_some() && !self.quanta.is_empty()
    }

    /// Sets `quanta`, sorting and deduplicating to preserve the strictly
    /// increasing invariant (§8 property 2) regardless of insertion order.
    pub fn set_quanta(&mut self, mut quanta: Vec<usize>) {
        quanta.sort_unstable();
        quanta.dedup();
        self.quanta = quanta;
    }

    /// Whether `quanta` is non-empty and strictly increasing (§8 property 2).
    pub fn has_valid_quanta(&self) -> bool {
        !self.quanta.is_empty() && self.quanta.windows(2).all(|w| w[0] < w[1])
    }
}
