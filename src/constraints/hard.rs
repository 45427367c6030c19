//! The five named hard constraints (§4.4) plus `availability_violation`,
//! which resolves Open Question 4 in `SPEC_FULL.md` §9 as a registry-toggled
//! hard constraint.
//!
//! # Reference
//! Grounded on `dispatching/rules/mod.rs`'s one-struct-per-rule idiom: each
//! constraint is a unit struct implementing a shared trait.

use std::collections::{BTreeSet, HashMap};

use crate::constraints::registry::{EvalInputs, HardConstraint};
use crate::domain::room::compatible_room_types;

fn group_count_map<'a>(genes: &'a [crate::domain::SessionGene]) -> HashMap<(&'a str, usize), u32> {
    let mut counts: HashMap<(&str, usize), u32> = HashMap::new();
    for gene in genes {
        for group_id in gene.group_ids() {
            for &q in &gene.quanta {
                *counts.entry((group_id.as_str(), q)).or_insert(0) += 1;
            }
        }
    }
    counts
}

fn overlap_violations(counts: &HashMap<(&str, usize), u32>) -> f64 {
    counts
        .values()
        .filter(|&&c| c > 1)
        .map(|&c| (c - 1) as f64)
        .sum()
}

/// For every (group, quantum), at most one session.
#[derive(Debug)]
pub struct NoGroupOverlap;
impl HardConstraint for NoGroupOverlap {
    fn name(&self) -> &'static str {
        "no_group_overlap"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        overlap_violations(&group_count_map(inputs.genes))
    }
}

/// For every (instructor, quantum), at most one session.
#[derive(Debug)]
pub struct NoInstructorConflict;
impl HardConstraint for NoInstructorConflict {
    fn name(&self) -> &'static str {
        "no_instructor_conflict"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut counts: HashMap<(&str, usize), u32> = HashMap::new();
        for gene in inputs.genes {
            let Some(instructor_id) = gene.instructor_id.as_deref() else {
                continue;
            };
            for &q in &gene.quanta {
                *counts.entry((instructor_id, q)).or_insert(0) += 1;
            }
        }
        overlap_violations(&counts)
    }
}

/// Session's instructor must have `course_key` in its qualifications.
#[derive(Debug)]
pub struct InstructorNotQualified;
impl HardConstraint for InstructorNotQualified {
    fn name(&self) -> &'static str {
        "instructor_not_qualified"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut violations = 0.0;
        for gene in inputs.genes {
            match gene.instructor_id.as_deref().and_then(|id| inputs.context.instructor(id)) {
                Some(instructor) if instructor.is_qualified_for(gene.course_key()) => {}
                _ => violations += 1.0,
            }
        }
        violations
    }
}

/// Session's room type must match the course's required type, via the
/// compatibility table.
#[derive(Debug)]
pub struct RoomTypeMismatch;
impl HardConstraint for RoomTypeMismatch {
    fn name(&self) -> &'static str {
        "room_type_mismatch"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut violations = 0.0;
        for gene in inputs.genes {
            let Some(course) = inputs.context.course(gene.course_key()) else {
                violations += 1.0;
                continue;
            };
            match gene.room_id.as_deref().and_then(|id| inputs.context.room(id)) {
                Some(room) if room.satisfies(&course.required_room_type) => {}
                _ => violations += 1.0,
            }
        }
        violations
    }
}

/// For every `(course_key, group_id)` from the pair generator, total
/// scheduled quanta equals required; tally absolute deltas. Keys on
/// `(course_key, group_id)`, never the bare course code (Scenario F).
#[derive(Debug)]
pub struct IncompleteOrExtraSessions;
impl HardConstraint for IncompleteOrExtraSessions {
    fn name(&self) -> &'static str {
        "incomplete_or_extra_sessions"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let by_identity: HashMap<(&crate::domain::CourseKey, &BTreeSet<String>), usize> = {
            let mut m: HashMap<(&crate::domain::CourseKey, &BTreeSet<String>), usize> = HashMap::new();
            for gene in inputs.genes {
                *m.entry((gene.course_key(), gene.group_ids())).or_insert(0) += gene.quanta.len();
            }
            m
        };

        let mut total_delta = 0.0;
        for pair in inputs.pairs {
            let scheduled_quanta = by_identity
                .get(&(&pair.course_key, &pair.group_ids))
                .copied()
                .unwrap_or(0);
            total_delta += (scheduled_quanta as i64 - pair.required_quanta as i64).unsigned_abs() as f64;
        }
        // Extra identities that the pair generator never produced: every
        // scheduled quantum under them is pure excess.
        let reference: std::collections::HashSet<(&crate::domain::CourseKey, &BTreeSet<String>)> =
            inputs
                .pairs
                .iter()
                .map(|p| (&p.course_key, &p.group_ids))
                .collect();
        for (key, count) in &by_identity {
            if !reference.contains(key) {
                total_delta += *count as f64;
            }
        }
        total_delta
    }
}

/// Registry-toggled resolution of Open Question 4: whether a session is
/// scheduled at a quantum available to its instructor, room, and every
/// enrolled group.
#[derive(Debug)]
pub struct AvailabilityViolation;
impl HardConstraint for AvailabilityViolation {
    fn name(&self) -> &'static str {
        "availability_violation"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut violations = 0.0;
        for gene in inputs.genes {
            let instructor = gene.instructor_id.as_deref().and_then(|id| inputs.context.instructor(id));
            let room = gene.room_id.as_deref().and_then(|id| inputs.context.room(id));

            for &q in &gene.quanta {
                if !instructor.map(|i| i.is_available(q)).unwrap_or(false) {
                    violations += 1.0;
                }
                if !room.map(|r| r.is_available(q)).unwrap_or(false) {
                    violations += 1.0;
                }
                for group_id in gene.group_ids() {
                    let available = inputs
                        .context
                        .group(group_id)
                        .map(|g| g.is_available(q))
                        .unwrap_or(false);
                    if !available {
                        violations += 1.0;
                    }
                }
            }
        }
        violations
    }
}

/// Whether `required` is satisfied by `room_type`, re-exported for repairs
/// that need the same lookup without going through the trait object.
pub fn room_type_ok(required: &str, room_type: &str) -> bool {
    compatible_room_types(required).contains(&room_type)
}
