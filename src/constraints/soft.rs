//! The six named soft constraints (§4.4): quality penalties, never
//! infeasibility.
//!
//! # Reference
//! Grounded on the same `dispatching/rules/mod.rs` one-struct-per-rule idiom
//! as `hard.rs`.

use std::collections::{BTreeSet, HashMap};

use crate::constraints::registry::{EvalInputs, SoftConstraint};
use crate::domain::CourseKey;

fn idle_quanta_penalty<'a>(
    inputs: &EvalInputs<'a>,
    occupied: HashMap<(&'a str, usize), BTreeSet<usize>>,
) -> f64 {
    let mut total = 0.0;
    for ((_, day), quanta) in &occupied {
        let Some(&lo) = quanta.iter().min() else { continue };
        let Some(&hi) = quanta.iter().max() else { continue };
        for q in lo..=hi {
            if quanta.contains(&q) {
                continue;
            }
            if inputs.config.midday_break_quanta.contains(&q) {
                continue;
            }
            total += 1.0;
        }
        let _ = day;
    }
    total
}

/// Per (group, day), count idle quanta between first and last scheduled
/// quantum, excluding the configured midday break.
#[derive(Debug)]
pub struct GroupGapsPenalty;
impl SoftConstraint for GroupGapsPenalty {
    fn name(&self) -> &'static str {
        "group_gaps_penalty"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut occupied: HashMap<(&str, usize), BTreeSet<usize>> = HashMap::new();
        for gene in inputs.genes {
            for group_id in gene.group_ids() {
                for &q in &gene.quanta {
                    let day = inputs.context.qts.quantum_to_day(q).unwrap_or(usize::MAX);
                    occupied.entry((group_id.as_str(), day)).or_default().insert(q);
                }
            }
        }
        idle_quanta_penalty(inputs, occupied)
    }
}

/// Same as `GroupGapsPenalty`, per instructor.
#[derive(Debug)]
pub struct InstructorGapsPenalty;
impl SoftConstraint for InstructorGapsPenalty {
    fn name(&self) -> &'static str {
        "instructor_gaps_penalty"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut occupied: HashMap<(&str, usize), BTreeSet<usize>> = HashMap::new();
        for gene in inputs.genes {
            let Some(instructor_id) = gene.instructor_id.as_deref() else {
                continue;
            };
            for &q in &gene.quanta {
                let day = inputs.context.qts.quantum_to_day(q).unwrap_or(usize::MAX);
                occupied.entry((instructor_id, day)).or_default().insert(q);
            }
        }
        idle_quanta_penalty(inputs, occupied)
    }
}

/// Penalizes days where a group's activity spans the configured midday break
/// without a break-aligned free window, i.e. the group has sessions both
/// before and after the break but is also scheduled during it.
#[derive(Debug)]
pub struct GroupMiddayBreakViolation;
impl SoftConstraint for GroupMiddayBreakViolation {
    fn name(&self) -> &'static str {
        "group_midday_break_violation"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        if inputs.config.midday_break_quanta.is_empty() {
            return 0.0;
        }
        let break_quanta: BTreeSet<usize> = inputs.config.midday_break_quanta.iter().copied().collect();

        let mut occupied: HashMap<(&str, usize), BTreeSet<usize>> = HashMap::new();
        for gene in inputs.genes {
            for group_id in gene.group_ids() {
                for &q in &gene.quanta {
                    let day = inputs.context.qts.quantum_to_day(q).unwrap_or(usize::MAX);
                    occupied.entry((group_id.as_str(), day)).or_default().insert(q);
                }
            }
        }

        let mut violations = 0.0;
        for quanta in occupied.values() {
            let spans_break = quanta.iter().any(|q| *q < *break_quanta.iter().min().unwrap())
                && quanta.iter().any(|q| *q > *break_quanta.iter().max().unwrap());
            let occupies_break = quanta.iter().any(|q| break_quanta.contains(q));
            if spans_break && occupies_break {
                violations += 1.0;
            }
        }
        violations
    }
}

/// Penalizes a `(course_key, group)` spread across more than
/// `course_split_target_days` distinct days.
#[derive(Debug)]
pub struct CourseSplitPenalty;
impl SoftConstraint for CourseSplitPenalty {
    fn name(&self) -> &'static str {
        "course_split_penalty"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut days_by_identity: HashMap<(&CourseKey, &BTreeSet<String>), BTreeSet<usize>> = HashMap::new();
        for gene in inputs.genes {
            let entry = days_by_identity
                .entry((gene.course_key(), gene.group_ids()))
                .or_default();
            for &q in &gene.quanta {
                if let Ok(day) = inputs.context.qts.quantum_to_day(q) {
                    entry.insert(day);
                }
            }
        }

        let target = inputs.config.course_split_target_days as usize;
        let mut total = 0.0;
        for days in days_by_identity.values() {
            if days.len() > target {
                total += (days.len() - target) as f64;
            }
        }
        total
    }
}

/// Penalizes quanta scheduled outside the configured preferred-hours window.
#[derive(Debug)]
pub struct EarlyOrLateSessionPenalty;
impl SoftConstraint for EarlyOrLateSessionPenalty {
    fn name(&self) -> &'static str {
        "early_or_late_session_penalty"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut violations = 0.0;
        for gene in inputs.genes {
            for &q in &gene.quanta {
                let Ok((_day, wall)) = inputs.context.qts.quantum_to_wall(q) else {
                    continue;
                };
                let Some(minute) = minutes_of_day(&wall) else {
                    continue;
                };
                if minute < inputs.config.preferred_start_minute || minute >= inputs.config.preferred_end_minute {
                    violations += 1.0;
                }
            }
        }
        violations
    }
}

/// For each `(course_key, day)`, splits scheduled quanta into maximal
/// consecutive runs; penalizes isolated (length-1) runs and runs beyond
/// `BLOCK_MAX`, rewards runs within `[BLOCK_MIN, BLOCK_MAX]` with zero.
#[derive(Debug)]
pub struct SessionBlockClusteringPenalty;
impl SoftConstraint for SessionBlockClusteringPenalty {
    fn name(&self) -> &'static str {
        "session_block_clustering_penalty"
    }
    fn evaluate(&self, inputs: &EvalInputs) -> f64 {
        let mut quanta_by_course_day: HashMap<(&CourseKey, usize), BTreeSet<usize>> = HashMap::new();
        for gene in inputs.genes {
            for &q in &gene.quanta {
                let Ok(day) = inputs.context.qts.quantum_to_day(q) else {
                    continue;
                };
                quanta_by_course_day
                    .entry((gene.course_key(), day))
                    .or_default()
                    .insert(q);
            }
        }

        let mut total = 0.0;
        for quanta in quanta_by_course_day.values() {
            for run_len in consecutive_run_lengths(quanta) {
                if run_len == 1 {
                    total += inputs.config.isolated_penalty;
                } else if run_len < inputs.config.block_min {
                    total += inputs.config.isolated_penalty;
                } else if run_len <= inputs.config.block_max {
                    // within the preferred block size: no penalty
                } else {
                    total += (run_len - inputs.config.block_max) as f64 * inputs.config.oversize_penalty;
                }
            }
        }
        total
    }
}

fn minutes_of_day(wall_clock: &str) -> Option<u32> {
    let (h, m) = wall_clock.split_once(':')?;
    Some(h.parse::<u32>().ok()? * 60 + m.parse::<u32>().ok()?)
}

fn consecutive_run_lengths(quanta: &BTreeSet<usize>) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut iter = quanta.iter().copied();
    let Some(mut start) = iter.next() else {
        return runs;
    };
    let mut prev = start;
    for q in iter {
        if q == prev + 1 {
            prev = q;
            continue;
        }
        runs.push(prev - start + 1);
        start = q;
        prev = q;
    }
    runs.push(prev - start + 1);
    runs
}
