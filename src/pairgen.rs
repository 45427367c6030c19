//! Course-Group Pair Generator: enumerates the exact work items one
//! chromosome must encode.
//!
//! # Reference
//! Directly implements spec §4.2; no single teacher analogue (the teacher's
//! domain has no group/subgroup enrollment concept). Reuses
//! [`crate::hierarchy`] for the subgroup-unit computation `4.2` requires for
//! practical sessions.

use std::collections::BTreeSet;

use crate::context::SchedulingContext;
use crate::domain::{CourseKey, SessionType};
use crate::hierarchy;

/// One `(course_key, group_set, session_type, required_quanta)` work item.
///
/// The full set of `WorkItem`s generated for a context is the reference
/// multiset every individual's genes must match in identity (§8 property 1).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkItem {
    pub course_key: CourseKey,
    pub group_ids: BTreeSet<String>,
    pub required_quanta: usize,
}

/// Generates the canonical work-item set for `context`.
///
/// For each top-level group and each course code it enrolls:
/// - if a theory variant exists, one item attached to the group itself;
/// - if a practical variant exists, one item per subgroup (or the group
///   itself, if it has no subgroups).
///
/// Courses with `required_quanta == 0` contribute no item (boundary
/// behavior, §8).
pub fn generate_pairs(context: &SchedulingContext) -> Vec<WorkItem> {
    let mut items = Vec::new();

    for group in context.groups() {
        if group.is_subgroup() {
            // Subgroups are only ever the group_ids of a practical item,
            // reached below via `subgroup_units` from their top-level parent.
            continue;
        }

        for course_code in &group.enrolled_course_codes {
            let theory_key = CourseKey::new(course_code.clone(), SessionType::Theory);
            if let Some(course) = context.course(&theory_key) {
                if course.required_quanta > 0 {
                    items.push(WorkItem {
                        course_key: theory_key,
                        group_ids: [group.group_id.clone()].into(),
                        required_quanta: course.required_quanta,
                    });
                }
            }

            let practical_key = CourseKey::new(course_code.clone(), SessionType::Practical);
            if let Some(course) = context.course(&practical_key) {
                if course.required_quanta > 0 {
                    for unit_id in hierarchy::subgroup_units(context, &group.group_id) {
                        items.push(WorkItem {
                            course_key: practical_key.clone(),
                            group_ids: [unit_id].into(),
                            required_quanta: course.required_quanta,
                        });
                    }
                }
            }
        }
    }

    items.sort();
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, Group};
    use crate::qts::{OperationalDay, QuantumTimeSystem};

    fn qts() -> QuantumTimeSystem {
        QuantumTimeSystem::new(vec![OperationalDay::new("Monday", 0, 240)], 30).unwrap()
    }

    #[test]
    fn test_zero_required_quanta_contributes_nothing() {
        let theory = Course::new(CourseKey::new("X", SessionType::Theory), 0, "lecture");
        let group = Group::new("G1", 30).with_courses(vec!["X".into()]);
        let ctx = SchedulingContext::new(qts(), vec![theory], vec![group], vec![], vec![]);
        assert!(generate_pairs(&ctx).is_empty());
    }

    #[test]
    fn test_theory_attached_to_group_practical_to_subgroups() {
        let theory = Course::new(CourseKey::new("X", SessionType::Theory), 2, "lecture");
        let practical = Course::new(CourseKey::new("X", SessionType::Practical), 2, "practical");
        let parent = Group::new("G1", 60).with_courses(vec!["X".into()]);
        let sub_a = Group::new("G1-A", 30).with_parent("G1");
        let sub_b = Group::new("G1-B", 30).with_parent("G1");

        let ctx = SchedulingContext::new(
            qts(),
            vec![theory, practical],
            vec![parent, sub_a, sub_b],
            vec![],
            vec![],
        );
        let pairs = generate_pairs(&ctx);

        assert_eq!(pairs.len(), 3); // 1 theory + 2 practical (one per subgroup)
        assert!(pairs
            .iter()
            .any(|p| p.course_key.course_type == SessionType::Theory
                && p.group_ids == ["G1".to_string()].into()));
        assert!(pairs
            .iter()
            .any(|p| p.course_key.course_type == SessionType::Practical
                && p.group_ids == ["G1-A".to_string()].into()));
        assert!(pairs
            .iter()
            .any(|p| p.course_key.course_type == SessionType::Practical
                && p.group_ids == ["G1-B".to_string()].into()));
    }

    #[test]
    fn test_scenario_f_completeness_key_alignment() {
        // Two courses share course_code X: theory (required=2), practical (required=2).
        let theory = Course::new(CourseKey::new("X", SessionType::Theory), 2, "lecture");
        let practical = Course::new(CourseKey::new("X", SessionType::Practical), 2, "practical");
        let group = Group::new("G1", 30).with_courses(vec!["X".into()]);

        let ctx =
            SchedulingContext::new(qts(), vec![theory, practical], vec![group], vec![], vec![]);
        let pairs = generate_pairs(&ctx);

        assert_eq!(pairs.len(), 2);
        assert_ne!(pairs[0].course_key, pairs[1].course_key);
    }
}
