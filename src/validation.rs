//! Load-time validation for the UCTP entity set (§7).
//!
//! Runs once, before a `SchedulingContext` is built: `SchedulingContext::new`
//! silently collapses duplicate ids into a `HashMap`, so duplicate-id
//! detection must happen on the raw entity lists, not after assembly.
//!
//! # Reference
//! Grounded directly on the teacher's `validate_input`/`detect_cycles`
//! shape: aggregate every problem found in one pass rather than stopping at
//! the first, and detect cycles via DFS over a back-reference adjacency map
//! built from a flat list.

use std::collections::{HashMap, HashSet};

use crate::domain::course::CourseKey;
use crate::domain::{Course, Group, Instructor, Room};
use crate::error::ScheduleError;

/// Validates the raw entity lists a loader assembled from its own file
/// format, before they are folded into a [`crate::context::SchedulingContext`].
///
/// Returns every problem found in one pass, not just the first.
pub fn validate_context(
    courses: &[Course],
    groups: &[Group],
    instructors: &[Instructor],
    rooms: &[Room],
) -> Result<(), Vec<ScheduleError>> {
    let mut errors = Vec::new();

    let course_keys = collect_unique(courses.iter().map(|c| &c.key), &mut errors, |key| {
        format!("duplicate course key: {}/{:?}", key.course_code, key.course_type)
    });
    let group_ids = collect_unique(groups.iter().map(|g| g.group_id.as_str()), &mut errors, |id| {
        format!("duplicate group id: {id}")
    });
    let instructor_ids = collect_unique(instructors.iter().map(|i| i.instructor_id.as_str()), &mut errors, |id| {
        format!("duplicate instructor id: {id}")
    });
    collect_unique(rooms.iter().map(|r| r.room_id.as_str()), &mut errors, |id| {
        format!("duplicate room id: {id}")
    });

    for course in courses {
        for instructor_id in &course.qualified_instructors {
            if !instructor_ids.contains(instructor_id.as_str()) {
                errors.push(ScheduleError::invalid_input(format!(
                    "course {:?} qualifies unknown instructor '{instructor_id}'",
                    course.key
                )));
            }
        }
        for group_id in &course.enrolled_groups {
            if !group_ids.contains(group_id.as_str()) {
                errors.push(ScheduleError::invalid_input(format!(
                    "course {:?} enrolls unknown group '{group_id}'",
                    course.key
                )));
            }
        }
        if course.required_quanta > 0 && course.qualified_instructors.is_empty() {
            errors.push(ScheduleError::invariant_violation(format!(
                "course {:?} requires {} quanta but has no qualified instructor",
                course.key, course.required_quanta
            )));
        }
        if course.required_quanta > 0 && course.enrolled_groups.is_empty() {
            errors.push(ScheduleError::invariant_violation(format!(
                "course {:?} requires {} quanta but has no enrolled group",
                course.key, course.required_quanta
            )));
        }
    }

    for group in groups {
        for code in &group.enrolled_course_codes {
            if !course_keys.iter().any(|k| &k.course_code == code) {
                errors.push(ScheduleError::invalid_input(format!(
                    "group '{}' enrolls unknown course code '{code}'",
                    group.group_id
                )));
            }
        }
        if let Some(parent_id) = &group.parent_group_id {
            if !group_ids.contains(parent_id.as_str()) {
                errors.push(ScheduleError::invalid_input(format!(
                    "group '{}' references unknown parent group '{parent_id}'",
                    group.group_id
                )));
            }
        }
    }

    if let Some(cycle_err) = detect_parent_cycles(groups) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Inserts every item of `items` into a `HashSet`, pushing `on_duplicate(item)`
/// as an error for each repeat. Returns the deduplicated set.
fn collect_unique<T: Eq + std::hash::Hash + Clone>(
    items: impl Iterator<Item = T>,
    errors: &mut Vec<ScheduleError>,
    on_duplicate: impl Fn(&T) -> String,
) -> HashSet<T> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.clone()) {
            errors.push(ScheduleError::invalid_input(on_duplicate(&item)));
        }
    }
    seen
}

/// Detects cycles in the parent/subgroup back-reference graph via DFS,
/// mirroring the teacher's `detect_cycles` over predecessor edges.
fn detect_parent_cycles(groups: &[Group]) -> Option<ScheduleError> {
    let mut parent_of: HashMap<&str, &str> = HashMap::new();
    let mut all_ids: HashSet<&str> = HashSet::new();

    for group in groups {
        all_ids.insert(group.group_id.as_str());
        if let Some(parent_id) = &group.parent_group_id {
            parent_of.insert(group.group_id.as_str(), parent_id.as_str());
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut in_stack: HashSet<&str> = HashSet::new();

    for &node in &all_ids {
        if !visited.contains(node) && has_cycle_dfs(node, &parent_of, &mut visited, &mut in_stack) {
            return Some(ScheduleError::invariant_violation(format!(
                "circular parent/subgroup relationship involving group '{node}'"
            )));
        }
    }
    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    parent_of: &HashMap<&'a str, &'a str>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(&parent) = parent_of.get(node) {
        if in_stack.contains(parent) {
            return true;
        }
        if !visited.contains(parent) && has_cycle_dfs(parent, parent_of, visited, in_stack) {
            return true;
        }
    }

    in_stack.remove(node);
    false
}
