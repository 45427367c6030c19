//! Group Hierarchy Analyzer: detects parent/subgroup relationships.
//!
//! # Reference
//! Grounded on `validation.rs`'s graph-construction-from-flat-list idiom
//! (building an adjacency view over a flat `Vec` by id, as `detect_cycles`
//! does for activities).

use std::collections::HashMap;

use crate::context::SchedulingContext;

/// A parent group together with its direct subgroups, both by id.
#[derive(Debug, Clone)]
pub struct GroupHierarchyEntry {
    pub parent_id: String,
    pub subgroup_ids: Vec<String>,
}

/// Computes the parent → subgroups hierarchy from a context's flat group
/// list, using each `Group::parent_group_id` back-reference.
///
/// Groups with no subgroups are omitted from the result; callers that need
/// "no subgroups" fallback to treating the group itself as its own subgroup
/// unit (per `pairgen`'s practical-pair rule).
pub fn analyze(context: &SchedulingContext) -> Vec<GroupHierarchyEntry> {
    let mut children: HashMap<String, Vec<String>> = HashMap::new();

    for group in context.groups() {
        if let Some(parent_id) = &group.parent_group_id {
            children
                .entry(parent_id.clone())
                .or_default()
                .push(group.group_id.clone());
        }
    }

    let mut entries: Vec<GroupHierarchyEntry> = children
        .into_iter()
        .map(|(parent_id, mut subgroup_ids)| {
            subgroup_ids.sort();
            GroupHierarchyEntry {
                parent_id,
                subgroup_ids,
            }
        })
        .collect();
    entries.sort_by(|a, b| a.parent_id.cmp(&b.parent_id));
    entries
}

/// Returns the subgroup ids of `group_id`, or `[group_id]` itself if it has
/// none — the "group-or-subgroups" unit used by the pair generator for
/// practical sessions.
pub fn subgroup_units(context: &SchedulingContext, group_id: &str) -> Vec<String> {
    let hierarchy = analyze(context);
    hierarchy
        .iter()
        .find(|e| e.parent_id == group_id)
        .map(|e| e.subgroup_ids.clone())
        .filter(|subs| !subs.is_empty())
        .unwrap_or_else(|| vec![group_id.to_string()])
}
