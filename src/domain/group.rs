//! Group entity: student cohorts, with first-class subgroup modeling.
//!
//! Subgroups are ordinary `Group`s; the parent/subgroup relation is not
//! stored here but recovered by [`crate::hierarchy`], keeping `Group` itself
//! a flat, load-order-independent record.
//!
//! # Reference
//! Grounded on `models/resource.rs`'s consuming-builder idiom.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub group_id: String,
    pub student_count: u32,
    /// Subset of `[0, T)` during which this group is available.
    pub available_quanta: BTreeSet<usize>,
    /// Course codes (bare, not `CourseKey`) this group is enrolled in.
    pub enrolled_course_codes: Vec<String>,
    /// Parent group id, if this group is itself a subgroup. `None` for
    /// top-level groups.
    pub parent_group_id: Option<String>,
}

impl Group {
    pub fn new(group_id: impl Into<String>, student_count: u32) -> Self {
        Self {
            group_id: group_id.into(),
            student_count,
            available_quanta: BTreeSet::new(),
            enrolled_course_codes: Vec::new(),
            parent_group_id: None,
        }
    }

    pub fn with_availability(mut self, quanta: impl IntoIterator<Item = usize>) -> Self {
        self.available_quanta = quanta.into_iter().collect();
        self
    }

    pub fn with_courses(mut self, codes: Vec<String>) -> Self {
        self.enrolled_course_codes = codes;
        self
    }

    pub fn with_parent(mut self, parent_group_id: impl Into<String>) -> Self {
        self.parent_group_id = Some(parent_group_id.into());
        self
    }

    pub fn is_subgroup(&self) -> bool {
        self.parent_group_id.is_some()
    }

    pub fn is_available(&self, q: usize) -> bool {
        self.available_quanta.contains(&q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subgroup_flag() {
        let parent = Group::new("G1", 60);
        let sub = Group::new("G1-A", 20).with_parent("G1");
        assert!(!parent.is_subgroup());
        assert!(sub.is_subgroup());
        assert_eq!(sub.parent_group_id.as_deref(), Some("G1"));
    }

    #[test]
    fn test_availability() {
        let g = Group::new("G1", 60).with_availability([0, 1, 2]);
        assert!(g.is_available(1));
        assert!(!g.is_available(5));
    }
}
