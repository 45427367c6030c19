//! Course entity: identity, weekly quanta requirement, and qualification links.
//!
//! # Reference
//! Grounded on `models/task.rs`/`models/activity.rs`'s consuming-builder idiom
//! (`with_x(mut self, ...) -> Self`).

use serde::{Deserialize, Serialize};

/// Theory vs practical: the two session types a course code can split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionType {
    Theory,
    Practical,
}

/// Identity of a schedulable course variant: `(course_code, course_type)`.
///
/// Theory and practical variants of the same code are distinct entities —
/// this tuple, not the bare code, is the course's identity everywhere in the
/// engine (pair generation, gene identity, constraint lookups).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseKey {
    pub course_code: String,
    pub course_type: SessionType,
}

impl CourseKey {
    pub fn new(course_code: impl Into<String>, course_type: SessionType) -> Self {
        Self {
            course_code: course_code.into(),
            course_type,
        }
    }
}

/// A course variant (one `CourseKey`) with its weekly quanta requirement and
/// qualified-instructor/enrolled-group links.
///
/// Invariant: a course with `required_quanta > 0` must have at least one
/// enrolled group (checked by `validation::validate_context`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub key: CourseKey,
    /// Quanta required per week for this course variant.
    pub required_quanta: usize,
    /// Room type required to host this course (`lecture` or `practical`).
    pub required_room_type: String,
    /// Instructor ids qualified to teach `key`.
    pub qualified_instructors: Vec<String>,
    /// Group ids enrolled in `key` (computed at load time by the caller).
    pub enrolled_groups: Vec<String>,
}

impl Course {
    pub fn new(key: CourseKey, required_quanta: usize, required_room_type: impl Into<String>) -> Self {
        Self {
            key,
            required_quanta,
            required_room_type: required_room_type.into(),
            qualified_instructors: Vec::new(),
            enrolled_groups: Vec::new(),
        }
    }

    pub fn with_qualified_instructors(mut self, ids: Vec<String>) -> Self {
        self.qualified_instructors = ids;
        self
    }

    pub fn with_enrolled_groups(mut self, ids: Vec<String>) -> Self {
        self.enrolled_groups = ids;
        self
    }

    pub fn is_qualified(&self, instructor_id: &str) -> bool {
        self.qualified_instructors.iter().any(|i| i == instructor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_course_keys_for_theory_and_practical() {
        let theory = CourseKey::new("CS101", SessionType::Theory);
        let practical = CourseKey::new("CS101", SessionType::Practical);
        assert_ne!(theory, practical);
    }

    #[test]
    fn test_qualification_check() {
        let course = Course::new(CourseKey::new("CS101", SessionType::Theory), 2, "lecture")
            .with_qualified_instructors(vec!["I1".into(), "I2".into()]);
        assert!(course.is_qualified("I1"));
        assert!(!course.is_qualified("I3"));
    }
}
