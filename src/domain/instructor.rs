//! Instructor entity: availability and course qualifications.
//!
//! # Reference
//! Grounded on `models/resource.rs`'s `Skill`/`Resource` builder idiom,
//! specialized to `(course_code, course_type)` qualifications per the spec.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::course::CourseKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub instructor_id: String,
    pub available_quanta: BTreeSet<usize>,
    pub qualifications: HashSet<CourseKey>,
}

impl Instructor {
    pub fn new(instructor_id: impl Into<String>) -> Self {
        Self {
            instructor_id: instructor_id.into(),
            available_quanta: BTreeSet::new(),
            qualifications: HashSet::new(),
        }
    }

    pub fn with_availability(mut self, quanta: impl IntoIterator<Item = usize>) -> Self {
        self.available_quanta = quanta.into_iter().collect();
        self
    }

    pub fn with_qualifications(mut self, keys: impl IntoIterator<Item = CourseKey>) -> Self {
        self.qualifications = keys.into_iter().collect();
        self
    }

    pub fn is_qualified_for(&self, key: &CourseKey) -> bool {
        self.qualifications.contains(key)
    }

    pub fn is_available(&self, q: usize) -> bool {
        self.available_quanta.contains(&q)
    }
}
