//! Scheduling context: the immutable bundle of entities and QTS passed to
//! every operator (seeder, constraints, operators, repairs, fitness).
//!
//! # Reference
//! Grounded on `dispatching/context.rs`'s `SchedulingContext` builder idiom,
//! generalized from runtime simulation state to a static, load-time bundle.

use std::collections::HashMap;

use crate::domain::{Course, CourseKey, Group, Instructor, Room};
use crate::qts::QuantumTimeSystem;

/// Immutable, shared-for-the-run bundle of domain entities and the time grid.
///
/// Entities are indexed by id/key for O(1) lookup from constraints and
/// operators; `Context` itself is cheap to share by reference across the
/// parallel fitness-evaluation workers (§5 — read-only during a run).
#[derive(Debug)]
pub struct SchedulingContext {
    pub qts: QuantumTimeSystem,
    courses: HashMap<CourseKey, Course>,
    groups: HashMap<String, Group>,
    instructors: HashMap<String, Instructor>,
    rooms: HashMap<String, Room>,
}

impl SchedulingContext {
    pub fn new(
        qts: QuantumTimeSystem,
        courses: Vec<Course>,
        groups: Vec<Group>,
        instructors: Vec<Instructor>,
        rooms: Vec<Room>,
    ) -> Self {
        Self {
            qts,
            courses: courses.into_iter().map(|c| (c.key.clone(), c)).collect(),
            groups: groups.into_iter().map(|g| (g.group_id.clone(), g)).collect(),
            instructors: instructors
                .into_iter()
                .map(|i| (i.instructor_id.clone(), i))
                .collect(),
            rooms: rooms.into_iter().map(|r| (r.room_id.clone(), r)).collect(),
        }
    }

    pub fn course(&self, key: &CourseKey) -> Option<&Course> {
        self.courses.get(key)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn instructor(&self, id: &str) -> Option<&Instructor> {
        self.instructors.get(id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn instructors(&self) -> impl Iterator<Item = &Instructor> {
        self.instructors.values()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Total student count across a set of group ids (used by seeding/mutation
    /// for room-capacity checks). Unknown ids contribute zero.
    pub fn combined_student_count(&self, group_ids: &std::collections::BTreeSet<String>) -> u32 {
        group_ids
            .iter()
            .filter_map(|id| self.group(id))
            .map(|g| g.student_count)
            .sum()
    }
}
