//! Room entity: capacity, availability, type, and the room-type compatibility table.
//!
//! # Reference
//! Grounded on `models/resource.rs`'s `ResourceType` enum and builder idiom.
//! The compatibility table resolves Open Question 3 in `SPEC_FULL.md` §9.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub capacity: u32,
    pub available_quanta: BTreeSet<usize>,
    /// Lowercased room type, e.g. `"lecture"`, `"practical"`, `"lab"`.
    pub room_type: String,
    pub features: Vec<String>,
}

impl Room {
    pub fn new(room_id: impl Into<String>, capacity: u32, room_type: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            capacity,
            available_quanta: BTreeSet::new(),
            room_type: room_type.into().to_lowercase(),
            features: Vec::new(),
        }
    }

    pub fn with_availability(mut self, quanta: impl IntoIterator<Item = usize>) -> Self {
        self.available_quanta = quanta.into_iter().collect();
        self
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    pub fn is_available(&self, q: usize) -> bool {
        self.available_quanta.contains(&q)
    }

    /// Whether this room's type satisfies `required_room_type`, per the
    /// compatibility table below.
    pub fn satisfies(&self, required_room_type: &str) -> bool {
        compatible_room_types(required_room_type).contains(&self.room_type.as_str())
    }
}

/// Explicit room-type compatibility table (resolves Open Question 3).
///
/// `lecture` accepts lecture-style rooms; `practical` accepts lab-style rooms.
/// An unrecognized required type is compatible only with an exact string match,
/// so unknown types degrade safely rather than silently accepting anything.
pub fn compatible_room_types(required: &str) -> &'static [&'static str] {
    match required.to_lowercase().as_str() {
        "lecture" => &["lecture", "classroom", "auditorium", "seminar"],
        "practical" => &["practical", "lab", "laboratory", "computer_lab"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lecture_compatibility() {
        let room = Room::new("R1", 30, "classroom");
        assert!(room.satisfies("lecture"));
        assert!(!room.satisfies("practical"));
    }

    #[test]
    fn test_practical_compatibility() {
        let room = Room::new("R2", 20, "computer_lab");
        assert!(room.satisfies("practical"));
        assert!(!room.satisfies("lecture"));
    }

    #[test]
    fn test_room_type_normalized_lowercase() {
        let room = Room::new("R3", 20, "LECTURE");
        assert_eq!(room.room_type, "lecture");
    }
}
