//! UCTP domain entities: Course, Group, Instructor, Room, and the
//! `SessionGene` chromosomal unit.
//!
//! # Domain Mapping
//!
//! | uctp-evo | Meaning |
//! |----------|---------|
//! | Course | Course code/type variant requiring weekly quanta |
//! | Group | Student cohort (top-level or subgroup) |
//! | Instructor | Qualified, available teaching staff member |
//! | Room | Bookable space with type and capacity |
//! | SessionGene | One scheduled session: identity + resource assignment |

pub mod course;
pub mod gene;
pub mod group;
pub mod instructor;
pub mod room;

pub use course::{Course, CourseKey, SessionType};
pub use gene::{GeneIdentity, SessionGene};
pub use group::Group;
pub use instructor::Instructor;
pub use room::Room;
