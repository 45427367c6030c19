//! Two-Phase Seeder: builds an initial population of structurally-complete,
//! resource-assigned individuals.
//!
//! # Reference
//! Grounded on `scheduler/simple.rs`'s greedy "pick the earliest-available
//! candidate resource" heuristic, adapted from a single time axis to the
//! three-way (instructor, room, quantum) resource triple §4.3 requires, plus
//! a conflict map tracking what this individual has already committed to.

use std::collections::{HashMap, HashSet};

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GaConfig;
use crate::context::SchedulingContext;
use crate::domain::gene::GeneIdentity;
use crate::domain::SessionGene;
use crate::individual::{Individual, Population};
use crate::pairgen::WorkItem;

/// Tracks quanta already committed to each entity within the individual
/// currently being built, so phase 2 never double-books a resource it has
/// itself just assigned.
#[derive(Default)]
struct ConflictMap {
    instructor: HashMap<String, HashSet<usize>>,
    room: HashMap<String, HashSet<usize>>,
    group: HashMap<String, HashSet<usize>>,
    instructor_load: HashMap<String, u32>,
}

impl ConflictMap {
    fn is_free(&self, instructor_id: &str, room_id: &str, group_ids: &[&String], q: usize) -> bool {
        if self.instructor.get(instructor_id).is_some_and(|s| s.contains(&q)) {
            return false;
        }
        if self.room.get(room_id).is_some_and(|s| s.contains(&q)) {
            return false;
        }
        group_ids
            .iter()
            .all(|g| !self.group.get(*g).is_some_and(|s| s.contains(&q)))
    }

    fn commit(&mut self, instructor_id: &str, room_id: &str, group_ids: &[&String], q: usize) {
        self.instructor.entry(instructor_id.to_string()).or_default().insert(q);
        self.room.entry(room_id.to_string()).or_default().insert(q);
        for g in group_ids {
            self.group.entry((*g).clone()).or_default().insert(q);
        }
        *self.instructor_load.entry(instructor_id.to_string()).or_insert(0) += 1;
    }
}

/// Builds `config.pop_size` individuals via the two-phase process.
pub fn seed_population(
    context: &SchedulingContext,
    pairs: &[WorkItem],
    config: &GaConfig,
    rng: &mut impl Rng,
) -> Population {
    let individuals = (0..config.pop_size)
        .map(|_| seed_individual(context, pairs, rng))
        .collect();
    Population::new(individuals)
}

/// Builds one individual: phase-1 skeleton genes, then phase-2 greedy
/// resource assignment.
pub fn seed_individual(context: &SchedulingContext, pairs: &[WorkItem], rng: &mut impl Rng) -> Individual {
    let mut genes = Vec::new();
    for pair in pairs {
        for _ in 0..pair.required_quanta {
            genes.push(SessionGene::placeholder(GeneIdentity::new(
                pair.course_key.clone(),
                pair.group_ids.iter().cloned(),
            )));
        }
    }

    let mut conflicts = ConflictMap::default();
    for gene in &mut genes {
        resolve_gene(context, gene, &mut conflicts, rng);
    }

    Individual::new(genes)
}

fn resolve_gene(context: &SchedulingContext, gene: &mut SessionGene, conflicts: &mut ConflictMap, rng: &mut impl Rng) {
    let group_ids: Vec<&String> = gene.group_ids().iter().collect();
    let Some(course) = context.course(gene.course_key()) else {
        warn!(
            "seeder: no course entry for {:?}, leaving gene unresolved",
            gene.course_key()
        );
        fallback_quantum(context, gene, rng);
        return;
    };

    let mut instructor_candidates: Vec<&str> = course
        .qualified_instructors
        .iter()
        .map(String::as_str)
        .filter(|id| context.instructor(id).is_some())
        .collect();
    instructor_candidates.sort_by_key(|id| conflicts.instructor_load.get(*id).copied().unwrap_or(0));

    let student_count = context.combined_student_count(gene.group_ids());
    let mut room_candidates: Vec<&str> = context
        .rooms()
        .filter(|r| r.satisfies(&course.required_room_type) && r.capacity >= student_count.max(1))
        .map(|r| r.room_id.as_str())
        .collect();
    if room_candidates.is_empty() {
        // Fallback: any room meeting capacity, ignoring type, per §4.3.
        room_candidates = context
            .rooms()
            .filter(|r| r.capacity >= student_count.max(1))
            .map(|r| r.room_id.as_str())
            .collect();
    }
    room_candidates.shuffle(rng);

    for &instructor_id in &instructor_candidates {
        let Some(instructor) = context.instructor(instructor_id) else {
            continue;
        };
        for &room_id in &room_candidates {
            let Some(room) = context.room(room_id) else {
                continue;
            };
            if let Some(q) = find_free_quantum(context, instructor, room, &group_ids, conflicts, rng) {
                conflicts.commit(instructor_id, room_id, &group_ids, q);
                gene.instructor_id = Some(instructor_id.to_string());
                gene.room_id = Some(room_id.to_string());
                gene.set_quanta(vec![q]);
                return;
            }
        }
    }

    warn!(
        "seeder: no conflict-free resource triple for {:?}, falling back to random placement",
        gene.course_key()
    );
    gene.instructor_id = instructor_candidates.first().map(|s| s.to_string());
    gene.room_id = room_candidates.first().map(|s| s.to_string());
    fallback_quantum(context, gene, rng);
}

fn find_free_quantum(
    context: &SchedulingContext,
    instructor: &crate::domain::Instructor,
    room: &crate::domain::Room,
    group_ids: &[&String],
    conflicts: &ConflictMap,
    rng: &mut impl Rng,
) -> Option<usize> {
    let mut candidates: Vec<usize> = instructor
        .available_quanta
        .iter()
        .copied()
        .filter(|q| room.is_available(*q))
        .filter(|q| {
            group_ids
                .iter()
                .all(|g| context.group(g).is_some_and(|grp| grp.is_available(*q)))
        })
        .collect();
    candidates.shuffle(rng);
    candidates
        .into_iter()
        .find(|&q| conflicts.is_free(&instructor.instructor_id, &room.room_id, group_ids, q))
}

/// Last-resort placement: a uniformly random operational quantum, leaving
/// violations for the constraint registry and repair pipeline to surface
/// and fix rather than failing the seed.
fn fallback_quantum(context: &SchedulingContext, gene: &mut SessionGene, rng: &mut impl Rng) {
    let total = context.qts.total_quanta();
    if total == 0 {
        gene.set_quanta(Vec::new());
        return;
    }
    let q = rng.random_range(0..total);
    gene.set_quanta(vec![q]);
}
