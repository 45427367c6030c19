//! Constraint-aware mutation (§4.6).
//!
//! # Reference
//! Grounded on `ga/chromosome.rs`'s `mav_mutation` (reassign one field to a
//! fresh valid candidate), generalized into three independently-biased
//! per-field mutators instead of one resource-only mutation.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::GaConfig;
use crate::context::SchedulingContext;
use crate::domain::SessionGene;
use crate::individual::Individual;

/// Mutates `individual` in place per §4.6: the whole individual is mutated
/// with probability `mut_indiv`; each of its genes then independently with
/// probability `mut_gene`.
pub fn mutate(individual: &mut Individual, context: &SchedulingContext, config: &GaConfig, rng: &mut impl Rng) {
    if !rng.random_bool(config.mut_indiv) {
        return;
    }

    let mut changed = false;
    for gene in &mut individual.genes {
        if !rng.random_bool(config.mut_gene) {
            continue;
        }
        mutate_gene(gene, context, config, rng);
        changed = true;
    }

    if changed {
        individual.invalidate_fitness();
    }
}

fn mutate_gene(gene: &mut SessionGene, context: &SchedulingContext, config: &GaConfig, rng: &mut impl Rng) {
    mutate_instructor(gene, context, config, rng);
    mutate_room(gene, context, config, rng);
    mutate_quanta(gene, context, config, rng);
}

/// Retain-qualified bias: keep the current instructor if still qualified;
/// otherwise draw from the qualified set; if that's empty, any instructor
/// (leaves a violation for the constraint registry to surface).
fn mutate_instructor(gene: &mut SessionGene, context: &SchedulingContext, config: &GaConfig, rng: &mut impl Rng) {
    if rng.random_bool(config.instructor_retain) {
        let still_qualified = gene
            .instructor_id
            .as_deref()
            .and_then(|id| context.instructor(id))
            .is_some_and(|i| i.is_qualified_for(gene.course_key()));
        if still_qualified {
            return;
        }
    }

    let Some(course) = context.course(gene.course_key()) else {
        return;
    };
    let qualified: Vec<&str> = course.qualified_instructors.iter().map(String::as_str).collect();
    let candidate = qualified
        .choose(rng)
        .copied()
        .or_else(|| context.instructors().next().map(|i| i.instructor_id.as_str()));
    gene.instructor_id = candidate.map(|s| s.to_string());
}

/// Retain-suitable bias: keep the current room if its type still satisfies
/// the course and capacity suffices; otherwise draw a matching room; if
/// none, any room.
fn mutate_room(gene: &mut SessionGene, context: &SchedulingContext, config: &GaConfig, rng: &mut impl Rng) {
    let Some(course) = context.course(gene.course_key()) else {
        return;
    };
    let student_count = context.combined_student_count(gene.group_ids());

    if rng.random_bool(config.room_retain) {
        let still_suitable = gene
            .room_id
            .as_deref()
            .and_then(|id| context.room(id))
            .is_some_and(|r| r.satisfies(&course.required_room_type) && r.capacity >= student_count.max(1));
        if still_suitable {
            return;
        }
    }

    let mut matching: Vec<&str> = context
        .rooms()
        .filter(|r| r.satisfies(&course.required_room_type) && r.capacity >= student_count.max(1))
        .map(|r| r.room_id.as_str())
        .collect();
    if matching.is_empty() {
        matching = context.rooms().map(|r| r.room_id.as_str()).collect();
    }
    gene.room_id = matching.choose(rng).map(|s| s.to_string());
}

/// Retain bias: keep current quanta, or reassign a fresh set of the same
/// length preferring consecutive runs within the intersection of
/// instructor/room/group availability; falls back to random operational
/// quanta after `max_quanta_reassign_attempts`.
fn mutate_quanta(gene: &mut SessionGene, context: &SchedulingContext, config: &GaConfig, rng: &mut impl Rng) {
    if rng.random_bool(config.quanta_retain) {
        return;
    }

    let needed = gene.quanta.len().max(1);
    let available = common_availability(gene, context);

    if let Some(run) = find_consecutive_run(&available, needed) {
        gene.set_quanta(run);
        return;
    }

    for _ in 0..config.max_quanta_reassign_attempts {
        if available.len() < needed {
            break;
        }
        let mut candidates = available.clone();
        candidates.sort_unstable();
        let chosen: Vec<usize> = {
            use rand::seq::SliceRandom;
            let mut shuffled = candidates.clone();
            shuffled.shuffle(rng);
            shuffled.into_iter().take(needed).collect()
        };
        if chosen.len() == needed {
            gene.set_quanta(chosen);
            return;
        }
    }

    // Fallback: random operational quanta, ignoring availability entirely.
    let total = context.qts.total_quanta();
    if total == 0 {
        return;
    }
    let fallback: Vec<usize> = (0..needed).map(|_| rng.random_range(0..total)).collect();
    gene.set_quanta(fallback);
}

fn common_availability(gene: &SessionGene, context: &SchedulingContext) -> Vec<usize> {
    let instructor_ok: Option<&std::collections::BTreeSet<usize>> =
        gene.instructor_id.as_deref().and_then(|id| context.instructor(id)).map(|i| &i.available_quanta);
    let room_ok: Option<&std::collections::BTreeSet<usize>> =
        gene.room_id.as_deref().and_then(|id| context.room(id)).map(|r| &r.available_quanta);

    (0..context.qts.total_quanta())
        .filter(|q| instructor_ok.is_none_or(|s| s.contains(q)))
        .filter(|q| room_ok.is_none_or(|s| s.contains(q)))
        .filter(|q| {
            gene.group_ids()
                .iter()
                .all(|g| context.group(g).is_none_or(|grp| grp.is_available(*q)))
        })
        .collect()
}

fn find_consecutive_run(available: &[usize], needed: usize) -> Option<Vec<usize>> {
    if available.is_empty() {
        return None;
    }
    let mut sorted = available.to_vec();
    sorted.sort_unstable();
    let mut run_start = 0;
    for i in 1..=sorted.len() {
        if i == sorted.len() || sorted[i] != sorted[i - 1] + 1 {
            let run_len = i - run_start;
            if run_len >= needed {
                return Some(sorted[run_start..run_start + needed].to_vec());
            }
            run_start = i;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{CourseKey, SessionType};
    use crate::domain::gene::GeneIdentity;
    use crate::domain::{Course, Group, Instructor, Room};
    use crate::qts::{OperationalDay, QuantumTimeSystem};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn context() -> SchedulingContext {
        let qts = QuantumTimeSystem::new(vec![OperationalDay::new("Monday", 0, 300)], 30).unwrap();
        let key = CourseKey::new("C", SessionType::Theory);
        let course = Course::new(key.clone(), 1, "lecture").with_qualified_instructors(vec!["I1".into(), "I2".into()]);
        let group = Group::new("G1", 10).with_availability(0..10);
        let i1 = Instructor::new("I1").with_availability(0..10).with_qualifications([key.clone()]);
        let i2 = Instructor::new("I2").with_availability(0..10).with_qualifications([key]);
        let room = Room::new("R1", 30, "lecture").with_availability(0..10);
        SchedulingContext::new(qts, vec![course], vec![group], vec![i1, i2], vec![room])
    }

    fn gene() -> SessionGene {
        let mut g = SessionGene::placeholder(GeneIdentity::new(
            CourseKey::new("C", SessionType::Theory),
            ["G1".to_string()],
        ));
        g.instructor_id = Some("I1".to_string());
        g.room_id = Some("R1".to_string());
        g.set_quanta(vec![0]);
        g
    }

    #[test]
    fn test_never_mutates_identity() {
        let ctx = context();
        let mut ind = Individual::new(vec![gene()]);
        let identity_before = ind.genes[0].identity.clone();
        let config = GaConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..20 {
            mutate(&mut ind, &ctx, &config, &mut rng);
        }
        assert_eq!(ind.genes[0].identity, identity_before);
    }

    #[test]
    fn test_instructor_stays_qualified_after_mutation() {
        let ctx = context();
        let mut ind = Individual::new(vec![gene()]);
        let mut config = GaConfig::default();
        config.instructor_retain = 0.0; // force reassignment every time
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..10 {
            mutate(&mut ind, &ctx, &config, &mut rng);
            let instructor_id = ind.genes[0].instructor_id.clone().unwrap();
            let instructor = ctx.instructor(&instructor_id).unwrap();
            assert!(instructor.is_qualified_for(ind.genes[0].course_key()));
        }
    }

    #[test]
    fn test_quanta_length_preserved() {
        let ctx = context();
        let mut ind = Individual::new(vec![gene()]);
        let mut config = GaConfig::default();
        config.quanta_retain = 0.0;
        config.mut_indiv = 1.0;
        config.mut_gene = 1.0;
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..10 {
            mutate(&mut ind, &ctx, &config, &mut rng);
            assert_eq!(ind.genes[0].quanta.len(), 1);
        }
    }
}
