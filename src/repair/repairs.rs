//! The seven named repairs (§4.7), applied in priority order by
//! [`crate::repair::registry::RepairRegistry`].
//!
//! # Reference
//! Grounded on the same `dispatching/rules/mod.rs` one-struct-per-rule idiom
//! as `constraints/hard.rs`, generalized from pure evaluation to in-place
//! mutation of one individual.

use std::collections::{BTreeSet, HashMap};

use rand::RngCore;

use crate::domain::gene::GeneIdentity;
use crate::domain::SessionGene;
use crate::individual::Individual;
use crate::repair::registry::{Repair, RepairContext};

/// Per-entity occupied-quanta map, built fresh from the individual's current
/// genes, excluding one gene index (the one a repair is about to move).
fn occupancy_excluding<F>(genes: &[SessionGene], skip: usize, key_fn: F) -> HashMap<String, BTreeSet<usize>>
where
    F: Fn(&SessionGene) -> Vec<String>,
{
    let mut map: HashMap<String, BTreeSet<usize>> = HashMap::new();
    for (i, gene) in genes.iter().enumerate() {
        if i == skip {
            continue;
        }
        for key in key_fn(gene) {
            map.entry(key).or_default().extend(gene.quanta.iter().copied());
        }
    }
    map
}

fn instructor_key(gene: &SessionGene) -> Vec<String> {
    gene.instructor_id.clone().into_iter().collect()
}

fn room_key(gene: &SessionGene) -> Vec<String> {
    gene.room_id.clone().into_iter().collect()
}

fn group_keys(gene: &SessionGene) -> Vec<String> {
    gene.group_ids().iter().cloned().collect()
}

/// First quantum (ascending) free for `instructor_id`/`room_id`/`group_ids`
/// against the supplied occupancy snapshots and the context's availability
/// sets, excluding `exclude` (the gene's own remaining quanta). `None`
/// entity ids are treated as trivially free.
#[allow(clippy::too_many_arguments)]
fn free_quantum_for(
    context: &crate::context::SchedulingContext,
    instructor_id: Option<&str>,
    room_id: Option<&str>,
    group_ids: &BTreeSet<String>,
    instructor_occ: &HashMap<String, BTreeSet<usize>>,
    room_occ: &HashMap<String, BTreeSet<usize>>,
    group_occ: &HashMap<String, BTreeSet<usize>>,
    exclude: &BTreeSet<usize>,
) -> Option<usize> {
    (0..context.qts.total_quanta()).find(|q| {
        if exclude.contains(q) {
            return false;
        }
        if let Some(id) = instructor_id {
            let available = context.instructor(id).is_some_and(|i| i.is_available(*q));
            let free = !instructor_occ.get(id).is_some_and(|s| s.contains(q));
            if !available || !free {
                return false;
            }
        }
        if let Some(id) = room_id {
            let available = context.room(id).is_some_and(|r| r.is_available(*q));
            let free = !room_occ.get(id).is_some_and(|s| s.contains(q));
            if !available || !free {
                return false;
            }
        }
        group_ids.iter().all(|g| {
            let available = context.group(g).is_some_and(|grp| grp.is_available(*q));
            let free = !group_occ.get(g).is_some_and(|s| s.contains(q));
            available && free
        })
    })
}

/// Stable-ordered `(entity_id, quantum) -> gene indices` conflict groups,
/// keyed by whichever entity `key_fn` extracts from a gene.
fn conflicts_by<F>(genes: &[SessionGene], key_fn: F) -> Vec<(String, usize, Vec<usize>)>
where
    F: Fn(&SessionGene) -> Vec<String>,
{
    let mut by_key: HashMap<(String, usize), Vec<usize>> = HashMap::new();
    for (i, gene) in genes.iter().enumerate() {
        for key in key_fn(gene) {
            for &q in &gene.quanta {
                by_key.entry((key.clone(), q)).or_default().push(i);
            }
        }
    }
    let mut conflicts: Vec<(String, usize, Vec<usize>)> = by_key
        .into_iter()
        .filter(|(_, idxs)| idxs.len() > 1)
        .map(|((key, q), idxs)| (key, q, idxs))
        .collect();
    conflicts.sort();
    conflicts
}

/// Shared shape for `group_overlaps`/`instructor_conflicts`: keep the first
/// (index-ascending) gene occupying a conflicting `(entity, quantum)`, shift
/// every other gene's occupation of that quantum to a free one.
fn repair_entity_overlap<F>(individual: &mut Individual, context: &crate::context::SchedulingContext, key_fn: F) -> usize
where
    F: Fn(&SessionGene) -> Vec<String>,
{
    let mut fixes = 0;
    for (_, q, idxs) in conflicts_by(&individual.genes, &key_fn) {
        for &idx in idxs.iter().skip(1) {
            if !individual.genes[idx].quanta.contains(&q) {
                continue; // already resolved by an earlier shift this pass
            }
            let instructor_occ = occupancy_excluding(&individual.genes, idx, instructor_key);
            let room_occ = occupancy_excluding(&individual.genes, idx, room_key);
            let group_occ = occupancy_excluding(&individual.genes, idx, group_keys);

            let gene = &individual.genes[idx];
            let exclude: BTreeSet<usize> = gene.quanta.iter().copied().filter(|&x| x != q).collect();
            let candidate = free_quantum_for(
                context,
                gene.instructor_id.as_deref(),
                gene.room_id.as_deref(),
                gene.group_ids(),
                &instructor_occ,
                &room_occ,
                &group_occ,
                &exclude,
            );

            if let Some(new_q) = candidate {
                let gene = &mut individual.genes[idx];
                let mut quanta = gene.quanta.clone();
                if let Some(pos) = quanta.iter().position(|&x| x == q) {
                    quanta[pos] = new_q;
                }
                gene.set_quanta(quanta);
                fixes += 1;
            }
        }
    }
    fixes
}

/// Priority 1: for every `(group, quantum)` conflict, keep one gene and
/// shift the rest to a free slot satisfying its instructor/room/groups.
#[derive(Debug)]
pub struct GroupOverlapRepair;
impl Repair for GroupOverlapRepair {
    fn name(&self) -> &'static str {
        "group_overlaps"
    }
    fn apply(&self, individual: &mut Individual, ctx: &RepairContext, _rng: &mut dyn RngCore) -> usize {
        repair_entity_overlap(individual, ctx.context, group_keys)
    }
}

/// Priority 3: symmetric to `group_overlaps`, keyed on instructor.
#[derive(Debug)]
pub struct InstructorConflictRepair;
impl Repair for InstructorConflictRepair {
    fn name(&self) -> &'static str {
        "instructor_conflicts"
    }
    fn apply(&self, individual: &mut Individual, ctx: &RepairContext, _rng: &mut dyn RngCore) -> usize {
        repair_entity_overlap(individual, ctx.context, instructor_key)
    }
}

/// Priority 2: for `(room, quantum)` conflicts, try shifting time first
/// (preserving the room), then swapping to another suitable room, then both.
#[derive(Debug)]
pub struct RoomConflictRepair;
impl Repair for RoomConflictRepair {
    fn name(&self) -> &'static str {
        "room_conflicts"
    }
    fn apply(&self, individual: &mut Individual, ctx: &RepairContext, _rng: &mut dyn RngCore) -> usize {
        let mut fixes = 0;
        for (_, q, idxs) in conflicts_by(&individual.genes, room_key) {
            for &idx in idxs.iter().skip(1) {
                if !individual.genes[idx].quanta.contains(&q) {
                    continue;
                }
                if try_shift_time(individual, ctx, idx, q) {
                    fixes += 1;
                    continue;
                }
                if try_swap_room(individual, ctx, idx) {
                    fixes += 1;
                    continue;
                }
                if try_shift_time(individual, ctx, idx, q) {
                    fixes += 1;
                }
            }
        }
        fixes
    }
}

fn try_shift_time(individual: &mut Individual, ctx: &RepairContext, idx: usize, q: usize) -> bool {
    let instructor_occ = occupancy_excluding(&individual.genes, idx, instructor_key);
    let room_occ = occupancy_excluding(&individual.genes, idx, room_key);
    let group_occ = occupancy_excluding(&individual.genes, idx, group_keys);

    let gene = &individual.genes[idx];
    let exclude: BTreeSet<usize> = gene.quanta.iter().copied().filter(|&x| x != q).collect();
    let candidate = free_quantum_for(
        ctx.context,
        gene.instructor_id.as_deref(),
        gene.room_id.as_deref(),
        gene.group_ids(),
        &instructor_occ,
        &room_occ,
        &group_occ,
        &exclude,
    );

    match candidate {
        Some(new_q) => {
            let gene = &mut individual.genes[idx];
            let mut quanta = gene.quanta.clone();
            if let Some(pos) = quanta.iter().position(|&x| x == q) {
                quanta[pos] = new_q;
            }
            gene.set_quanta(quanta);
            true
        }
        None => false,
    }
}

fn try_swap_room(individual: &mut Individual, ctx: &RepairContext, idx: usize) -> bool {
    let Some(course) = ctx.context.course(individual.genes[idx].course_key()) else {
        return false;
    };
    let student_count = ctx.context.combined_student_count(individual.genes[idx].group_ids());

    let mut candidates: Vec<String> = ctx
        .context
        .rooms()
        .filter(|r| r.satisfies(&course.required_room_type) && r.capacity >= student_count.max(1))
        .map(|r| r.room_id.clone())
        .collect();
    candidates.sort();

    let room_occ = occupancy_excluding(&individual.genes, idx, room_key);
    let quanta = individual.genes[idx].quanta.clone();
    for room_id in candidates {
        if room_id == individual.genes[idx].room_id.clone().unwrap_or_default() {
            continue;
        }
        let free = quanta.iter().all(|q| {
            ctx.context.room(&room_id).is_some_and(|r| r.is_available(*q)) && !room_occ.get(&room_id).is_some_and(|s| s.contains(q))
        });
        if free {
            individual.genes[idx].room_id = Some(room_id);
            return true;
        }
    }
    false
}

/// Priority 4: reassign an unqualified (or missing) instructor to a
/// qualified, non-conflicting one.
#[derive(Debug)]
pub struct InstructorQualificationRepair;
impl Repair for InstructorQualificationRepair {
    fn name(&self) -> &'static str {
        "instructor_qualifications"
    }
    fn apply(&self, individual: &mut Individual, ctx: &RepairContext, _rng: &mut dyn RngCore) -> usize {
        let mut fixes = 0;
        for idx in 0..individual.genes.len() {
            let still_qualified = individual.genes[idx]
                .instructor_id
                .as_deref()
                .and_then(|id| ctx.context.instructor(id))
                .is_some_and(|i| i.is_qualified_for(individual.genes[idx].course_key()));
            if still_qualified {
                continue;
            }
            let Some(course) = ctx.context.course(individual.genes[idx].course_key()) else {
                continue;
            };
            let mut qualified: Vec<String> = course.qualified_instructors.clone();
            qualified.sort();

            let instructor_occ = occupancy_excluding(&individual.genes, idx, instructor_key);
            let quanta = individual.genes[idx].quanta.clone();
            for instructor_id in qualified {
                let free = quanta.iter().all(|q| {
                    ctx.context.instructor(&instructor_id).is_some_and(|i| i.is_available(*q))
                        && !instructor_occ.get(&instructor_id).is_some_and(|s| s.contains(q))
                });
                if free {
                    individual.genes[idx].instructor_id = Some(instructor_id);
                    fixes += 1;
                    break;
                }
            }
        }
        fixes
    }
}

/// Priority 5: reassign to a room whose type satisfies the course.
#[derive(Debug)]
pub struct RoomTypeMismatchRepair;
impl Repair for RoomTypeMismatchRepair {
    fn name(&self) -> &'static str {
        "room_type_mismatches"
    }
    fn apply(&self, individual: &mut Individual, ctx: &RepairContext, _rng: &mut dyn RngCore) -> usize {
        let mut fixes = 0;
        for idx in 0..individual.genes.len() {
            let Some(course) = ctx.context.course(individual.genes[idx].course_key()) else {
                continue;
            };
            let satisfies = individual.genes[idx]
                .room_id
                .as_deref()
                .and_then(|id| ctx.context.room(id))
                .is_some_and(|r| r.satisfies(&course.required_room_type));
            if satisfies {
                continue;
            }

            let student_count = ctx.context.combined_student_count(individual.genes[idx].group_ids());
            let mut candidates: Vec<String> = ctx
                .context
                .rooms()
                .filter(|r| r.satisfies(&course.required_room_type) && r.capacity >= student_count.max(1))
                .map(|r| r.room_id.clone())
                .collect();
            candidates.sort();

            let room_occ = occupancy_excluding(&individual.genes, idx, room_key);
            let quanta = individual.genes[idx].quanta.clone();
            for room_id in candidates {
                let free = quanta.iter().all(|q| {
                    ctx.context.room(&room_id).is_some_and(|r| r.is_available(*q)) && !room_occ.get(&room_id).is_some_and(|s| s.contains(q))
                });
                if free {
                    individual.genes[idx].room_id = Some(room_id);
                    fixes += 1;
                    break;
                }
            }
        }
        fixes
    }
}

/// Priority 6: find isolated length-1 genes and extend each by one adjacent
/// quantum (same day) that is free for its own instructor, room, and every
/// enrolled group.
#[derive(Debug)]
pub struct SessionClusteringRepair;
impl Repair for SessionClusteringRepair {
    fn name(&self) -> &'static str {
        "session_clustering"
    }
    fn apply(&self, individual: &mut Individual, ctx: &RepairContext, _rng: &mut dyn RngCore) -> usize {
        let mut fixes = 0;
        for idx in 0..individual.genes.len() {
            if individual.genes[idx].quanta.len() != 1 {
                continue;
            }
            let q = individual.genes[idx].quanta[0];
            let Ok(day) = ctx.context.qts.quantum_to_day(q) else {
                continue;
            };

            let instructor_occ = occupancy_excluding(&individual.genes, idx, instructor_key);
            let room_occ = occupancy_excluding(&individual.genes, idx, room_key);
            let group_occ = occupancy_excluding(&individual.genes, idx, group_keys);

            let gene = &individual.genes[idx];
            let candidates = [q.checked_sub(1), q.checked_add(1)];
            let extension = candidates.into_iter().flatten().find(|&qn| {
                ctx.context.qts.quantum_to_day(qn).ok() == Some(day)
                    && is_free_for_gene(ctx.context, gene, qn, &instructor_occ, &room_occ, &group_occ)
            });

            if let Some(qn) = extension {
                let mut quanta = individual.genes[idx].quanta.clone();
                quanta.push(qn);
                quanta.sort_unstable();
                individual.genes[idx].set_quanta(quanta);
                fixes += 1;
            }
        }
        fixes
    }
}

/// Whether quantum `q` is free for `gene`'s own instructor/room/groups,
/// against occupancy snapshots that already exclude the gene itself.
fn is_free_for_gene(
    context: &crate::context::SchedulingContext,
    gene: &SessionGene,
    q: usize,
    instructor_occ: &HashMap<String, BTreeSet<usize>>,
    room_occ: &HashMap<String, BTreeSet<usize>>,
    group_occ: &HashMap<String, BTreeSet<usize>>,
) -> bool {
    if let Some(id) = gene.instructor_id.as_deref() {
        let available = context.instructor(id).is_some_and(|i| i.is_available(q));
        let free = !instructor_occ.get(id).is_some_and(|s| s.contains(&q));
        if !available || !free {
            return false;
        }
    }
    if let Some(id) = gene.room_id.as_deref() {
        let available = context.room(id).is_some_and(|r| r.is_available(q));
        let free = !room_occ.get(id).is_some_and(|s| s.contains(&q));
        if !available || !free {
            return false;
        }
    }
    gene.group_ids().iter().all(|g| {
        let available = context.group(g).is_some_and(|grp| grp.is_available(q));
        let free = !group_occ.get(g).is_some_and(|s| s.contains(&q));
        available && free
    })
}

/// Priority 7: the only length-changing repair. Adds synthesized genes for
/// `(course_key, group)` work the pair generator requires but the individual
/// under-schedules; trims the smallest genes of any identity it
/// over-schedules (or drops identities the pair generator never produced).
#[derive(Debug)]
pub struct IncompleteOrExtraSessionsRepair;
impl Repair for IncompleteOrExtraSessionsRepair {
    fn name(&self) -> &'static str {
        "incomplete_or_extra_sessions"
    }
    fn apply(&self, individual: &mut Individual, ctx: &RepairContext, _rng: &mut dyn RngCore) -> usize {
        let mut fixes = 0;

        let mut by_identity: HashMap<GeneIdentity, Vec<usize>> = HashMap::new();
        for (i, gene) in individual.genes.iter().enumerate() {
            by_identity.entry(gene.identity.clone()).or_default().push(i);
        }

        let reference: std::collections::HashSet<GeneIdentity> = ctx
            .pairs
            .iter()
            .map(|p| GeneIdentity::new(p.course_key.clone(), p.group_ids.iter().cloned()))
            .collect();

        // Drop every gene under an identity the pair generator never produced.
        let mut to_remove: Vec<usize> = Vec::new();
        for (identity, idxs) in &by_identity {
            if !reference.contains(identity) {
                to_remove.extend(idxs.iter().copied());
                fixes += idxs.len();
            }
        }

        // Trim excess / fill deficit for every reference pair.
        let mut new_genes: Vec<SessionGene> = Vec::new();
        for pair in ctx.pairs {
            let identity = GeneIdentity::new(pair.course_key.clone(), pair.group_ids.iter().cloned());
            let idxs = by_identity.get(&identity).cloned().unwrap_or_default();
            let scheduled: usize = idxs.iter().map(|&i| individual.genes[i].quanta.len()).sum();

            if scheduled > pair.required_quanta {
                let mut excess = scheduled - pair.required_quanta;
                let mut ordered = idxs.clone();
                ordered.sort_by_key(|&i| (individual.genes[i].quanta.len(), i));
                for i in ordered {
                    if excess == 0 {
                        break;
                    }
                    if to_remove.contains(&i) {
                        continue;
                    }
                    let len = individual.genes[i].quanta.len();
                    if len <= excess {
                        to_remove.push(i);
                        excess -= len;
                        fixes += 1;
                    } else {
                        let keep = len - excess;
                        let mut q = individual.genes[i].quanta.clone();
                        q.truncate(keep);
                        individual.genes[i].set_quanta(q);
                        excess = 0;
                        fixes += 1;
                    }
                }
            } else if scheduled < pair.required_quanta {
                let deficit = pair.required_quanta - scheduled;
                let already: BTreeSet<usize> = idxs
                    .iter()
                    .flat_map(|&i| individual.genes[i].quanta.iter().copied())
                    .collect();
                let picked = pick_available_quanta(ctx.context, &pair.group_ids, deficit, &already);
                if !picked.is_empty() {
                    let mut gene = SessionGene::placeholder(identity);
                    gene.set_quanta(picked);
                    new_genes.push(gene);
                    fixes += 1;
                }
            }
        }

        to_remove.sort_unstable();
        to_remove.dedup();
        for &idx in to_remove.iter().rev() {
            individual.genes.remove(idx);
        }
        individual.genes.extend(new_genes);

        fixes
    }
}

fn pick_available_quanta(
    context: &crate::context::SchedulingContext,
    group_ids: &BTreeSet<String>,
    needed: usize,
    already: &BTreeSet<usize>,
) -> Vec<usize> {
    (0..context.qts.total_quanta())
        .filter(|q| !already.contains(q))
        .filter(|q| group_ids.iter().all(|g| context.group(g).is_none_or(|grp| grp.is_available(*q))))
        .take(needed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaConfig;
    use crate::context::SchedulingContext;
    use crate::domain::course::{CourseKey, SessionType};
    use crate::domain::{Course, Group, Instructor, Room};
    use crate::pairgen::WorkItem;
    use crate::qts::{OperationalDay, QuantumTimeSystem};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn gene(code: &str, group: &str, instructor: Option<&str>, room: Option<&str>, quanta: Vec<usize>) -> SessionGene {
        let mut g = SessionGene::placeholder(GeneIdentity::new(CourseKey::new(code, SessionType::Theory), [group.to_string()]));
        g.instructor_id = instructor.map(String::from);
        g.room_id = room.map(String::from);
        g.set_quanta(quanta);
        g
    }

    fn scenario_c() -> (SchedulingContext, Vec<WorkItem>, GaConfig) {
        let qts = QuantumTimeSystem::new(vec![OperationalDay::new("Monday", 0, 240)], 30).unwrap();
        let c1 = CourseKey::new("C1", SessionType::Theory);
        let c2 = CourseKey::new("C2", SessionType::Theory);
        let course1 = Course::new(c1.clone(), 1, "lecture").with_qualified_instructors(vec!["I1".into()]);
        let course2 = Course::new(c2.clone(), 1, "lecture").with_qualified_instructors(vec!["I2".into()]);
        let group = Group::new("G", 20).with_availability(0..8).with_courses(vec!["C1".into(), "C2".into()]);
        let i1 = Instructor::new("I1").with_availability(0..8).with_qualifications([c1]);
        let i2 = Instructor::new("I2").with_availability(0..8).with_qualifications([c2]);
        let room = Room::new("R", 30, "lecture").with_availability(0..8);
        let context = SchedulingContext::new(qts, vec![course1, course2], vec![group], vec![i1, i2], vec![room]);
        let pairs = crate::pairgen::generate_pairs(&context);
        (context, pairs, GaConfig::default())
    }

    #[test]
    fn test_group_overlap_repair_shifts_conflicting_gene() {
        let (context, pairs, config) = scenario_c();
        let genes = vec![
            gene("C1", "G", Some("I1"), Some("R"), vec![0]),
            gene("C2", "G", Some("I2"), Some("R"), vec![0]),
        ];
        let mut ind = Individual::new(genes);
        let ctx = RepairContext {
            context: &context,
            config: &config,
            pairs: &pairs,
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let fixes = GroupOverlapRepair.apply(&mut ind, &ctx, &mut rng);
        assert_eq!(fixes, 1);
        assert_ne!(ind.genes[0].quanta, ind.genes[1].quanta);
    }

    #[test]
    fn test_instructor_qualification_repair_reassigns() {
        let (context, pairs, config) = scenario_c();
        let genes = vec![gene("C1", "G", Some("I2"), Some("R"), vec![0])]; // I2 not qualified for C1
        let mut ind = Individual::new(genes);
        let ctx = RepairContext {
            context: &context,
            config: &config,
            pairs: &pairs,
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let fixes = InstructorQualificationRepair.apply(&mut ind, &ctx, &mut rng);
        assert_eq!(fixes, 1);
        assert_eq!(ind.genes[0].instructor_id.as_deref(), Some("I1"));
    }

    #[test]
    fn test_room_type_mismatch_repair_reassigns() {
        let qts = QuantumTimeSystem::new(vec![OperationalDay::new("M", 0, 120)], 30).unwrap();
        let key = CourseKey::new("C", SessionType::Practical);
        let course = Course::new(key, 1, "practical");
        let lecture_room = Room::new("R_lec", 30, "lecture").with_availability(0..4);
        let lab_room = Room::new("R_lab", 30, "lab").with_availability(0..4);
        let group = Group::new("G", 20).with_availability(0..4);
        let context = SchedulingContext::new(qts, vec![course], vec![group], vec![], vec![lecture_room, lab_room]);
        let config = GaConfig::default();
        let pairs = vec![];

        let genes = vec![gene("C", "G", None, Some("R_lec"), vec![0])];
        let mut ind = Individual::new(genes);
        let ctx = RepairContext {
            context: &context,
            config: &config,
            pairs: &pairs,
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let fixes = RoomTypeMismatchRepair.apply(&mut ind, &ctx, &mut rng);
        assert_eq!(fixes, 1);
        assert_eq!(ind.genes[0].room_id.as_deref(), Some("R_lab"));
    }

    #[test]
    fn test_session_clustering_extends_isolated_genes_into_free_adjacent_quanta() {
        // Three operational days of 2 quanta each: day0=[0,1], day1=[2,3],
        // day2=[4,5]. A single identity owns three length-1 genes, one per
        // day, each with a free same-day neighbor.
        let qts = QuantumTimeSystem::new(
            vec![
                OperationalDay::new("Mon", 0, 60),
                OperationalDay::new("Tue", 0, 60),
                OperationalDay::new("Wed", 0, 60),
            ],
            30,
        )
        .unwrap();
        let key = CourseKey::new("C", SessionType::Theory);
        let course = Course::new(key.clone(), 3, "lecture").with_qualified_instructors(vec!["I".into()]);
        let group = Group::new("G", 20).with_availability(0..6).with_courses(vec!["C".into()]);
        let instructor = Instructor::new("I").with_availability(0..6).with_qualifications([key]);
        let room = Room::new("R", 30, "lecture").with_availability(0..6);
        let context = SchedulingContext::new(qts, vec![course], vec![group], vec![instructor], vec![room]);
        let config = GaConfig::default();
        let pairs = vec![];

        let genes = vec![
            gene("C", "G", Some("I"), Some("R"), vec![0]),
            gene("C", "G", Some("I"), Some("R"), vec![2]),
            gene("C", "G", Some("I"), Some("R"), vec![5]),
        ];
        let mut ind = Individual::new(genes);
        let ctx = RepairContext {
            context: &context,
            config: &config,
            pairs: &pairs,
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let fixes = SessionClusteringRepair.apply(&mut ind, &ctx, &mut rng);
        assert!(fixes >= 1);
        assert_eq!(ind.genes.len(), 3); // length-changing is not this repair's job
        assert!(ind.genes.iter().any(|g| g.quanta.len() == 2));
    }

    #[test]
    fn test_incomplete_sessions_repair_fills_deficit() {
        let (context, pairs, config) = scenario_c();
        // Only C1 scheduled; C2's required session is entirely missing.
        let genes = vec![gene("C1", "G", Some("I1"), Some("R"), vec![0])];
        let mut ind = Individual::new(genes);
        let ctx = RepairContext {
            context: &context,
            config: &config,
            pairs: &pairs,
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let fixes = IncompleteOrExtraSessionsRepair.apply(&mut ind, &ctx, &mut rng);
        assert_eq!(fixes, 1);
        assert_eq!(ind.genes.len(), 2);
        assert!(ind.genes.iter().any(|g| g.course_key().course_code == "C2"));
    }

    #[test]
    fn test_incomplete_sessions_repair_keys_by_course_key_not_bare_code() {
        // X/theory and X/practical share course_code "X" but are distinct
        // identities; fully scheduling both must not be mistaken for excess
        // or deficit under either identity.
        let qts = QuantumTimeSystem::new(vec![OperationalDay::new("M", 0, 240)], 30).unwrap();
        let theory_key = CourseKey::new("X", SessionType::Theory);
        let practical_key = CourseKey::new("X", SessionType::Practical);
        let theory = Course::new(theory_key.clone(), 2, "lecture").with_qualified_instructors(vec!["I".into()]);
        let practical = Course::new(practical_key.clone(), 2, "practical").with_qualified_instructors(vec!["I".into()]);
        let group = Group::new("G", 20).with_availability(0..8).with_courses(vec!["X".into()]);
        let instructor = Instructor::new("I").with_availability(0..8).with_qualifications([theory_key.clone(), practical_key.clone()]);
        let room = Room::new("R", 30, "lecture").with_availability(0..8);
        let context = SchedulingContext::new(qts, vec![theory, practical], vec![group], vec![instructor], vec![room]);
        let pairs = crate::pairgen::generate_pairs(&context);
        let config = GaConfig::default();

        let mut genes = Vec::new();
        let mut t = SessionGene::placeholder(GeneIdentity::new(theory_key, ["G".to_string()]));
        t.instructor_id = Some("I".into());
        t.room_id = Some("R".into());
        t.set_quanta(vec![0, 1]);
        genes.push(t);
        let mut p = SessionGene::placeholder(GeneIdentity::new(practical_key, ["G".to_string()]));
        p.instructor_id = Some("I".into());
        p.room_id = Some("R".into());
        p.set_quanta(vec![2, 3]);
        genes.push(p);

        let mut ind = Individual::new(genes);
        let ctx = RepairContext {
            context: &context,
            config: &config,
            pairs: &pairs,
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let fixes = IncompleteOrExtraSessionsRepair.apply(&mut ind, &ctx, &mut rng);
        assert_eq!(fixes, 0);
        assert_eq!(ind.genes.len(), 2);
    }

    #[test]
    fn test_incomplete_sessions_repair_trims_excess() {
        let (context, pairs, config) = scenario_c();
        // C1 required=1 but scheduled twice.
        let genes = vec![
            gene("C1", "G", Some("I1"), Some("R"), vec![0]),
            gene("C1", "G", Some("I1"), Some("R"), vec![1]),
            gene("C2", "G", Some("I2"), Some("R"), vec![2]),
        ];
        let mut ind = Individual::new(genes);
        let ctx = RepairContext {
            context: &context,
            config: &config,
            pairs: &pairs,
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let fixes = IncompleteOrExtraSessionsRepair.apply(&mut ind, &ctx, &mut rng);
        assert!(fixes >= 1);
        let total_c1: usize = ind
            .genes
            .iter()
            .filter(|g| g.course_key().course_code == "C1")
            .map(|g| g.quanta.len())
            .sum();
        assert_eq!(total_c1, 1);
    }
}
