//! Decoded, human-facing timetable types (§6).
//!
//! The engine itself never produces anything but an `Individual`; `decode`
//! is the one conversion boundary between the chromosome and a shape an
//! external reporter can render directly, without knowing about quanta.
//!
//! # Reference
//! Grounded on `models/schedule.rs`'s `Schedule`/`Assignment` shape, replacing
//! millisecond `start_ms`/`end_ms` with day-scoped `"HH:MM"` wall-clock ranges
//! produced by [`crate::qts::QuantumTimeSystem`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::course::CourseKey;
use crate::individual::Individual;
use crate::qts::QuantumTimeSystem;

/// One contiguous wall-clock block on a single operational day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub day_idx: usize,
    pub start: String,
    pub end: String,
}

/// One decoded session: a resolved gene, reported in wall-clock terms.
///
/// `time_ranges` may hold more than one entry when a course's weekly quanta
/// span non-contiguous days (e.g. a 4-quantum requirement split Mon/Wed);
/// quanta contiguous in time on the same day collapse into a single range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSession {
    pub course_key: CourseKey,
    pub group_ids: BTreeSet<String>,
    pub instructor_id: String,
    pub room_id: String,
    pub time_ranges: Vec<TimeRange>,
}

/// A fully decoded schedule: every resolved gene of one individual, reported
/// as wall-clock sessions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DecodedSchedule {
    pub sessions: Vec<CourseSession>,
}

/// Decodes `individual` against `qts`, merging each gene's `quanta` into
/// contiguous same-day ranges.
///
/// Unresolved genes (missing instructor/room, or invalid quanta) are skipped
/// rather than reported — an unresolved gene after evolution completes is
/// itself a hard-constraint violation already counted by the fitness
/// evaluator, not something the reporter should mask as a zero-length
/// session.
pub fn decode(individual: &Individual, qts: &QuantumTimeSystem) -> DecodedSchedule {
    let mut sessions = Vec::with_capacity(individual.genes.len());

    for gene in &individual.genes {
        let (Some(instructor_id), Some(room_id)) = (&gene.instructor_id, &gene.room_id) else {
            continue;
        };
        if !gene.has_valid_quanta() {
            continue;
        }

        let time_ranges = match merge_quanta(qts, &gene.quanta) {
            Ok(ranges) => ranges,
            Err(_) => continue,
        };

        sessions.push(CourseSession {
            course_key: gene.identity.course_key.clone(),
            group_ids: gene.identity.group_ids.clone(),
            instructor_id: instructor_id.clone(),
            room_id: room_id.clone(),
            time_ranges,
        });
    }

    DecodedSchedule { sessions }
}

/// Merges a strictly increasing quantum list into contiguous same-day ranges.
/// Two quanta merge when they are adjacent integers *and* fall on the same
/// operational day (adjacency across a day boundary is coincidental, not a
/// real contiguous block).
fn merge_quanta(qts: &QuantumTimeSystem, quanta: &[usize]) -> crate::error::Result<Vec<TimeRange>> {
    let mut ranges = Vec::new();
    let mut run_start = quanta[0];
    let mut run_end = quanta[0];

    for &q in &quanta[1..] {
        let same_day = qts.quantum_to_day(q)? == qts.quantum_to_day(run_end)?;
        if q == run_end + 1 && same_day {
            run_end = q;
        } else {
            ranges.push(close_range(qts, run_start, run_end)?);
            run_start = q;
            run_end = q;
        }
    }
    ranges.push(close_range(qts, run_start, run_end)?);
    Ok(ranges)
}

fn close_range(qts: &QuantumTimeSystem, start: usize, end: usize) -> crate::error::Result<TimeRange> {
    let (day_idx, start_wall) = qts.quantum_to_wall(start)?;
    let (_, end_wall) = qts.quantum_end_wall(end)?;
    Ok(TimeRange {
        day_idx,
        start: start_wall,
        end: end_wall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::SessionType;
    use crate::domain::gene::GeneIdentity;
    use crate::domain::SessionGene;
    use crate::qts::OperationalDay;

    fn two_day_qts() -> QuantumTimeSystem {
        QuantumTimeSystem::new(
            vec![
                OperationalDay::new("Monday", 480, 600),
                OperationalDay::new("Tuesday", 480, 600),
            ],
            30,
        )
        .unwrap()
    }

    fn resolved_gene(code: &str, quanta: Vec<usize>) -> SessionGene {
        let mut gene = SessionGene::placeholder(GeneIdentity::new(
            CourseKey::new(code, SessionType::Theory),
            ["G1".to_string()],
        ));
        gene.instructor_id = Some("I1".to_string());
        gene.room_id = Some("R1".to_string());
        gene.set_quanta(quanta);
        gene
    }

    #[test]
    fn test_contiguous_quanta_merge_into_one_range() {
        let qts = two_day_qts();
        let gene = resolved_gene("CS101", vec![0, 1, 2, 3]);
        let ind = Individual::new(vec![gene]);
        let decoded = decode(&ind, &qts);

        assert_eq!(decoded.sessions.len(), 1);
        let ranges = &decoded.sessions[0].time_ranges;
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start, "08:00");
        assert_eq!(ranges[0].end, "10:00");
    }

    #[test]
    fn test_quanta_spanning_days_do_not_merge_across_boundary() {
        let qts = two_day_qts();
        // Monday has 4 quanta (indices 0..4); Tuesday starts at 4.
        let gene = resolved_gene("CS101", vec![3, 4]);
        let ind = Individual::new(vec![gene]);
        let decoded = decode(&ind, &qts);

        let ranges = &decoded.sessions[0].time_ranges;
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].day_idx, 0);
        assert_eq!(ranges[1].day_idx, 1);
    }

    #[test]
    fn test_non_contiguous_quanta_on_same_day_produce_two_ranges() {
        let qts = two_day_qts();
        let gene = resolved_gene("CS101", vec![0, 1, 3]);
        let ind = Individual::new(vec![gene]);
        let decoded = decode(&ind, &qts);

        let ranges = &decoded.sessions[0].time_ranges;
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, "08:00");
        assert_eq!(ranges[0].end, "09:00");
        assert_eq!(ranges[1].start, "09:30");
        assert_eq!(ranges[1].end, "10:00");
    }

    #[test]
    fn test_unresolved_gene_is_skipped() {
        let qts = two_day_qts();
        let placeholder = SessionGene::placeholder(GeneIdentity::new(
            CourseKey::new("CS101", SessionType::Theory),
            ["G1".to_string()],
        ));
        let ind = Individual::new(vec![placeholder]);
        let decoded = decode(&ind, &qts);
        assert!(decoded.sessions.is_empty());
    }
}
