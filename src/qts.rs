//! Quantum Time System (QTS): a dense, operational-hours-only time grid.
//!
//! Wall-clock scheduling wastes index space on non-operational hours (nights,
//! weekends, lunch closures). QTS instead assigns every operational minute-slot
//! a contiguous index `q ∈ [0, T)`, so constraints and operators can speak
//! purely in terms of `q` and only derive day/wall-clock when reporting.
//!
//! # Reference
//! Grounded on `models/calendar.rs`'s `Calendar`/`TimeWindow` availability
//! idiom, specialized to dense quantum indexing per the distributed spec.

use crate::error::{Result, ScheduleError};

/// One operational day: a name and a contiguous wall-clock window, expressed
/// in minutes since midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalDay {
    /// Human-readable day name (e.g. "Monday").
    pub name: String,
    /// Start of the operational window, in minutes since midnight.
    pub start_minute: u32,
    /// End of the operational window (exclusive), in minutes since midnight.
    pub end_minute: u32,
}

impl OperationalDay {
    pub fn new(name: impl Into<String>, start_minute: u32, end_minute: u32) -> Self {
        Self {
            name: name.into(),
            start_minute,
            end_minute,
        }
    }

    fn duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }
}

/// Dense quantum time grid over a list of operational days.
///
/// Invariant: quanta are dense `[0, T)`; each quantum belongs to exactly one
/// day; no quantum represents non-operational time.
#[derive(Debug, Clone)]
pub struct QuantumTimeSystem {
    days: Vec<OperationalDay>,
    /// Fixed width of one quantum, in minutes.
    quantum_duration_minutes: u32,
    /// Per-day (first_quantum_index, quanta_count), in `days` order.
    offsets: Vec<(usize, usize)>,
    total_quanta: usize,
}

impl QuantumTimeSystem {
    /// Builds a QTS from a list of operational days and a fixed quantum width.
    ///
    /// Each day's window must be evenly divisible by `quantum_duration_minutes`;
    /// a remainder is truncated rather than rejected (mirrors how calendars
    /// in practice round down to the nearest full slot).
    pub fn new(days: Vec<OperationalDay>, quantum_duration_minutes: u32) -> Result<Self> {
        if quantum_duration_minutes == 0 {
            return Err(ScheduleError::invalid_input(
                "quantum_duration_minutes must be > 0",
            ));
        }
        if days.is_empty() {
            return Err(ScheduleError::invalid_input(
                "QuantumTimeSystem requires at least one operational day",
            ));
        }

        let mut offsets = Vec::with_capacity(days.len());
        let mut cursor = 0usize;
        for day in &days {
            if day.end_minute <= day.start_minute {
                return Err(ScheduleError::invalid_input(format!(
                    "day '{}' has a non-positive operational window",
                    day.name
                )));
            }
            let count = (day.duration_minutes() / quantum_duration_minutes) as usize;
            offsets.push((cursor, count));
            cursor += count;
        }

        Ok(Self {
            days,
            quantum_duration_minutes,
            offsets,
            total_quanta: cursor,
        })
    }

    /// Total number of quanta `T` across all operational days.
    pub fn total_quanta(&self) -> usize {
        self.total_quanta
    }

    /// Fixed quantum width, in minutes.
    pub fn quantum_duration_minutes(&self) -> u32 {
        self.quantum_duration_minutes
    }

    /// O(1) lookup of the day index owning quantum `q`.
    pub fn quantum_to_day(&self, q: usize) -> Result<usize> {
        if q >= self.total_quanta {
            return Err(ScheduleError::invalid_input(format!(
                "quantum {q} out of range [0, {})",
                self.total_quanta
            )));
        }
        // Offsets are monotonically increasing; a linear scan over the (small)
        // day list is O(1) relative to T for any realistic week length.
        for (day_idx, (start, count)) in self.offsets.iter().enumerate() {
            if q < start + count {
                return Ok(day_idx);
            }
        }
        unreachable!("quantum within total_quanta must map to a day")
    }

    /// Converts a wall-clock `"HH:MM"` time on `day_idx` to its quantum index.
    ///
    /// Fails with `InvalidInput` if the day index is out of range, the time
    /// string cannot be parsed, or the time falls outside the day's
    /// operational window or off a quantum boundary.
    pub fn wall_to_quantum(&self, day_idx: usize, wall_clock: &str) -> Result<usize> {
        let day = self.days.get(day_idx).ok_or_else(|| {
            ScheduleError::invalid_input(format!("day index {day_idx} out of range"))
        })?;
        let minute = parse_hhmm(wall_clock)?;

        if minute < day.start_minute || minute >= day.end_minute {
            return Err(ScheduleError::invalid_input(format!(
                "{wall_clock} is outside the operational window for '{}'",
                day.name
            )));
        }

        let offset_in_day = (minute - day.start_minute) / self.quantum_duration_minutes;
        let (start, count) = self.offsets[day_idx];
        let q = start + offset_in_day as usize;
        if q >= start + count {
            return Err(ScheduleError::invalid_input(format!(
                "{wall_clock} does not align to a quantum boundary on '{}'",
                day.name
            )));
        }
        Ok(q)
    }

    /// Converts a quantum back to its `(day_idx, "HH:MM")` wall-clock start.
    pub fn quantum_to_wall(&self, q: usize) -> Result<(usize, String)> {
        let day_idx = self.quantum_to_day(q)?;
        let (start, _) = self.offsets[day_idx];
        let day = &self.days[day_idx];
        let minute = day.start_minute + (q - start) as u32 * self.quantum_duration_minutes;
        Ok((day_idx, format_hhmm(minute)))
    }

    /// Converts a quantum back to its `(day_idx, "HH:MM")` wall-clock end
    /// (i.e. the start of the following quantum).
    pub fn quantum_end_wall(&self, q: usize) -> Result<(usize, String)> {
        let day_idx = self.quantum_to_day(q)?;
        let (start, _) = self.offsets[day_idx];
        let day = &self.days[day_idx];
        let minute = day.start_minute + (q - start + 1) as u32 * self.quantum_duration_minutes;
        Ok((day_idx, format_hhmm(minute)))
    }

    /// Returns the dense `[first, last]` quantum range operated by `day_idx`.
    pub fn operational_quanta_for(&self, day_idx: usize) -> Result<std::ops::Range<usize>> {
        let (start, count) = *self
            .offsets
            .get(day_idx)
            .ok_or_else(|| ScheduleError::invalid_input(format!("day index {day_idx} out of range")))?;
        Ok(start..start + count)
    }

    /// Number of operational days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn day_name(&self, day_idx: usize) -> Option<&str> {
        self.days.get(day_idx).map(|d| d.name.as_str())
    }
}

fn parse_hhmm(s: &str) -> Result<u32> {
    let (h, m) = s
        .split_once(':')
        .ok_or_else(|| ScheduleError::invalid_input(format!("malformed time '{s}'")))?;
    let h: u32 = h
        .parse()
        .map_err(|_| ScheduleError::invalid_input(format!("malformed hour in '{s}'")))?;
    let m: u32 = m
        .parse()
        .map_err(|_| ScheduleError::invalid_input(format!("malformed minute in '{s}'")))?;
    if h >= 24 || m >= 60 {
        return Err(ScheduleError::invalid_input(format!(
            "time '{s}' out of 24h range"
        )));
    }
    Ok(h * 60 + m)
}

fn format_hhmm(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}
