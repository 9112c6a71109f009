//! Cycle phase resolution
//!
//! Maps a birth-control cycle-day label onto a cycle phase. The vocabulary
//! assumes a fixed cycle of 21 active-pill days followed by a 7 day break:
//! - `Day 1`..`Day 7`: follicular
//! - `Day 8`..`Day 14`: ovulation
//! - `Day 15`..`Day 21`: luteal
//! - `Break Day 1`..`Break Day 7`: menstrual

use crate::types::CyclePhase;

/// Number of active-pill days in a cycle
pub const ACTIVE_DAYS: u32 = 21;

/// Number of hormone-free break days in a cycle
pub const BREAK_DAYS: u32 = 7;

const BREAK_PREFIX: &str = "Break";
const DAY_PREFIX: &str = "Day ";

/// Resolve the phase for a cycle-day label.
///
/// Total: an empty, unparsable or out-of-range label resolves to
/// [`CyclePhase::Unknown`] rather than failing.
pub fn resolve_phase(cycle_day: &str) -> CyclePhase {
    if cycle_day.is_empty() {
        return CyclePhase::Unknown;
    }

    if cycle_day.starts_with(BREAK_PREFIX) {
        return CyclePhase::Menstrual;
    }

    let day = cycle_day
        .strip_prefix(DAY_PREFIX)
        .and_then(|n| n.trim().parse::<u32>().ok());

    match day {
        Some(1..=7) => CyclePhase::Follicular,
        Some(8..=14) => CyclePhase::Ovulation,
        Some(15..=21) => CyclePhase::Luteal,
        _ => CyclePhase::Unknown,
    }
}

/// The full cycle-day vocabulary in cycle order, for capture surfaces that
/// render a picker.
pub fn cycle_day_options() -> Vec<String> {
    (1..=ACTIVE_DAYS)
        .map(|n| format!("{DAY_PREFIX}{n}"))
        .chain((1..=BREAK_DAYS).map(|n| format!("{BREAK_PREFIX} {DAY_PREFIX}{n}")))
        .collect()
}
