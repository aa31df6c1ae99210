/// Simulation ticks, in hours since admission.
pub const SCENARIO_HOURS: [u32; 6] = [0, 8, 16, 24, 32, 40];

pub const FINAL_HOUR: u32 = 40;

pub fn is_scheduled(hour: u32) -> bool {
    SCENARIO_HOURS.contains(&hour)
}

/// The hour that follows `last_applied`; hour 0 when nothing has been
/// applied yet, `None` once the schedule is exhausted.
pub fn next_hour(last_applied: Option<u32>) -> Option<u32> {
    match last_applied {
        None => SCENARIO_HOURS.first().copied(),
        Some(last) => SCENARIO_HOURS.iter().copied().find(|h| *h > last),
    }
}
