//! Local wall-clock presentation.
//!
//! Published timestamps stay UTC; the fixed timezone offset only feeds the
//! log line printed when the time source syncs, as a local time of day.

const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds into the local day for a Unix timestamp under a fixed UTC offset.
/// Negative offsets that cross midnight wrap into the previous day.
pub fn local_seconds_of_day(unix_seconds: u64, tz_offset_seconds: i32) -> u32 {
    (unix_seconds as i64 + tz_offset_seconds as i64).rem_euclid(SECONDS_PER_DAY) as u32
}
