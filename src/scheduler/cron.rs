//! Daily tick computation for the reminder schedule.
//!
//! The reminder job fires once a day at a fixed local wall-clock time
//! (09:00 in Bangkok by default). The zone is modelled as a fixed UTC
//! offset; the target zone observes no daylight saving.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};

/// Returns the start of the local day containing `now`, as a UTC instant.
#[must_use]
pub fn local_day_start(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = now.with_timezone(&offset).date_naive().and_time(NaiveTime::MIN);
    let utc_naive = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc_naive, Utc)
}

/// Computes the next daily firing strictly after `after`.
///
/// `hour`/`minute` are local wall-clock values; out-of-range values clamp
/// to midnight.
#[must_use]
pub fn next_daily_run(
    after: DateTime<Utc>,
    hour: u32,
    minute: u32,
    offset: FixedOffset,
) -> DateTime<Utc> {
    let fire_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    let local_after = after.with_timezone(&offset);

    let mut candidate = local_after.date_naive().and_time(fire_time);
    if candidate <= local_after.naive_local() {
        candidate += Duration::days(1);
    }

    let utc_naive = candidate - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc_naive, Utc)
}
