//! Calendar month arithmetic.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Advances `start` by `months` calendar months.
///
/// Time of day and day of month are kept. A day that does not exist in the
/// target month overflows into the next one, so Jan 31 plus one month is
/// Mar 3 in a common year and Mar 2 in a leap year.
///
/// Returns `None` when the result leaves chrono's supported range.
pub fn add_calendar_months(start: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    let date = start.date_naive();
    let month_index =
        i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);

    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = u32::try_from(month_index.rem_euclid(12)).ok()? + 1;

    let target = NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_days(Days::new(u64::from(date.day0())))?;

    Some(target.and_time(start.time()).and_utc())
}
