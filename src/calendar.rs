use std::fmt;

use thiserror::Error;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

const EPOCH_YEAR: i64 = 1970;
const HOUR_CYCLE: u8 = 12;
const DAYS_PER_400_YEARS: i64 = 146_097;
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The (offset-adjusted) epoch value is negative.
    #[error("invalid input: epoch seconds must be non-negative (got {epoch})")]
    InvalidInput { epoch: i64 },
    /// Applying the offset overflows `i64`.
    #[error("invalid input: epoch {epoch} with offset {offset_secs}s is out of range")]
    OutOfRange { epoch: i64, offset_secs: i64 },
}

/// A proleptic Gregorian date and wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CivilDateTime {
    /// Seconds since 1970-01-01T00:00:00 for this date and time, with no zone applied.
    pub fn to_epoch_seconds(&self) -> i64 {
        let days = epoch_days(self.year, self.month, self.day);
        days * SECONDS_PER_DAY
            + i64::from(self.hour) * SECONDS_PER_HOUR
            + i64::from(self.minute) * SECONDS_PER_MINUTE
            + i64::from(self.second)
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Gregorian rule: divisible by 4, and not by 100 unless also by 400.
pub fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_year(year: i64) -> i64 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Length of a 1-based `month`, or `None` outside 1..=12.
pub fn days_in_month(year: i64, month: u8) -> Option<u8> {
    let len = *DAYS_IN_MONTH.get(usize::from(month).checked_sub(1)?)?;
    if month == 2 && is_leap_year(year) {
        Some(len + 1)
    } else {
        Some(len)
    }
}

/// Convert seconds since the Unix epoch to a civil date and time.
pub fn convert(epoch: i64) -> Result<CivilDateTime, CalendarError> {
    if epoch < 0 {
        return Err(CalendarError::InvalidInput { epoch });
    }

    let mut days = epoch / SECONDS_PER_DAY;
    let secs = epoch % SECONDS_PER_DAY;

    // Every 400-year span holds the same number of days, so whole spans can
    // be skipped before walking year by year.
    let mut year = EPOCH_YEAR + (days / DAYS_PER_400_YEARS) * 400;
    days %= DAYS_PER_400_YEARS;

    while days >= days_in_year(year) {
        days -= days_in_year(year);
        year += 1;
    }

    // `days` is below the year's length, so the walk stops by December.
    let mut month = 1u8;
    while let Some(len) = days_in_month(year, month).map(i64::from).filter(|&len| days >= len) {
        days -= len;
        month += 1;
    }

    // Every component below is bounded by its modulus, so the narrowing is lossless.
    Ok(CivilDateTime {
        year,
        month,
        day: (days + 1) as u8,
        hour: (secs / SECONDS_PER_HOUR) as u8,
        minute: ((secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u8,
        second: (secs % SECONDS_PER_MINUTE) as u8,
    })
}

/// Apply a fixed zone offset to `epoch`, then convert.
///
/// An adjusted value below zero is rejected rather than wrapped, so a
/// negative offset fails for epochs smaller than its magnitude.
pub fn convert_with_offset(epoch: i64, offset_secs: i64) -> Result<CivilDateTime, CalendarError> {
    let adjusted = epoch
        .checked_add(offset_secs)
        .ok_or(CalendarError::OutOfRange { epoch, offset_secs })?;
    convert(adjusted)
}

/// `HH:MM:SS AM/PM` on a 12-hour clock.
pub fn format_clock(dt: &CivilDateTime) -> String {
    let hour12 = match dt.hour % HOUR_CYCLE {
        0 => HOUR_CYCLE,
        h => h,
    };
    let meridiem = if dt.hour < HOUR_CYCLE { "AM" } else { "PM" };
    format!("{hour12:02}:{:02}:{:02} {meridiem}", dt.minute, dt.second)
}

/// `DD/MM/YYYY`.
pub fn format_date(dt: &CivilDateTime) -> String {
    format!("{:02}/{:02}/{:04}", dt.day, dt.month, dt.year)
}

/// Days since Unix epoch for a given calendar date.
fn epoch_days(year: i64, month: u8, day: u8) -> i64 {
    let m = i64::from(month);
    let d = i64::from(day);
    let a = (14 - m) / 12;
    let y2 = year + 4800 - a;
    let m2 = m + 12 * a - 3;
    let jdn = d + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 32045;
    jdn - 2440588 // Unix epoch is Julian day 2440588
}
