use crate::error::AppError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

/// Calendar-day key used throughout the state: `YYYY-MM-DD` in local time.
pub fn day_key(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

pub fn parse_day_key(key: &str) -> Result<Date, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(key.trim(), &format)
        .map_err(|_| AppError::invalid_data(format!("'{key}' is not a YYYY-MM-DD date")))
}

pub fn local_today() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

pub fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Whole calendar days from `from` to `to`; negative when `to` is earlier.
pub fn gap_days(from: Date, to: Date) -> i64 {
    i64::from(to.to_julian_day()) - i64::from(from.to_julian_day())
}

pub fn date_from_julian(julian_day: i32) -> Result<Date, AppError> {
    Date::from_julian_day(julian_day)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
