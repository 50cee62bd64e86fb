//! CF calendar kinds and day-count arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::CalendarError;

/// Cumulative days before each month in a 365-day year.
const CUMULATIVE_365: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Cumulative days before each month in a 366-day year.
const CUMULATIVE_366: [u16; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Days per month in a 365-day year.
const DAYS_IN_MONTH_365: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A CF-convention calendar.
///
/// `Standard` is treated as proleptic Gregorian: UKCP data never reaches
/// back to the 1582 Julian/Gregorian switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calendar {
    /// `standard` / `gregorian`.
    Standard,
    /// `proleptic_gregorian`.
    ProlepticGregorian,
    /// `noleap` / `365_day`.
    NoLeap,
    /// `all_leap` / `366_day`.
    AllLeap,
    /// `360_day`: twelve 30-day months. Used by the UKCP model runs.
    Day360,
}

impl Calendar {
    /// Canonical CF name of the calendar.
    pub fn as_str(self) -> &'static str {
        match self {
            Calendar::Standard => "standard",
            Calendar::ProlepticGregorian => "proleptic_gregorian",
            Calendar::NoLeap => "noleap",
            Calendar::AllLeap => "all_leap",
            Calendar::Day360 => "360_day",
        }
    }

    /// Returns `true` if `year` has a February 29th in this calendar.
    pub fn is_leap_year(self, year: i32) -> bool {
        match self {
            Calendar::Standard | Calendar::ProlepticGregorian => {
                (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
            }
            Calendar::AllLeap => true,
            Calendar::NoLeap | Calendar::Day360 => false,
        }
    }

    /// Number of days in `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn days_in_month(self, year: i32, month: u8) -> Result<u8, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        if self == Calendar::Day360 {
            return Ok(30);
        }
        let base = DAYS_IN_MONTH_365[(month - 1) as usize];
        if month == 2 && self.is_leap_year(year) {
            Ok(base + 1)
        } else {
            Ok(base)
        }
    }

    /// Absolute day number of a date. Only differences between day numbers
    /// of the same calendar are meaningful.
    pub(crate) fn day_number(self, year: i32, month: u8, day: u8) -> Result<i64, CalendarError> {
        let max_day = self.days_in_month(year, month)?;
        if day == 0 || day > max_day {
            return Err(CalendarError::InvalidDay {
                day,
                month,
                max_day,
            });
        }
        let m = (month - 1) as usize;
        let d = i64::from(day) - 1;
        let y = i64::from(year);
        match self {
            Calendar::Standard | Calendar::ProlepticGregorian => {
                let date = NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
                    .ok_or_else(|| CalendarError::InvalidTime {
                        reason: format!("{year:04}-{month:02}-{day:02} is out of range"),
                    })?;
                Ok(i64::from(date.num_days_from_ce()))
            }
            Calendar::NoLeap => Ok(y * 365 + i64::from(CUMULATIVE_365[m]) + d),
            Calendar::AllLeap => Ok(y * 366 + i64::from(CUMULATIVE_366[m]) + d),
            Calendar::Day360 => Ok(y * 360 + (m as i64) * 30 + d),
        }
    }

    /// Inverse of [`day_number`](Self::day_number).
    pub(crate) fn from_day_number(self, days: i64) -> Result<(i32, u8, u8), CalendarError> {
        let out_of_range = || CalendarError::InvalidTime {
            reason: format!("day number {days} is out of range"),
        };
        match self {
            Calendar::Standard | Calendar::ProlepticGregorian => {
                let n = i32::try_from(days).map_err(|_| out_of_range())?;
                let date = NaiveDate::from_num_days_from_ce_opt(n).ok_or_else(out_of_range)?;
                Ok((date.year(), date.month() as u8, date.day() as u8))
            }
            Calendar::NoLeap => split_fixed_year(days, 365, &CUMULATIVE_365),
            Calendar::AllLeap => split_fixed_year(days, 366, &CUMULATIVE_366),
            Calendar::Day360 => {
                let year = i32::try_from(days.div_euclid(360)).map_err(|_| out_of_range())?;
                let rem = days.rem_euclid(360);
                Ok((year, (rem / 30) as u8 + 1, (rem % 30) as u8 + 1))
            }
        }
    }
}

/// Split a day number into `(year, month, day)` for calendars whose years
/// all have the same length.
fn split_fixed_year(
    days: i64,
    year_len: i64,
    cumulative: &[u16; 12],
) -> Result<(i32, u8, u8), CalendarError> {
    let year = i32::try_from(days.div_euclid(year_len)).map_err(|_| CalendarError::InvalidTime {
        reason: format!("day number {days} is out of range"),
    })?;
    let rem = days.rem_euclid(year_len) as u16;
    let m = cumulative.iter().rposition(|&c| c <= rem).unwrap_or(0);
    Ok((year, m as u8 + 1, (rem - cumulative[m]) as u8 + 1))
}

impl FromStr for Calendar {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "gregorian" => Ok(Calendar::Standard),
            "proleptic_gregorian" => Ok(Calendar::ProlepticGregorian),
            "noleap" | "no_leap" | "365_day" => Ok(Calendar::NoLeap),
            "all_leap" | "366_day" => Ok(Calendar::AllLeap),
            "360_day" => Ok(Calendar::Day360),
            _ => Err(CalendarError::UnknownCalendar {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
