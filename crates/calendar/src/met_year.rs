//! Meteorological year computation.
//!
//! UKCP files and climatologies run from December of the previous calendar
//! year through November, so that each winter season (DJF) stays within a
//! single year.

use crate::calendar::Calendar;
use crate::date::CalendarDate;
use crate::error::CalendarError;

/// First month of a meteorological year.
pub const MET_YEAR_START_MONTH: u8 = 12;

/// Computes the meteorological year for a given calendar year and month.
///
/// December belongs to the *next* calendar year's meteorological year.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
///
/// # Examples
///
/// ```
/// use ukcp_calendar::met_year;
///
/// assert_eq!(met_year(2017, 12).unwrap(), 2018); // Dec 2017 -> 2018
/// assert_eq!(met_year(2018, 11).unwrap(), 2018); // Nov 2018 -> 2018
/// ```
pub fn met_year(year: i32, month: u8) -> Result<i32, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    if month >= MET_YEAR_START_MONTH {
        Ok(year + 1)
    } else {
        Ok(year)
    }
}

/// Lists every `(calendar year, month)` pair of meteorological years
/// `first..=last`, from December `first - 1` to November `last`.
///
/// Returns an empty list when `last < first`.
pub fn met_year_months(first: i32, last: i32) -> Vec<(i32, u8)> {
    if last < first {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(((last - first + 1) * 12) as usize);
    out.push((first - 1, MET_YEAR_START_MONTH));
    for year in first..=last {
        for month in 1..MET_YEAR_START_MONTH {
            out.push((year, month));
        }
        if year != last {
            out.push((year, MET_YEAR_START_MONTH));
        }
    }
    out
}

/// Half-open date window `[start, end)` covering meteorological years
/// `first..=last`: 1 December `first - 1` up to 1 December `last`.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidTime`] when `last < first`.
pub fn met_year_bounds(
    first: i32,
    last: i32,
    calendar: Calendar,
) -> Result<(CalendarDate, CalendarDate), CalendarError> {
    if last < first {
        return Err(CalendarError::InvalidTime {
            reason: format!("meteorological year range {first}-{last} is empty"),
        });
    }
    let start = CalendarDate::new(first - 1, MET_YEAR_START_MONTH, 1, calendar)?;
    let end = CalendarDate::new(last, MET_YEAR_START_MONTH, 1, calendar)?;
    Ok((start, end))
}
