//! Calendar-aware date with time of day.

use std::fmt;

use crate::calendar::Calendar;
use crate::error::CalendarError;
use crate::met_year::met_year;

/// Seconds in one day.
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// A date and time of day, validated against a [`Calendar`].
///
/// Ordering is chronological within one calendar. Comparing dates from
/// different calendars compares their components, which is what the
/// selection filters want (a 360-day "February 30th" sorts before March 1st).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u8,
    day: u8,
    second_of_day: u32,
}

impl CalendarDate {
    /// Creates a date at midnight.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the month or day is invalid for `calendar`.
    pub fn new(year: i32, month: u8, day: u8, calendar: Calendar) -> Result<Self, CalendarError> {
        calendar.day_number(year, month, day)?;
        Ok(Self {
            year,
            month,
            day,
            second_of_day: 0,
        })
    }

    /// Creates a date with a time of day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidTime`] if the time of day is out of
    /// range, or the errors of [`CalendarDate::new`].
    pub fn with_time(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        calendar: Calendar,
    ) -> Result<Self, CalendarError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(CalendarError::InvalidTime {
                reason: format!("time of day {hour:02}:{minute:02}:{second:02} is out of range"),
            });
        }
        let mut date = Self::new(year, month, day, calendar)?;
        date.second_of_day = u32::from(hour) * 3600 + u32::from(minute) * 60 + u32::from(second);
        Ok(date)
    }

    /// Build from an absolute second count in `calendar`.
    pub(crate) fn from_seconds(total: i64, calendar: Calendar) -> Result<Self, CalendarError> {
        let days = total.div_euclid(SECONDS_PER_DAY);
        let (year, month, day) = calendar.from_day_number(days)?;
        Ok(Self {
            year,
            month,
            day,
            second_of_day: total.rem_euclid(SECONDS_PER_DAY) as u32,
        })
    }

    /// Absolute second count in `calendar`.
    pub(crate) fn to_seconds(self, calendar: Calendar) -> Result<i64, CalendarError> {
        let days = calendar.day_number(self.year, self.month, self.day)?;
        Ok(days * SECONDS_PER_DAY + i64::from(self.second_of_day))
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day within the month.
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the hour of the day (0..=23).
    pub fn hour(self) -> u8 {
        (self.second_of_day / 3600) as u8
    }

    /// Returns the number of seconds since midnight.
    pub fn second_of_day(self) -> u32 {
        self.second_of_day
    }

    /// Returns the meteorological year (December counts towards the next year).
    pub fn met_year(self) -> i32 {
        // month is validated at construction
        met_year(self.year, self.month).unwrap_or(self.year)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.second_of_day / 3600;
        let m = (self.second_of_day % 3600) / 60;
        let s = self.second_of_day % 60;
        write!(
            f,
            "{:04}-{:02}-{:02} {h:02}:{m:02}:{s:02}",
            self.year, self.month, self.day
        )
    }
}
