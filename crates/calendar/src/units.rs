//! CF `<step> since <epoch>` time units.

use crate::calendar::Calendar;
use crate::date::CalendarDate;
use crate::error::CalendarError;

/// Step length of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStep {
    /// `seconds` / `second` / `s`.
    Seconds,
    /// `minutes` / `minute` / `min`.
    Minutes,
    /// `hours` / `hour` / `h`.
    Hours,
    /// `days` / `day` / `d`.
    Days,
}

impl TimeStep {
    /// Length of one step in seconds.
    pub fn seconds(self) -> f64 {
        match self {
            TimeStep::Seconds => 1.0,
            TimeStep::Minutes => 60.0,
            TimeStep::Hours => 3600.0,
            TimeStep::Days => 86_400.0,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeStep::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(TimeStep::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeStep::Hours),
            "days" | "day" | "d" => Some(TimeStep::Days),
            _ => None,
        }
    }
}

/// Parsed CF time units bound to a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    step: TimeStep,
    epoch: CalendarDate,
    calendar: Calendar,
}

impl TimeUnits {
    /// Parse a units string such as `"hours since 1970-01-01 00:00:00"`.
    ///
    /// The epoch may omit the time of day, use a `T` separator, carry
    /// fractional seconds, or end with a `Z`/`UTC` suffix. Date components
    /// need not be zero padded.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidUnits`] on malformed strings, or a
    /// date error if the epoch is not valid in `calendar`.
    pub fn parse(units: &str, calendar: Calendar) -> Result<Self, CalendarError> {
        let invalid = |reason: &str| CalendarError::InvalidUnits {
            units: units.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = units.trim().splitn(3, ' ').collect();
        if parts.len() < 3 || !parts[1].eq_ignore_ascii_case("since") {
            return Err(invalid("expected '<step> since <epoch>'"));
        }
        let step = TimeStep::parse(parts[0]).ok_or_else(|| invalid("unknown time step"))?;

        let mut fields = parts[2].split_whitespace();
        let first = fields.next().ok_or_else(|| invalid("missing epoch date"))?;
        let (date_str, inline_time) = match first.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (first, None),
        };
        let time_str = inline_time
            .or_else(|| fields.next())
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("utc"));

        let ymd: Vec<&str> = date_str.split('-').collect();
        // A leading '-' would produce an empty first field; negative epochs
        // do not occur in UKCP files.
        if ymd.len() != 3 {
            return Err(invalid("epoch date must be YYYY-MM-DD"));
        }
        let year: i32 = ymd[0].parse().map_err(|_| invalid("bad epoch year"))?;
        let month: u8 = ymd[1].parse().map_err(|_| invalid("bad epoch month"))?;
        let day: u8 = ymd[2].parse().map_err(|_| invalid("bad epoch day"))?;

        let (hour, minute, second) = match time_str {
            Some(t) => {
                let t = t.trim_end_matches('Z');
                let hms: Vec<&str> = t.split(':').collect();
                let hour: u8 = hms
                    .first()
                    .and_then(|h| h.parse().ok())
                    .ok_or_else(|| invalid("bad epoch hour"))?;
                let minute: u8 = match hms.get(1) {
                    Some(m) => m.parse().map_err(|_| invalid("bad epoch minute"))?,
                    None => 0,
                };
                let second: f64 = match hms.get(2) {
                    Some(s) => s.parse().map_err(|_| invalid("bad epoch second"))?,
                    None => 0.0,
                };
                (hour, minute, second.floor() as u8)
            }
            None => (0, 0, 0),
        };

        let epoch = CalendarDate::with_time(year, month, day, hour, minute, second, calendar)?;
        Ok(Self {
            step,
            epoch,
            calendar,
        })
    }

    /// Returns the step length.
    pub fn step(&self) -> TimeStep {
        self.step
    }

    /// Returns the epoch.
    pub fn epoch(&self) -> CalendarDate {
        self.epoch
    }

    /// Returns the calendar the units are bound to.
    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Convert an offset from the epoch into a date.
    ///
    /// Offsets are rounded to the nearest second.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidTime`] for non-finite offsets or
    /// dates outside the representable range.
    pub fn decode(&self, value: f64) -> Result<CalendarDate, CalendarError> {
        if !value.is_finite() {
            return Err(CalendarError::InvalidTime {
                reason: format!("non-finite time offset {value}"),
            });
        }
        let offset = (value * self.step.seconds()).round() as i64;
        let base = self.epoch.to_seconds(self.calendar)?;
        CalendarDate::from_seconds(base + offset, self.calendar)
    }

    /// Convert a date into an offset from the epoch.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if `date` is not valid in this calendar.
    pub fn encode(&self, date: CalendarDate) -> Result<f64, CalendarError> {
        let secs = date.to_seconds(self.calendar)? - self.epoch.to_seconds(self.calendar)?;
        Ok(secs as f64 / self.step.seconds())
    }
}
