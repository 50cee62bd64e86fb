//! Error types for the ukcp-calendar crate.

/// Error type for all fallible operations in the ukcp-calendar crate.
///
/// Covers invalid date components, unsupported calendar names, malformed
/// CF time-unit strings and unknown period codes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the number of days in the given month.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The invalid day number that was provided.
        day: u8,
        /// The month for which the day is invalid.
        month: u8,
        /// The maximum valid day for the given month.
        max_day: u8,
    },

    /// Returned when a calendar attribute names an unsupported calendar.
    #[error("unknown calendar: '{name}'")]
    UnknownCalendar {
        /// The calendar name as found in the file.
        name: String,
    },

    /// Returned when a CF time-units string cannot be parsed.
    #[error("invalid time units '{units}': {reason}")]
    InvalidUnits {
        /// The offending units string.
        units: String,
        /// Description of the parsing problem.
        reason: String,
    },

    /// Returned when a time value cannot be decoded or is out of range.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a month/season/annual code is not recognised.
    #[error("unknown period code: '{code}'")]
    UnknownPeriod {
        /// The unrecognised code.
        code: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_month() {
        let err = CalendarError::InvalidMonth { month: 13 };
        assert_eq!(err.to_string(), "invalid month: 13 (must be 1..=12)");
    }

    #[test]
    fn error_invalid_day() {
        let err = CalendarError::InvalidDay {
            day: 31,
            month: 2,
            max_day: 30,
        };
        assert_eq!(err.to_string(), "invalid day: 31 for month 2 (max 30)");
    }

    #[test]
    fn error_unknown_calendar() {
        let err = CalendarError::UnknownCalendar {
            name: "julian".to_string(),
        };
        assert_eq!(err.to_string(), "unknown calendar: 'julian'");
    }

    #[test]
    fn error_invalid_units() {
        let err = CalendarError::InvalidUnits {
            units: "fortnights".to_string(),
            reason: "missing 'since'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid time units 'fortnights': missing 'since'"
        );
    }

    #[test]
    fn error_unknown_period() {
        let err = CalendarError::UnknownPeriod {
            code: "winter".to_string(),
        };
        assert_eq!(err.to_string(), "unknown period code: 'winter'");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CalendarError>();
    }
}
