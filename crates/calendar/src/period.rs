//! Months, meteorological seasons and the annual pseudo-period.

use std::fmt;

use crate::error::CalendarError;

/// Lower-case three-letter month codes, January first.
pub const MONTH_CODES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Meteorological season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    /// December, January, February.
    Djf,
    /// March, April, May.
    Mam,
    /// June, July, August.
    Jja,
    /// September, October, November.
    Son,
}

impl Season {
    /// All seasons in meteorological-year order.
    pub const ALL: [Season; 4] = [Season::Djf, Season::Mam, Season::Jja, Season::Son];

    /// Calendar months of the season, in chronological order.
    pub fn months(self) -> [u8; 3] {
        match self {
            Season::Djf => [12, 1, 2],
            Season::Mam => [3, 4, 5],
            Season::Jja => [6, 7, 8],
            Season::Son => [9, 10, 11],
        }
    }

    /// Lower-case season code (`"djf"`).
    pub fn code(self) -> &'static str {
        match self {
            Season::Djf => "djf",
            Season::Mam => "mam",
            Season::Jja => "jja",
            Season::Son => "son",
        }
    }

    /// Season containing `month`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn of_month(month: u8) -> Result<Self, CalendarError> {
        match month {
            12 | 1 | 2 => Ok(Season::Djf),
            3..=5 => Ok(Season::Mam),
            6..=8 => Ok(Season::Jja),
            9..=11 => Ok(Season::Son),
            _ => Err(CalendarError::InvalidMonth { month }),
        }
    }
}

/// A sub-period of the meteorological year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    /// A single calendar month (1..=12).
    Month(u8),
    /// A meteorological season.
    Season(Season),
    /// The whole year.
    Annual,
}

impl Period {
    /// Parse a period code: `jan`..`dec`, `djf`/`mam`/`jja`/`son`, or `ann`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::UnknownPeriod`] for anything else.
    pub fn from_code(code: &str) -> Result<Self, CalendarError> {
        let lower = code.to_lowercase();
        if lower == "ann" {
            return Ok(Period::Annual);
        }
        if let Some(i) = MONTH_CODES.iter().position(|&m| m == lower) {
            return Ok(Period::Month(i as u8 + 1));
        }
        Season::ALL
            .into_iter()
            .find(|s| s.code() == lower)
            .map(Period::Season)
            .ok_or_else(|| CalendarError::UnknownPeriod {
                code: code.to_string(),
            })
    }

    /// Lower-case code of the period.
    pub fn code(self) -> &'static str {
        match self {
            Period::Month(m) => MONTH_CODES
                .get((m as usize).wrapping_sub(1))
                .copied()
                .unwrap_or("???"),
            Period::Season(s) => s.code(),
            Period::Annual => "ann",
        }
    }

    /// Returns `true` if `month` falls inside the period.
    pub fn contains_month(self, month: u8) -> bool {
        match self {
            Period::Month(m) => m == month,
            Period::Season(s) => s.months().contains(&month),
            Period::Annual => (1..=12).contains(&month),
        }
    }

    /// Twelve monthly periods, January first.
    pub fn all_months() -> Vec<Period> {
        (1..=12).map(Period::Month).collect()
    }

    /// Four seasonal periods, winter first.
    pub fn all_seasons() -> Vec<Period> {
        Season::ALL.into_iter().map(Period::Season).collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_month_codes() {
        assert_eq!(Period::from_code("jan").unwrap(), Period::Month(1));
        assert_eq!(Period::from_code("DEC").unwrap(), Period::Month(12));
    }

    #[test]
    fn parse_season_and_annual() {
        assert_eq!(Period::from_code("jja").unwrap(), Period::Season(Season::Jja));
        assert_eq!(Period::from_code("ann").unwrap(), Period::Annual);
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            Period::from_code("all").unwrap_err(),
            CalendarError::UnknownPeriod {
                code: "all".to_string()
            }
        );
    }

    #[test]
    fn code_roundtrip() {
        for p in Period::all_months()
            .into_iter()
            .chain(Period::all_seasons())
            .chain([Period::Annual])
        {
            assert_eq!(Period::from_code(p.code()).unwrap(), p);
        }
    }

    #[test]
    fn winter_contains_december() {
        let djf = Period::Season(Season::Djf);
        assert!(djf.contains_month(12));
        assert!(djf.contains_month(1));
        assert!(!djf.contains_month(3));
    }

    #[test]
    fn season_of_every_month() {
        let mut counts = [0usize; 4];
        for m in 1..=12 {
            let s = Season::of_month(m).unwrap();
            assert!(s.months().contains(&m));
            counts[s as usize] += 1;
        }
        assert_eq!(counts, [3, 3, 3, 3]);
    }

    #[test]
    fn season_order_is_meteorological() {
        let codes: Vec<_> = Period::all_seasons().iter().map(|p| p.code()).collect();
        assert_eq!(codes, ["djf", "mam", "jja", "son"]);
    }
}
