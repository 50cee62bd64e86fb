//! Date-range tokens of UKCP file names.
//!
//! Every projection file holds whole meteorological years or whole months,
//! and the token at the end of its name states which: `20171201-20181130`
//! for the 2018 meteorological year, `20180101-20180130` for January 2018
//! on the 360-day model calendar.

use ukcp_calendar::{Calendar, met_year_months};

use crate::error::FilesError;

/// Token matching every file of a directory.
pub const WILDCARD: &str = "*";

/// Range of the 20- and 30-year probabilistic climatology files.
pub const PROB_CLIMATOLOGY_RANGE: &str = "20091201-20991130";

/// Day-of-month suffixes of a meteorological-year range.
const START_MONTH_DAY: &str = "1201";
const END_MONTH_DAY: &str = "1130";

/// Range token of meteorological year `year`: December `year - 1` through
/// November `year`.
pub fn met_year_range(year: i32) -> String {
    format!("{}{START_MONTH_DAY}-{year}{END_MONTH_DAY}", year - 1)
}

/// One [`met_year_range`] per year of `first..=last`.
pub fn met_year_ranges(first: i32, last: i32) -> Vec<String> {
    (first..=last).map(met_year_range).collect()
}

/// One token per month of meteorological years `first..=last` on the
/// 360-day calendar, where every month ends on the 30th.
pub fn model_month_ranges(first: i32, last: i32) -> Vec<String> {
    met_year_months(first, last)
        .into_iter()
        .map(|(y, m)| format!("{y:04}{m:02}01-{y:04}{m:02}30"))
        .collect()
}

/// One token per month of meteorological years `first..=last` with
/// Gregorian month lengths.
///
/// # Errors
///
/// Propagates calendar errors, which only a corrupt month list produces.
pub fn gregorian_month_ranges(first: i32, last: i32) -> Result<Vec<String>, FilesError> {
    met_year_months(first, last)
        .into_iter()
        .map(|(y, m)| {
            let end = Calendar::Standard.days_in_month(y, m)?;
            Ok(format!("{y:04}{m:02}01-{y:04}{m:02}{end:02}"))
        })
        .collect()
}

/// One `YYYY01-YYYY12` token per calendar year touched by meteorological
/// years `first..=last`, i.e. `first - 1` through `last`.
pub fn calendar_year_ranges(first: i32, last: i32) -> Vec<String> {
    if last < first {
        return Vec::new();
    }
    (first - 1..=last).map(|y| format!("{y:04}01-{y:04}12")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn met_year_window() {
        assert_eq!(met_year_range(2018), "20171201-20181130");
        assert_eq!(
            met_year_ranges(2019, 2020),
            ["20181201-20191130", "20191201-20201130"]
        );
        assert!(met_year_ranges(2020, 2019).is_empty());
    }

    #[test]
    fn model_months_span_december_to_november() {
        let r = model_month_ranges(2018, 2018);
        assert_eq!(r.len(), 12);
        assert_eq!(r[0], "20171201-20171230");
        assert_eq!(r[1], "20180101-20180130");
        assert_eq!(r[11], "20181101-20181130");
    }

    #[test]
    fn gregorian_month_lengths() {
        let r = gregorian_month_ranges(2020, 2020).unwrap();
        assert_eq!(r[0], "20191201-20191231");
        assert_eq!(r[2], "20200201-20200229");
        assert_eq!(r[4], "20200401-20200430");
        let r = gregorian_month_ranges(2019, 2019).unwrap();
        assert_eq!(r[2], "20190201-20190228");
    }

    #[test]
    fn calendar_years_include_preceding_december() {
        assert_eq!(
            calendar_year_ranges(2000, 2001),
            ["199901-199912", "200001-200012", "200101-200112"]
        );
    }
}
