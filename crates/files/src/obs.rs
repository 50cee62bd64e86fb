//! HadUK-Grid observation (`land-obs`) file layout.
//!
//! ```text
//! {obs_root}/{spatial}/{variable}/{tat}/{version}/
//!     {variable}_hadukgrid_uk_{spatial}_{tat}_{range}.nc
//! ```

use ukcp_vocab::{Collection, TemporalAverageType};

use crate::date_range::{WILDCARD, calendar_year_ranges, gregorian_month_ranges};
use crate::error::FilesError;
use crate::layout::DataLayout;
use crate::path_set::{EnsembleFiles, ScenarioFiles};

/// Range tokens for meteorological years `first..=last`.
///
/// Monthly files hold one calendar year, daily files one Gregorian month;
/// everything coarser is a single file.
pub(crate) fn ranges(tat: TemporalAverageType, years: (i32, i32)) -> Result<Vec<String>, FilesError> {
    Ok(match tat {
        TemporalAverageType::Monthly => calendar_year_ranges(years.0, years.1),
        TemporalAverageType::Daily => gregorian_month_ranges(years.0, years.1)?,
        _ => vec![WILDCARD.to_string()],
    })
}

/// Resolve the files of one variable.
pub(crate) fn resolve_variable(
    layout: &DataLayout,
    spatial: &str,
    tat: TemporalAverageType,
    years: (i32, i32),
    file_variable: &str,
) -> Result<ScenarioFiles, FilesError> {
    let collection = Collection::LandObs;
    let dir = layout
        .obs_root()
        .join(spatial)
        .join(file_variable)
        .join(tat.as_str())
        .join(layout.version(collection));
    let patterns = ranges(tat, years)?
        .iter()
        .map(|range| dir.join(format!("{file_variable}_hadukgrid_uk_{spatial}_{tat}_{range}.nc")))
        .collect();
    Ok(ScenarioFiles {
        scenario: None,
        ensembles: vec![EnsembleFiles {
            ensemble: None,
            collection,
            patterns,
        }],
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn monthly_files_per_calendar_year() {
        let s = resolve_variable(
            &DataLayout::new("/data", "/obs"),
            "1km",
            TemporalAverageType::Monthly,
            (2018, 2018),
            "tas",
        )
        .unwrap();
        assert!(s.scenario.is_none());
        assert_eq!(
            s.ensembles[0].patterns,
            [
                PathBuf::from("/obs/1km/tas/mon/latest/tas_hadukgrid_uk_1km_mon_201701-201712.nc"),
                PathBuf::from("/obs/1km/tas/mon/latest/tas_hadukgrid_uk_1km_mon_201801-201812.nc"),
            ]
        );
    }

    #[test]
    fn daily_files_per_gregorian_month() {
        let r = ranges(TemporalAverageType::Daily, (2018, 2018)).unwrap();
        assert_eq!(r.len(), 12);
        assert_eq!(r[0], "20171201-20171231");
        assert_eq!(r[2], "20180201-20180228");
    }

    #[test]
    fn seasonal_is_single_file() {
        assert_eq!(
            ranges(TemporalAverageType::Seasonal, (1990, 2000)).unwrap(),
            [WILDCARD]
        );
    }
}
