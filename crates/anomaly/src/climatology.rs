//! Baseline climatologies: one mean per sub-period.

use tracing::debug;
use ukcp_calendar::Period;
use ukcp_cube::{Coord, Cube, TIME, concatenate};
use ukcp_vocab::TemporalAverageType;

use crate::error::AnomalyError;

/// Label coordinate on the climatology's time axis naming the sub-period
/// of each mean.
pub const CLIM_PERIOD: &str = "clim_period";

/// Remove every auxiliary coordinate spanning `time`.
pub(crate) fn strip_time_aux(cube: &mut Cube) {
    let Some(ax) = cube.dim_index(TIME) else {
        return;
    };
    let names: Vec<String> = cube
        .aux_coords()
        .iter()
        .filter(|a| a.dims().contains(&ax))
        .map(|a| a.coord().name().to_string())
        .collect();
    for name in names {
        cube.remove_aux(&name);
    }
}

/// Mean of `baseline` over each sub-period of `tat`, one time point per
/// sub-period in meteorological-year order.
///
/// Months are used for daily and sub-daily data. Each point carries its
/// period code in the [`CLIM_PERIOD`] coordinate; other coordinates along
/// time are dropped.
///
/// # Errors
///
/// Returns [`AnomalyError::EmptyBaseline`] when a sub-period has no data,
/// or cube and calendar errors from decoding and averaging.
#[tracing::instrument(skip_all, fields(cube = baseline.name(), tat = %tat))]
pub fn climatology(baseline: &Cube, tat: TemporalAverageType) -> Result<Cube, AnomalyError> {
    let dates = baseline.time_dates()?;
    let ax = baseline.require_dim(TIME)?;
    let mut base = baseline.clone();
    strip_time_aux(&mut base);

    let periods = tat.periods();
    let mut means = Vec::with_capacity(periods.len());
    for period in periods {
        let slice = base.select_where(TIME, |i| period.contains_month(dates[i].month()))?;
        if slice.dim(TIME).is_none_or(Coord::is_empty) {
            return Err(AnomalyError::EmptyBaseline {
                cube: baseline.name().to_string(),
                period,
            });
        }
        let mut mean = slice.collapse_mean(TIME)?;
        mean.add_aux(Coord::labels(CLIM_PERIOD, [period.code()]), vec![ax])?;
        means.push(mean);
    }
    let clim = concatenate(&means, TIME)?;
    debug!(periods = means.len(), "climatology computed");
    Ok(clim)
}

/// The climatology entry of one sub-period, with a length-1 time axis.
///
/// Looks the period up by [`CLIM_PERIOD`] label when present. Otherwise a
/// single time point applies to every period, and several are matched by
/// month and averaged.
pub(crate) fn climatology_for(clim: &Cube, period: Period) -> Result<Cube, AnomalyError> {
    let missing = || AnomalyError::MissingClimatology {
        cube: clim.name().to_string(),
        period,
    };
    let labels = clim
        .aux(CLIM_PERIOD)
        .and_then(|a| a.coord().label_points())
        .map(<[String]>::to_vec);

    let entry = match labels {
        Some(labels) => clim.select_where(TIME, |i| labels[i] == period.code())?,
        None if clim.dim(TIME).map(Coord::len) == Some(1) => clim.clone(),
        None => {
            let dates = clim.time_dates()?;
            clim.select_where(TIME, |i| period.contains_month(dates[i].month()))?
        }
    };
    let mut entry = match entry.dim(TIME).map(Coord::len) {
        None | Some(0) => return Err(missing()),
        Some(1) => entry,
        Some(_) => entry.collapse_mean(TIME)?,
    };
    strip_time_aux(&mut entry);
    Ok(entry)
}
