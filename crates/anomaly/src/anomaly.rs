//! Anomalies of absolute data against a baseline climatology.

use tracing::debug;
use ukcp_calendar::Period;
use ukcp_cube::{Coord, Cube, TIME, Unit, concatenate};
use ukcp_input::ValidatedInput;
use ukcp_vocab::{TemporalAverageType, TimePeriod, is_global_warming_level};

use crate::climatology::climatology_for;
use crate::error::AnomalyError;

/// Attribute naming the baseline an anomaly is relative to.
pub const BASELINE_ATTRIBUTE: &str = "baseline";

/// Anomaly-type tag carried by every anomaly.
pub const ANOMALY_TYPE_ATTRIBUTE: &str = "anomaly_type";

/// Value of [`ANOMALY_TYPE_ATTRIBUTE`].
pub const RELATIVE_CHANGE: &str = "relative_change";

/// Categorical time coordinates that differ between a slice and its
/// climatology.
const CATEGORY_COORDS: [&str; 3] = ["year", "month_number", "season_year"];

/// Geographic coordinates of the global model grid, which warming-level
/// baselines are read from.
const GEOGRAPHIC_COORDS: [&str; 2] = ["latitude", "longitude"];

/// How to turn one absolute cube into an anomaly.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyRequest {
    /// Temporal averaging of the data; selects the sub-periods.
    pub tat: TemporalAverageType,
    /// Requested time period.
    pub time_period: TimePeriod,
    /// Baseline id recorded on the result.
    pub baseline: String,
    /// Unit of the result. A dimensionless unit selects relative change.
    pub unit: String,
    /// Name given to the result.
    pub name: String,
    /// Drop latitude and longitude before subtracting.
    pub drop_geographic: bool,
}

impl AnomalyRequest {
    /// Settings for `variable` (an anomaly variable) of a validated
    /// request, for data of `scenario`.
    ///
    /// Returns `None` when the request has no baseline or the vocabulary
    /// does not know the variable.
    pub fn for_variable(input: &ValidatedInput, variable: &str, scenario: Option<&str>) -> Option<Self> {
        let spec = input.vocabulary().variable(variable)?;
        Some(Self {
            tat: input.temporal_average_type(),
            time_period: input.time_period(),
            baseline: input.baseline()?.to_string(),
            unit: spec.unit.clone(),
            name: variable.to_string(),
            drop_geographic: scenario.is_some_and(is_global_warming_level),
        })
    }

    /// Sub-periods the data is split into, in meteorological-year order.
    ///
    /// A single requested period keeps the sub-periods of `tat` that lie
    /// inside it, so daily data for a season is handled month by month.
    pub fn sub_periods(&self) -> Vec<Period> {
        let periods = self.tat.periods();
        match self.time_period {
            TimePeriod::All => periods,
            TimePeriod::Period(p) => periods
                .into_iter()
                .filter(|sp| (1..=12).filter(|&m| sp.contains_month(m)).all(|m| p.contains_month(m)))
                .collect(),
        }
    }

    fn strip(&self, cube: &mut Cube) {
        for name in CATEGORY_COORDS {
            cube.remove_aux(name);
        }
        if self.drop_geographic {
            for name in GEOGRAPHIC_COORDS {
                cube.remove_aux(name);
            }
        }
    }
}

/// Anomaly of `absolute` against `climatology`.
///
/// The data is split into sub-periods; each slice has its period's
/// climatology subtracted (broadcast along time), and the pieces are
/// joined back in time order with the absolute cube's dimension order.
///
/// With a dimensionless target unit the anomaly is the relative change
/// `(x - μ) / μ`; otherwise it is the difference `x - μ`, converted as a
/// difference so a Kelvin anomaly equals its Celsius anomaly.
///
/// The result keeps the absolute cube's attributes and adds
/// [`BASELINE_ATTRIBUTE`] and [`ANOMALY_TYPE_ATTRIBUTE`], which is always
/// [`RELATIVE_CHANGE`].
///
/// # Errors
///
/// Returns [`AnomalyError::MissingClimatology`] for a sub-period without a
/// climatology entry, [`AnomalyError::NoData`] when no sub-period has
/// data, and cube errors for dimension or unit mismatches.
#[tracing::instrument(skip_all, fields(cube = absolute.name(), baseline = %request.baseline))]
pub fn anomaly(absolute: &Cube, climatology: &Cube, request: &AnomalyRequest) -> Result<Cube, AnomalyError> {
    let target = Unit::parse(&request.unit)?;
    let order: Vec<String> = absolute.dim_names().iter().map(|s| s.to_string()).collect();
    let dates = absolute.time_dates()?;

    let mut parts = Vec::new();
    for period in request.sub_periods() {
        let mut slice = absolute.select_where(TIME, |i| period.contains_month(dates[i].month()))?;
        if slice.dim(TIME).is_none_or(Coord::is_empty) {
            continue;
        }
        request.strip(&mut slice);
        let mut clim = climatology_for(climatology, period)?;
        request.strip(&mut clim);
        let clim = clim.transpose_to(&slice.dim_names())?;

        let part = if target.is_dimensionless() {
            slice.subtract(&clim)?.divide(&clim)?.convert_units(&request.unit)?
        } else {
            slice.subtract(&clim)?.convert_difference_units(&request.unit)?
        };
        parts.push(part);
    }
    if parts.is_empty() {
        return Err(AnomalyError::NoData {
            cube: absolute.name().to_string(),
            period: request.time_period.to_string(),
        });
    }

    let order: Vec<&str> = order.iter().map(String::as_str).collect();
    let mut out = concatenate(&parts, TIME)?
        .sort_along(TIME)?
        .transpose_to(&order)?;
    out.set_name(request.name.as_str());
    out.set_attribute(BASELINE_ATTRIBUTE, request.baseline.as_str());
    out.set_attribute(ANOMALY_TYPE_ATTRIBUTE, RELATIVE_CHANGE);
    debug!(
        parts = parts.len(),
        relative = target.is_dimensionless(),
        units = out.units(),
        "anomaly computed"
    );
    Ok(out)
}
