//! Time, spatial and percentile filters.
//!
//! Every filter returns a new cube and reports an empty result as
//! [`ExtractError::DataNotFound`]. Filters on a dimension the cube does not
//! have pass it through unchanged, except the spatial filters, which need
//! the dimensions they select on.

use ukcp_calendar::{Calendar, met_year_bounds};
use ukcp_cube::{Coord, Cube, PROJECTION_X, PROJECTION_Y, REGION, TIME};
use ukcp_input::Area;
use ukcp_vocab::{AreaType, TimePeriod};

use crate::error::ExtractError;

/// Name of the percentile dimension of probabilistic data.
pub const PERCENTILE: &str = "percentile";

/// Half the grid spacing, in metres, of each gridded representation. A
/// point selects the one cell whose centre lies within this distance.
const POINT_HALF_WIDTHS: [(&str, f64); 6] = [
    ("25km", 12_500.0),
    ("12km", 6_000.0),
    ("60km", 30_000.0),
    ("2.2km", 1_100.0),
    ("5km", 2_500.0),
    ("1km", 500.0),
];

/// Point window half width for a spatial representation.
pub fn point_half_width(resolution: &str) -> Option<f64> {
    POINT_HALF_WIDTHS
        .iter()
        .find(|(r, _)| *r == resolution)
        .map(|&(_, w)| w)
}

fn non_empty(cube: Cube, dim: &str, what: impl FnOnce() -> String) -> Result<Cube, ExtractError> {
    match cube.dim(dim) {
        Some(c) if c.is_empty() => Err(ExtractError::not_found(what())),
        _ => Ok(cube),
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Keep the time points inside meteorological years `first..=last`.
///
/// # Errors
///
/// Returns [`ExtractError::DataNotFound`] when no point falls inside, or
/// calendar errors from decoding the time coordinate.
pub fn select_years(cube: &Cube, first: i32, last: i32) -> Result<Cube, ExtractError> {
    let Some(time) = cube.dim(TIME) else {
        return Ok(cube.clone());
    };
    let calendar = time.calendar().unwrap_or(Calendar::Standard);
    let (start, end) = met_year_bounds(first, last, calendar)?;
    let dates = cube.time_dates()?;
    let selected = cube.select_where(TIME, |i| dates[i] >= start && dates[i] < end)?;
    non_empty(selected, TIME, || {
        format!("{} has no data for years {first}-{last}", cube.name())
    })
}

/// Keep the time points of one month or season. `all` and the annual
/// period keep everything.
///
/// # Errors
///
/// Returns [`ExtractError::DataNotFound`] when no point falls inside, or
/// calendar errors from decoding the time coordinate.
pub fn select_period(cube: &Cube, period: TimePeriod) -> Result<Cube, ExtractError> {
    if period.is_all() || cube.dim(TIME).is_none() {
        return Ok(cube.clone());
    }
    let dates = cube.time_dates()?;
    let selected = cube.select_where(TIME, |i| period.contains_month(dates[i].month()))?;
    non_empty(selected, TIME, || format!("{} has no data for {period}", cube.name()))
}

// ---------------------------------------------------------------------------
// Space
// ---------------------------------------------------------------------------

fn numeric_points<'a>(cube: &'a Cube, dim: &str) -> Result<&'a [f64], ExtractError> {
    let coord: &Coord = cube
        .dim(dim)
        .ok_or_else(|| ExtractError::not_found(format!("{} has no {dim} dimension", cube.name())))?;
    coord
        .points()
        .ok_or_else(|| ExtractError::not_found(format!("{dim} of {} is not numeric", cube.name())))
}

fn select_range<F>(cube: &Cube, dim: &str, keep: F, area: &Area) -> Result<Cube, ExtractError>
where
    F: Fn(f64) -> bool,
{
    let points = numeric_points(cube, dim)?.to_vec();
    let selected = cube.select_where(dim, |i| keep(points[i]))?;
    non_empty(selected, dim, || format!("{} has no data inside {area}", cube.name()))
}

/// Restrict a cube to an area.
///
/// Point kinds select the cell whose centre lies within the
/// resolution's [`point_half_width`], bounding boxes every cell centre
/// inside the box (edges included), and region kinds the `region` entry
/// whose label matches the region's code or display label.
///
/// # Errors
///
/// Returns [`ExtractError::UnknownResolution`] for a point at an unknown
/// resolution and [`ExtractError::DataNotFound`] when the cube lacks the
/// dimensions or nothing lies inside the area.
pub fn select_area(cube: &Cube, area: &Area, resolution: &str) -> Result<Cube, ExtractError> {
    if let Some(region) = area.region() {
        return select_region(cube, region, area);
    }
    let coords = area.coordinates().unwrap_or_default();
    match (area.kind(), coords) {
        (AreaType::Bbox, &[xmin, ymin, xmax, ymax]) => {
            let cube = select_range(cube, PROJECTION_X, |x| x >= xmin && x <= xmax, area)?;
            select_range(&cube, PROJECTION_Y, |y| y >= ymin && y <= ymax, area)
        }
        (_, &[px, py]) => {
            let half = point_half_width(resolution).ok_or_else(|| ExtractError::UnknownResolution {
                resolution: resolution.to_string(),
            })?;
            let window = |p: f64| move |v: f64| v >= p - half && v < p + half;
            let cube = select_range(cube, PROJECTION_X, window(px), area)?;
            select_range(&cube, PROJECTION_Y, window(py), area)
        }
        _ => Err(ExtractError::not_found(format!("{area} is not a selectable area"))),
    }
}

fn select_region(cube: &Cube, region: &str, area: &Area) -> Result<Cube, ExtractError> {
    let labels = cube
        .dim(REGION)
        .and_then(Coord::label_points)
        .ok_or_else(|| ExtractError::not_found(format!("{} has no {REGION} labels", cube.name())))?
        .to_vec();
    let label = area.value_label();
    let selected = cube.select_where(REGION, |i| {
        let l = labels[i].trim();
        l.eq_ignore_ascii_case(region) || l.eq_ignore_ascii_case(label)
    })?;
    non_empty(selected, REGION, || format!("{} has no data for {area}", cube.name()))
}

// ---------------------------------------------------------------------------
// Percentiles
// ---------------------------------------------------------------------------

/// Keep the requested entries of the `percentile` dimension, in the cube's
/// order.
///
/// # Errors
///
/// Returns [`ExtractError::DataNotFound`] when none of them is present.
pub fn select_percentiles(cube: &Cube, wanted: &[f64]) -> Result<Cube, ExtractError> {
    if cube.dim(PERCENTILE).is_none() {
        return Ok(cube.clone());
    }
    let points = numeric_points(cube, PERCENTILE)?.to_vec();
    let selected = cube.select_where(PERCENTILE, |i| {
        wanted.iter().any(|w| (w - points[i]).abs() < 1e-9)
    })?;
    non_empty(selected, PERCENTILE, || {
        format!("{} has none of the percentiles {wanted:?}", cube.name())
    })
}
