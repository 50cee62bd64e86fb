//! Coordinates: named point values with optional cell bounds.

use ukcp_calendar::{Calendar, CalendarDate, TimeUnits};

use crate::error::CubeError;

/// Relative tolerance used when comparing numeric coordinate points.
const COORD_RTOL: f64 = 1e-9;

/// Point values of a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValues {
    /// Numeric points (time offsets, projection metres, sample ids, ...).
    Numeric(Vec<f64>),
    /// String labels (region names, ensemble member ids, ...).
    Labels(Vec<String>),
}

impl CoordValues {
    /// Number of points.
    pub fn len(&self) -> usize {
        match self {
            CoordValues::Numeric(v) => v.len(),
            CoordValues::Labels(v) => v.len(),
        }
    }

    /// Returns `true` if there are no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, indices: &[usize]) -> Self {
        match self {
            CoordValues::Numeric(v) => CoordValues::Numeric(indices.iter().map(|&i| v[i]).collect()),
            CoordValues::Labels(v) => {
                CoordValues::Labels(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }

    fn extend(&mut self, other: &CoordValues) -> bool {
        match (self, other) {
            (CoordValues::Numeric(a), CoordValues::Numeric(b)) => a.extend_from_slice(b),
            (CoordValues::Labels(a), CoordValues::Labels(b)) => a.extend_from_slice(b),
            _ => return false,
        }
        true
    }

    fn matches(&self, other: &CoordValues) -> bool {
        match (self, other) {
            (CoordValues::Numeric(a), CoordValues::Numeric(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| close(x, y))
            }
            (CoordValues::Labels(a), CoordValues::Labels(b)) => a == b,
            _ => false,
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    if a == b || (a.is_nan() && b.is_nan()) {
        return true;
    }
    (a - b).abs() <= COORD_RTOL * a.abs().max(b.abs()).max(1.0)
}

/// A named coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Coord {
    name: String,
    values: CoordValues,
    bounds: Option<Vec<[f64; 2]>>,
    units: Option<String>,
    calendar: Option<Calendar>,
}

impl Coord {
    /// Creates a numeric coordinate.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: CoordValues::Numeric(values),
            bounds: None,
            units: None,
            calendar: None,
        }
    }

    /// Creates a string-label coordinate.
    pub fn labels<S: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            values: CoordValues::Labels(values.into_iter().map(Into::into).collect()),
            bounds: None,
            units: None,
            calendar: None,
        }
    }

    /// Creates a time coordinate from CF units and calendar.
    pub fn time(values: Vec<f64>, units: impl Into<String>, calendar: Calendar) -> Self {
        Self::numeric("time", values)
            .with_units(units)
            .with_calendar(calendar)
    }

    /// Sets the units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Sets the calendar (time coordinates only).
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Sets cell bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Coord`] if the bounds are not one pair per point
    /// or the coordinate holds labels.
    pub fn with_bounds(mut self, bounds: Vec<[f64; 2]>) -> Result<Self, CubeError> {
        if matches!(self.values, CoordValues::Labels(_)) {
            return Err(self.error("label coordinates cannot have bounds"));
        }
        if bounds.len() != self.len() {
            return Err(self.error(&format!(
                "{} bounds for {} points",
                bounds.len(),
                self.len()
            )));
        }
        self.bounds = Some(bounds);
        Ok(self)
    }

    pub(crate) fn error(&self, reason: &str) -> CubeError {
        CubeError::Coord {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Coordinate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Point values.
    pub fn values(&self) -> &CoordValues {
        &self.values
    }

    /// Numeric points, or `None` for a label coordinate.
    pub fn points(&self) -> Option<&[f64]> {
        match &self.values {
            CoordValues::Numeric(v) => Some(v),
            CoordValues::Labels(_) => None,
        }
    }

    /// Label points, or `None` for a numeric coordinate.
    pub fn label_points(&self) -> Option<&[String]> {
        match &self.values {
            CoordValues::Labels(v) => Some(v),
            CoordValues::Numeric(_) => None,
        }
    }

    /// Cell bounds, if present.
    pub fn bounds(&self) -> Option<&[[f64; 2]]> {
        self.bounds.as_deref()
    }

    /// Units string, if present.
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Calendar, if present.
    pub fn calendar(&self) -> Option<Calendar> {
        self.calendar
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // -----------------------------------------------------------------------
    // Time decoding
    // -----------------------------------------------------------------------

    /// Parsed CF time units of the coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Coord`] if the coordinate has no units, or the
    /// calendar error if the units do not parse. A missing calendar means
    /// `standard`, as in CF.
    pub fn time_units(&self) -> Result<TimeUnits, CubeError> {
        let units = self
            .units
            .as_deref()
            .ok_or_else(|| self.error("time coordinate has no units"))?;
        Ok(TimeUnits::parse(
            units,
            self.calendar.unwrap_or(Calendar::Standard),
        )?)
    }

    /// Points decoded to dates.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Coord`] for label coordinates, or the errors of
    /// [`time_units`](Self::time_units) and decoding.
    pub fn dates(&self) -> Result<Vec<CalendarDate>, CubeError> {
        let units = self.time_units()?;
        let points = self
            .points()
            .ok_or_else(|| self.error("label coordinate cannot hold times"))?;
        points
            .iter()
            .map(|&p| units.decode(p).map_err(CubeError::from))
            .collect()
    }

    /// Bounds decoded to `(start, end)` dates.
    ///
    /// Returns `Ok(None)` when the coordinate has no bounds.
    ///
    /// # Errors
    ///
    /// As for [`dates`](Self::dates).
    pub fn bound_dates(&self) -> Result<Option<Vec<(CalendarDate, CalendarDate)>>, CubeError> {
        let Some(bounds) = &self.bounds else {
            return Ok(None);
        };
        let units = self.time_units()?;
        bounds
            .iter()
            .map(|&[lo, hi]| -> Result<_, CubeError> { Ok((units.decode(lo)?, units.decode(hi)?)) })
            .collect::<Result<Vec<_>, CubeError>>()
            .map(Some)
    }

    // -----------------------------------------------------------------------
    // Structural operations
    // -----------------------------------------------------------------------

    /// Points (and bounds) at `indices`, in the given order.
    ///
    /// Indices must be in range; callers check against [`len`](Self::len).
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            values: self.values.select(indices),
            bounds: self
                .bounds
                .as_ref()
                .map(|b| indices.iter().map(|&i| b[i]).collect()),
            units: self.units.clone(),
            calendar: self.calendar,
        }
    }

    /// Append the points of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Coord`] if the kinds, units, calendars or bound
    /// presence differ.
    pub(crate) fn append(&mut self, other: &Coord) -> Result<(), CubeError> {
        if self.units != other.units || self.calendar != other.calendar {
            return Err(self.error(&format!(
                "units/calendar differ: {:?}/{:?} vs {:?}/{:?}",
                self.units, self.calendar, other.units, other.calendar
            )));
        }
        if self.bounds.is_some() != other.bounds.is_some() {
            return Err(self.error("bounds present on only one side"));
        }
        if !self.values.extend(&other.values) {
            return Err(self.error("cannot join numeric and label points"));
        }
        if let (Some(a), Some(b)) = (&mut self.bounds, &other.bounds) {
            a.extend_from_slice(b);
        }
        Ok(())
    }

    /// Returns `true` if name, kind, points, bounds and units agree.
    /// Numeric points compare with a small relative tolerance.
    pub fn matches(&self, other: &Coord) -> bool {
        self.name == other.name
            && self.units == other.units
            && self.calendar == other.calendar
            && self.values.matches(&other.values)
            && match (&self.bounds, &other.bounds) {
                (None, None) => true,
                (Some(a), Some(b)) => {
                    a.len() == b.len()
                        && a.iter()
                            .zip(b)
                            .all(|(x, y)| close(x[0], y[0]) && close(x[1], y[1]))
                }
                _ => false,
            }
    }

    /// Single-point coordinate spanning all points: the midpoint of the
    /// outer bounds (or of the extreme points when unbounded). Label
    /// coordinates keep their first label.
    pub(crate) fn collapsed(&self) -> Self {
        let (values, bounds) = match &self.values {
            CoordValues::Numeric(v) => {
                let (lo, hi) = match &self.bounds {
                    Some(b) if !b.is_empty() => (
                        b.iter().map(|x| x[0].min(x[1])).fold(f64::INFINITY, f64::min),
                        b.iter().map(|x| x[0].max(x[1])).fold(f64::NEG_INFINITY, f64::max),
                    ),
                    _ => (
                        v.iter().copied().fold(f64::INFINITY, f64::min),
                        v.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    ),
                };
                (CoordValues::Numeric(vec![(lo + hi) / 2.0]), Some(vec![[lo, hi]]))
            }
            CoordValues::Labels(v) => (
                CoordValues::Labels(v.first().cloned().into_iter().collect()),
                None,
            ),
        };
        Self {
            name: self.name.clone(),
            values,
            bounds,
            units: self.units.clone(),
            calendar: self.calendar,
        }
    }
}
