//! Units registry and conversions.
//!
//! Each unit is a linear map onto a reference unit of its physical
//! dimension: `reference = value * scale + offset`. Differences (anomalies)
//! convert by scale alone, so a Kelvin difference equals a Celsius
//! difference numerically.

use crate::cube::Cube;
use crate::error::CubeError;

/// Physical dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Reference: K.
    Temperature,
    /// Reference: 1.
    Dimensionless,
    /// Reference: kg m-2 s-1.
    PrecipitationRate,
    /// Reference: m.
    Length,
    /// Reference: Pa.
    Pressure,
    /// Reference: m s-1.
    Speed,
    /// Reference: W m-2.
    EnergyFlux,
}

/// A recognised unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    symbol: &'static str,
    kind: UnitKind,
    scale: f64,
    offset: f64,
}

const SECONDS_PER_DAY: f64 = 86_400.0;

/// `(aliases, canonical symbol, kind, scale, offset)`.
const REGISTRY: &[(&[&str], &str, UnitKind, f64, f64)] = &[
    (&["K", "kelvin", "Kelvin", "degK"], "K", UnitKind::Temperature, 1.0, 0.0),
    (
        &["degC", "Celsius", "celsius", "deg_C", "°C", "degrees_C", "degree_Celsius"],
        "degC",
        UnitKind::Temperature,
        1.0,
        273.15,
    ),
    (&["1", "", "dimensionless", "fraction"], "1", UnitKind::Dimensionless, 1.0, 0.0),
    (&["%", "percent"], "%", UnitKind::Dimensionless, 0.01, 0.0),
    (
        &["kg m-2 s-1", "kg/m2/s", "kg m**-2 s**-1", "mm s-1", "mm/s"],
        "kg m-2 s-1",
        UnitKind::PrecipitationRate,
        1.0,
        0.0,
    ),
    (
        &["mm/day", "mm day-1", "mm d-1", "mm/d"],
        "mm/day",
        UnitKind::PrecipitationRate,
        1.0 / SECONDS_PER_DAY,
        0.0,
    ),
    (&["mm"], "mm", UnitKind::Length, 0.001, 0.0),
    (&["cm"], "cm", UnitKind::Length, 0.01, 0.0),
    (&["m", "metre", "meter", "metres", "meters"], "m", UnitKind::Length, 1.0, 0.0),
    (&["Pa", "pascal"], "Pa", UnitKind::Pressure, 1.0, 0.0),
    (&["hPa", "mbar", "millibar"], "hPa", UnitKind::Pressure, 100.0, 0.0),
    (&["m s-1", "m/s", "m s**-1"], "m s-1", UnitKind::Speed, 1.0, 0.0),
    (&["W m-2", "W/m2", "W m**-2"], "W m-2", UnitKind::EnergyFlux, 1.0, 0.0),
];

impl Unit {
    /// Look up a unit by any of its aliases (surrounding whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownUnit`].
    pub fn parse(s: &str) -> Result<Self, CubeError> {
        let needle = s.trim();
        REGISTRY
            .iter()
            .find(|(aliases, ..)| aliases.contains(&needle))
            .map(|&(_, symbol, kind, scale, offset)| Unit {
                symbol,
                kind,
                scale,
                offset,
            })
            .ok_or_else(|| CubeError::UnknownUnit {
                unit: s.to_string(),
            })
    }

    /// Canonical symbol.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Physical dimension.
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Returns `true` if the unit converts to the number 1.
    pub fn is_dimensionless(&self) -> bool {
        self.kind == UnitKind::Dimensionless
    }

    /// Returns `true` if values convert between the two units.
    pub fn is_convertible(&self, other: &Unit) -> bool {
        self.kind == other.kind
    }

    fn check(&self, to: &Unit) -> Result<(), CubeError> {
        if self.is_convertible(to) {
            Ok(())
        } else {
            Err(CubeError::IncompatibleUnits {
                from: self.symbol.to_string(),
                to: to.symbol.to_string(),
            })
        }
    }

    /// Convert an absolute value.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::IncompatibleUnits`] across dimensions.
    pub fn convert(&self, value: f64, to: &Unit) -> Result<f64, CubeError> {
        self.check(to)?;
        Ok((value * self.scale + self.offset - to.offset) / to.scale)
    }

    /// Convert a difference between two values (offsets cancel).
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::IncompatibleUnits`] across dimensions.
    pub fn convert_difference(&self, value: f64, to: &Unit) -> Result<f64, CubeError> {
        self.check(to)?;
        Ok(value * self.scale / to.scale)
    }
}

impl Cube {
    /// Convert absolute data to `target` units.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownUnit`] or
    /// [`CubeError::IncompatibleUnits`].
    pub fn convert_units(&self, target: &str) -> Result<Cube, CubeError> {
        self.convert_with(target, Unit::convert)
    }

    /// Convert difference data (anomalies) to `target` units.
    ///
    /// # Errors
    ///
    /// As for [`convert_units`](Self::convert_units).
    pub fn convert_difference_units(&self, target: &str) -> Result<Cube, CubeError> {
        self.convert_with(target, Unit::convert_difference)
    }

    fn convert_with<F>(&self, target: &str, f: F) -> Result<Cube, CubeError>
    where
        F: Fn(&Unit, f64, &Unit) -> Result<f64, CubeError>,
    {
        let from = Unit::parse(self.units())?;
        let to = Unit::parse(target)?;
        from.check(&to)?;
        let mut out = self.map_data(|v| f(&from, v, &to).unwrap_or(f64::NAN));
        out.set_units(to.symbol());
        Ok(out)
    }
}
