//! Error types for ukcp-anomaly.

use ukcp_calendar::{CalendarError, Period};
use ukcp_cube::CubeError;

/// Error type for climatology and anomaly computation.
#[derive(Debug, thiserror::Error)]
pub enum AnomalyError {
    /// Returned when the baseline data has no time points in a sub-period.
    #[error("baseline data of {cube} has no time points in {period}")]
    EmptyBaseline {
        /// Name of the baseline cube.
        cube: String,
        /// Sub-period without data.
        period: Period,
    },

    /// Returned when a climatology has no entry for a sub-period the
    /// absolute data needs.
    #[error("climatology of {cube} has no entry for {period}")]
    MissingClimatology {
        /// Name of the climatology cube.
        cube: String,
        /// Sub-period that was looked up.
        period: Period,
    },

    /// Returned when none of the absolute data falls in the requested
    /// period.
    #[error("{cube} has no data in {period}")]
    NoData {
        /// Name of the absolute cube.
        cube: String,
        /// Requested time period code.
        period: String,
    },

    /// Wraps a cube operation failure, including dimension and unit
    /// mismatches between the absolute data and its climatology.
    #[error(transparent)]
    Cube(#[from] CubeError),

    /// Wraps a date decoding failure.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
