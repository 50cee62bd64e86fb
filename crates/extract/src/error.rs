//! Error types for ukcp-extract.

use ukcp_calendar::CalendarError;
use ukcp_cube::CubeError;
use ukcp_io::IoError;

/// Error type for data extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Returned when a filter leaves nothing selected.
    #[error("no data found: {what}")]
    DataNotFound {
        /// Description of the empty selection.
        what: String,
    },

    /// Returned when a variable has no entry in the vocabulary.
    #[error("unknown variable '{name}'")]
    UnknownVariable {
        /// Variable name.
        name: String,
    },

    /// Returned when a point area is requested at a resolution without a
    /// known grid spacing.
    #[error("no point window for spatial representation '{resolution}'")]
    UnknownResolution {
        /// Spatial representation of the request.
        resolution: String,
    },

    /// Returned when percentile overlays were requested for data that has
    /// neither samples nor resolved overlay files.
    #[error("probability levels requested but no overlay files were resolved")]
    MissingOverlay,

    /// Wraps a load failure.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Wraps a cube operation failure.
    #[error(transparent)]
    Cube(#[from] CubeError),

    /// Wraps a date arithmetic failure.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

impl ExtractError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        ExtractError::DataNotFound { what: what.into() }
    }
}
