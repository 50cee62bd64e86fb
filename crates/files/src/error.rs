//! Error types for ukcp-files.

use ukcp_calendar::CalendarError;
use ukcp_vocab::Collection;

/// Error type for file resolution.
///
/// Resolution is pure string assembly, so these only arise when the
/// criteria reference something the vocabulary cannot resolve into a
/// directory layout.
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Returned when a baseline id has no entry in the vocabulary.
    #[error("unknown baseline '{id}'")]
    UnknownBaseline {
        /// Baseline id that was looked up.
        id: String,
    },

    /// Returned when a variable has no entry in the vocabulary.
    #[error("unknown variable '{name}'")]
    UnknownVariable {
        /// Variable name that was looked up.
        name: String,
    },

    /// Returned when baseline files are requested for a collection that
    /// publishes anomalies directly.
    #[error("{collection} has no baseline files")]
    NoBaselineFiles {
        /// Collection of the request.
        collection: Collection,
    },

    /// Returned when a probabilistic request lacks a setting its file
    /// names depend on.
    #[error("{collection} file names need a {what}")]
    MissingSetting {
        /// Collection of the request.
        collection: Collection,
        /// Name of the missing setting.
        what: &'static str,
    },

    /// Wraps a date arithmetic failure.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
