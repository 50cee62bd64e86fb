//! Error types for ukcp-pipeline.

use ukcp_anomaly::AnomalyError;
use ukcp_extract::ExtractError;
use ukcp_files::FilesError;
use ukcp_input::InputError;
use ukcp_sampling::SamplingError;

/// Error type for a whole request.
///
/// Each stage's error is wrapped unchanged, so callers can tell invalid
/// parameters ([`PipelineError::Input`]) from missing data and mismatches.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Returned when an anomaly variable is requested without a baseline.
    #[error("{variable} needs a baseline")]
    NoBaseline {
        /// Anomaly variable.
        variable: String,
    },

    /// Returned when the baseline data has no cube for a loaded cube's
    /// variable and scenario.
    #[error("no baseline data for {variable} ({scenario})")]
    MissingBaseline {
        /// Variable of the loaded cube.
        variable: String,
        /// Scenario of the loaded cube, or `-`.
        scenario: String,
    },

    /// Validation failure.
    #[error(transparent)]
    Input(#[from] InputError),

    /// File resolution failure.
    #[error(transparent)]
    Files(#[from] FilesError),

    /// Loading or filtering failure.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Anomaly computation failure.
    #[error(transparent)]
    Anomaly(#[from] AnomalyError),

    /// Sample selection failure.
    #[error(transparent)]
    Sampling(#[from] SamplingError),
}
