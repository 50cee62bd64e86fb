//! Error types for ukcp-sampling.

use ukcp_calendar::Period;
use ukcp_cube::CubeError;
use ukcp_vocab::InputType;

/// Boxed error from a [`SupportingCubes`](crate::SupportingCubes)
/// implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for sample selection.
#[derive(Debug, thiserror::Error)]
pub enum SamplingError {
    /// Returned when a sampling setting is absent from the request.
    #[error("sampling needs {category}")]
    MissingSetting {
        /// Missing category.
        category: InputType,
    },

    /// Returned when a sampling setting cannot be used.
    #[error("invalid {category}: {value}")]
    InvalidSetting {
        /// Offending category.
        category: InputType,
        /// Offending value.
        value: String,
    },

    /// Returned when a sample id is not a position of the sample
    /// dimension.
    #[error("sample id {id} is out of range for {samples} samples")]
    IdOutOfRange {
        /// Requested id.
        id: usize,
        /// Length of the sample dimension.
        samples: usize,
    },

    /// Returned when more random draws are requested than there are
    /// samples.
    #[error("cannot draw {count} distinct samples from {samples}")]
    TooManyDraws {
        /// Requested draws.
        count: usize,
        /// Length of the sample dimension.
        samples: usize,
    },

    /// Returned when cubes sampled together disagree on the number of
    /// samples.
    #[error("{cube} has {found} samples, expected {expected}")]
    SampleCountMismatch {
        /// Name of the disagreeing cube.
        cube: String,
        /// Sample count of the first cube.
        expected: usize,
        /// Sample count of this cube.
        found: usize,
    },

    /// Returned when no supporting cube was found for a subset criterion.
    #[error("no supporting data for {variable} ({period})")]
    NoSupportingCube {
        /// Supporting variable.
        variable: String,
        /// Supporting temporal average.
        period: Period,
    },

    /// Returned when a subset criterion matched more than one cube.
    #[error("{count} supporting cubes for {variable} ({period}), expected one")]
    AmbiguousSupportingCubes {
        /// Supporting variable.
        variable: String,
        /// Supporting temporal average.
        period: Period,
        /// Number of cubes found.
        count: usize,
    },

    /// Returned when a subset window leaves no samples.
    #[error("subset on {variable} ({period}) leaves no samples")]
    EmptySubset {
        /// Supporting variable of the narrowing step.
        variable: String,
        /// Supporting temporal average.
        period: Period,
    },

    /// Wraps a failure to load supporting data.
    #[error("loading supporting data for {variable}: {source}")]
    Support {
        /// Supporting variable.
        variable: String,
        /// Underlying failure.
        source: BoxError,
    },

    /// Wraps a cube operation failure.
    #[error(transparent)]
    Cube(#[from] CubeError),
}
