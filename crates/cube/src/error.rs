//! Error types for the ukcp-cube crate.

use ukcp_calendar::CalendarError;

/// Error type for cube construction and manipulation.
#[derive(Debug, thiserror::Error)]
pub enum CubeError {
    /// Returned when data and coordinate lengths disagree.
    #[error("shape mismatch: data has shape {data:?}, coordinates imply {coords:?}")]
    Shape {
        /// Shape of the data array.
        data: Vec<usize>,
        /// Shape implied by the coordinates.
        coords: Vec<usize>,
    },

    /// Returned when a named dimension is not present.
    #[error("cube '{cube}' has no dimension '{name}'")]
    UnknownDimension {
        /// Dimension that was requested.
        name: String,
        /// Name of the cube.
        cube: String,
    },

    /// Returned when a named coordinate is not present.
    #[error("cube '{cube}' has no coordinate '{name}'")]
    UnknownCoord {
        /// Coordinate that was requested.
        name: String,
        /// Name of the cube.
        cube: String,
    },

    /// Returned when an index is out of range for a dimension.
    #[error("index {index} out of range for dimension '{dim}' of length {len}")]
    IndexOutOfBounds {
        /// Dimension name.
        dim: String,
        /// Offending index.
        index: usize,
        /// Length of the dimension.
        len: usize,
    },

    /// Returned when two cubes cannot be combined. Both operands are
    /// described so the failing pair can be identified from the message.
    #[error("cannot combine cubes ({reason}):\n  left:  {left}\n  right: {right}")]
    Mismatch {
        /// What disagreed.
        reason: String,
        /// Summary of the left operand.
        left: String,
        /// Summary of the right operand.
        right: String,
    },

    /// Returned when an operation needs at least one cube.
    #[error("no cubes to {operation}")]
    Empty {
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// Returned when a coordinate has the wrong kind for an operation.
    #[error("coordinate '{name}': {reason}")]
    Coord {
        /// Coordinate name.
        name: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a unit string is not recognised.
    #[error("unknown unit '{unit}'")]
    UnknownUnit {
        /// The unit string.
        unit: String,
    },

    /// Returned when units of different physical dimensions are converted.
    #[error("cannot convert '{from}' to '{to}'")]
    IncompatibleUnits {
        /// Source unit.
        from: String,
        /// Target unit.
        to: String,
    },

    /// Wraps an error originating from the ukcp-calendar crate.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
