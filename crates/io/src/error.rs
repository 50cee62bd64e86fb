//! Error types for ukcp-io.

use std::path::PathBuf;

use ukcp_cube::CubeError;

/// Error type for all fallible operations in the ukcp-io crate.
///
/// Covers missing files, wildcard patterns that match nothing, NetCDF
/// library failures, and files whose contents cannot be mapped onto a
/// [`Cube`](ukcp_cube::Cube).
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when a wildcard pattern matches no files.
    #[error("no data found matching {pattern}")]
    DataNotFound {
        /// Pattern that was expanded.
        pattern: String,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when a named variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when no variable carries an accepted standard name.
    #[error("no {quantity} variable in {} (accepted standard names: {})", path.display(), accepted.join(", "))]
    NoMatchingVariable {
        /// Quantity class that was searched for.
        quantity: String,
        /// Standard names that would have matched.
        accepted: Vec<String>,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a variable's layout cannot be interpreted.
    #[error("variable '{name}' in {}: {reason}", path.display())]
    Layout {
        /// Variable name.
        name: String,
        /// Path to the file.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },

    /// Returned when a wildcard pattern is malformed.
    #[error("invalid pattern '{pattern}': {source}")]
    Glob {
        /// Offending pattern component.
        pattern: String,
        /// Underlying globset error.
        source: globset::Error,
    },

    /// Returned when a directory cannot be listed during expansion.
    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        /// Directory that was listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Wraps an error from cube construction.
    #[error(transparent)]
    Cube(#[from] CubeError),
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}
