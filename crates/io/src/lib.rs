//! # ukcp-io
//!
//! Read UKCP NetCDF files into [`Cube`](ukcp_cube::Cube)s and expand
//! wildcard path patterns. The [`CubeSource`] trait is the seam the
//! extraction engine loads through; [`NetcdfSource`] is the filesystem
//! implementation.

mod error;
mod glob;
mod netcdf_read;
mod source;

pub use error::IoError;
pub use glob::{expand, has_wildcard};
pub use netcdf_read::load_cube;
pub use source::{CubeSource, NetcdfSource, VariableSelector};
