//! # ukcp-cube
//!
//! Labeled n-dimensional arrays ("cubes") for UKCP data: an `f64` array
//! with named, ordered dimension coordinates, auxiliary coordinates, units
//! and string attributes.
//!
//! Dimension order is significant. [`Cube::to_canonical_order`] restores
//! `(member-like, time, projection_y, projection_x | region)` after any
//! operation that disturbs it, and [`Cube::is_canonical`] checks it.
//!
//! ## Quick Start
//!
//! ```
//! use ndarray::{ArrayD, IxDyn};
//! use ukcp_cube::{Coord, Cube};
//!
//! let data = ArrayD::from_shape_vec(IxDyn(&[2, 1]), vec![283.15, 284.15]).unwrap();
//! let cube = Cube::new(
//!     "tas",
//!     data,
//!     vec![
//!         Coord::numeric("time", vec![0.0, 30.0]).with_units("days since 2000-01-01"),
//!         Coord::labels("region", ["london"]),
//!     ],
//!     "K",
//! )
//! .unwrap();
//!
//! let celsius = cube.convert_units("degC").unwrap();
//! assert!((celsius.data()[[0, 0]] - 10.0).abs() < 1e-9);
//! assert!(cube.is_canonical());
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `coord` | [`Coord`] and [`CoordValues`] |
//! | `cube` | [`Cube`], [`AuxCoord`], canonical dimension order |
//! | `ops` | Concatenation, stacking, arithmetic, reductions |
//! | `units` | [`Unit`] registry and conversions |
//! | `error` | Error types |

mod coord;
mod cube;
mod error;
mod ops;
mod units;

pub use coord::{Coord, CoordValues};
pub use cube::{
    AuxCoord, Cube, MEMBER_DIMS, PROJECTION_X, PROJECTION_Y, REGION, TIME, canonical_rank,
};
pub use error::CubeError;
pub use ops::{concatenate, stack};
pub use units::{Unit, UnitKind};
