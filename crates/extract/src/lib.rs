//! # ukcp-extract
//!
//! Load the files of a resolved request through a
//! [`CubeSource`](ukcp_io::CubeSource), join the per-file fragments along
//! time, merge ensemble members and apply the request's time, spatial and
//! percentile filters.
//!
//! Cubes leave this crate in canonical dimension order, tagged with their
//! scenario.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `extractor` | [`DataExtractor`], [`Selection`] and the request title |
//! | `filter` | Year, period, area and percentile filters |
//! | `merge` | Fragment joining and member merging |
//! | `error` | Error types |

mod error;
mod extractor;
mod filter;
mod merge;

pub use error::ExtractError;
pub use extractor::{
    DataExtractor, Extraction, OVERLAY_PERCENTILES, SAMPLE, Selection, VariableCube, title,
};
pub use filter::{
    PERCENTILE, point_half_width, select_area, select_percentiles, select_period, select_years,
};
pub use merge::{ENSEMBLE_MEMBER, ENSEMBLE_MEMBER_ID, join_fragments, merge_members};
