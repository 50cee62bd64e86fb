//! # ukcp-files
//!
//! Turn validated selection criteria into the NetCDF file patterns that
//! hold the requested data. Each dataset family has its own directory and
//! naming convention; [`resolve`] dispatches on the request's collection
//! and returns a [`FilePathSet`] grouped by variable, scenario and
//! ensemble member.
//!
//! Resolution touches no files. Patterns may end in `*` and are expanded
//! by the loader.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use ukcp_files::{DataLayout, resolve};
//! use ukcp_input::{AreaInput, InputData, validate};
//! use ukcp_vocab::{InputType, Vocabulary};
//!
//! let mut input = InputData::new(Arc::new(Vocabulary::builtin().unwrap()));
//! input.set(InputType::Collection, "land-prob", None).unwrap();
//! input.set_many(InputType::Variable, ["tasAnom"], None).unwrap();
//! input.set_many(InputType::Scenario, ["rcp85"], None).unwrap();
//! input.set(InputType::TemporalAverageType, "mon", None).unwrap();
//! input.set(InputType::Year, 2018, None).unwrap();
//! input.set_area(&AreaInput::Named("country|scotland".into())).unwrap();
//!
//! let files = resolve(&validate(input).unwrap(), &DataLayout::new("/data", "/obs"), None).unwrap();
//! let pattern = files.patterns().next().unwrap();
//! assert!(pattern.ends_with(
//!     "tasAnom_rcp85_land-prob_uk_country_percentile_b8100_1y_mon_20171201-20181130.nc"
//! ));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `resolve` | Request, baseline and overlay entry points |
//! | `prob` | `land-prob` layout |
//! | `sim` | Model simulation layout, CORDEX redirect, warming-level baselines |
//! | `obs` | HadUK-Grid layout |
//! | `date_range` | File-name date-range tokens |
//! | `layout` | Data roots and version directories |
//! | `path_set` | The [`FilePathSet`] tree |
//! | `error` | Error types |

mod date_range;
mod error;
mod layout;
mod obs;
mod path_set;
mod prob;
mod resolve;
mod sim;

pub use date_range::{
    PROB_CLIMATOLOGY_RANGE, WILDCARD, calendar_year_ranges, gregorian_month_ranges, met_year_range,
    met_year_ranges, model_month_ranges,
};
pub use error::FilesError;
pub use layout::{DEFAULT_VERSION, DataLayout};
pub use path_set::{EnsembleFiles, FilePathSet, ScenarioFiles, VariableFiles};
pub use resolve::{
    OVERLAY_FALLBACK_SPATIAL, overlay_spatial, resolve, resolve_overlay, spatial_directory,
};
pub use sim::{GWL_BASELINE_COLLECTION, GWL_BASELINE_SCENARIO, member_collection};
