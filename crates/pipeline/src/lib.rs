//! # ukcp-pipeline
//!
//! Orchestration of one selection request. A [`Processor`] validates the
//! criteria, resolves the dataset files, loads and filters them through a
//! [`CubeSource`](ukcp_io::CubeSource), replaces absolute data with
//! anomalies for derived anomaly variables and applies the request's
//! sampling strategy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ukcp_files::DataLayout;
//! use ukcp_input::{AreaInput, InputData};
//! use ukcp_io::NetcdfSource;
//! use ukcp_pipeline::Processor;
//! use ukcp_vocab::{InputType, Vocabulary};
//!
//! let mut input = InputData::new(Arc::new(Vocabulary::builtin().unwrap()));
//! input.set(InputType::Collection, "land-rcm", None).unwrap();
//! input.set_many(InputType::Variable, ["tasAnom"], None).unwrap();
//! input.set_many(InputType::Scenario, ["rcp85"], None).unwrap();
//! input.set_many(InputType::Ensemble, ["01"], None).unwrap();
//! input.set(InputType::TemporalAverageType, "mon", None).unwrap();
//! input.set(InputType::Year, 2050, None).unwrap();
//! input.set(InputType::Baseline, "b8100", None).unwrap();
//! input.set_area(&AreaInput::Named("country|scotland".into())).unwrap();
//!
//! let layout = DataLayout::new("/data/ukcp18", "/data/ukcp-obs");
//! let output = Processor::new(&NetcdfSource, &layout).process(input).unwrap();
//! println!("{}", output.title);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `processor` | [`Processor`] and [`ProcessorOutput`] |
//! | `error` | Error types |

mod error;
mod processor;

pub use error::PipelineError;
pub use processor::{Processor, ProcessorOutput};
