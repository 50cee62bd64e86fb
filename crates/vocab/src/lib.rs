//! # ukcp-vocab
//!
//! Controlled vocabulary for UKCP selection criteria: which codes each
//! category accepts, their display labels, and the per-variable,
//! per-collection and per-baseline metadata the rest of the pipeline
//! consults.
//!
//! The vocabulary is an explicit immutable value. Build it once with
//! [`Vocabulary::builtin`] (or load a replacement with
//! [`Vocabulary::from_path`]) and share it behind an `Arc`.
//!
//! ## Quick Start
//!
//! ```
//! use ukcp_vocab::{Collection, Vocabulary};
//!
//! let vocab = Vocabulary::builtin().unwrap();
//! assert_eq!(vocab.label("scenario", "rcp85"), Some("RCP8.5"));
//! assert_eq!(vocab.value_for_label("region", "London"), Some("london"));
//!
//! let prob = vocab.collection(Collection::LandProb).unwrap();
//! assert_eq!(prob.default_resolution, "25km");
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `vocabulary` | [`Vocabulary`] and its TOML format |
//! | `types` | Closed category enums ([`InputType`], [`Collection`], ...) |
//! | `error` | Error types |

mod error;
mod types;
mod vocabulary;

pub use error::VocabError;
pub use types::{
    AreaType, Collection, DataType, InputType, QuantityClass, SamplingMethod, TemporalAverageType,
    TimePeriod, TimeSliceType, is_global_warming_level,
};
pub use vocabulary::{BaselineSpec, CollectionSpec, VariableSpec, Vocabulary};
