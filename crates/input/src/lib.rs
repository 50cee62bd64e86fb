//! # ukcp-input
//!
//! Selection criteria for UKCP requests: [`InputData`] stores
//! vocabulary-checked `(value, label)` pairs per [`InputType`] category,
//! and [`validate`] applies the cross-field rules and defaults that turn
//! it into a [`ValidatedInput`].
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use ukcp_input::{AreaInput, InputData, validate};
//! use ukcp_vocab::{InputType, Vocabulary};
//!
//! let vocab = Arc::new(Vocabulary::builtin().unwrap());
//! let mut input = InputData::new(vocab);
//! input.set(InputType::Collection, "land-prob", None).unwrap();
//! input.set_many(InputType::Variable, ["tasAnom"], None).unwrap();
//! input.set_many(InputType::Scenario, ["rcp85"], None).unwrap();
//! input.set(InputType::TemporalAverageType, "mon", None).unwrap();
//! input.set(InputType::Year, 2050, None).unwrap();
//! input.set_area(&AreaInput::Named("admin_region|London".into())).unwrap();
//!
//! let validated = validate(input).unwrap();
//! assert_eq!(validated.year_range(), (2050, 2050));
//! assert_eq!(validated.spatial_representation(), "region");
//! assert_eq!(validated.baseline(), Some("b8100"));
//! ```
//!
//! [`InputType`]: ukcp_vocab::InputType

mod area;
mod error;
mod input;
mod validate;
mod value;

pub use area::{Area, AreaInput, AreaValue};
pub use error::InputError;
pub use input::InputData;
pub use validate::{
    DEFAULT_PROBABILISTIC_BASELINE, MAX_HIGHLIGHTED_MEMBERS, SAMPLE_COUNT_RANGE,
    SUBSET_PERCENTILE_RANGE, ValidatedInput, validate,
};
pub use value::InputValue;
