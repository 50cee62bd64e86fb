//! # ukcp-sampling
//!
//! Select along the `sample` dimension of probabilistic sample data. A
//! [`SamplingStrategy`] is built from a validated request and applied
//! identically to every variable's cube by [`sample`]:
//!
//! - `all` keeps everything;
//! - `id` keeps listed positions;
//! - `random` keeps distinct positions from a caller-supplied RNG;
//! - `subset` ranks samples by supporting variables, loaded through
//!   [`SupportingCubes`], and keeps a percentile window per variable.
//!
//! ## Quick Start
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use ukcp_sampling::random_ids;
//!
//! let ids = random_ids(3000, 100, &mut StdRng::seed_from_u64(42)).unwrap();
//! assert_eq!(ids.len(), 100);
//! assert!(ids.windows(2).all(|w| w[0] < w[1]));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `strategy` | [`SamplingStrategy`] and subset criteria |
//! | `sample` | Applying strategies, random draws, subset windows |
//! | `error` | Error types |

mod error;
mod sample;
mod strategy;

pub use error::{BoxError, SamplingError};
pub use sample::{
    NoSupport, SAMPLE, SupportingCubes, random_ids, sample, sample_means, subset_ids,
};
pub use strategy::{SUBSET_HALF_WIDTH, SamplingStrategy, SubsetCriterion};
