//! # ukcp-anomaly
//!
//! Baseline climatologies and anomalies for derived `*Anom` variables of
//! the simulation and observation collections.
//!
//! A [`climatology`] holds one mean per sub-period (month, season or the
//! year) of the baseline years. [`anomaly`] splits absolute data into the
//! same sub-periods, subtracts each period's mean and reassembles the
//! result in time order.
//!
//! ## Quick Start
//!
//! ```
//! use ndarray::{ArrayD, IxDyn};
//! use ukcp_anomaly::{AnomalyRequest, anomaly, climatology};
//! use ukcp_calendar::Calendar;
//! use ukcp_cube::{Coord, Cube};
//! use ukcp_vocab::{TemporalAverageType, TimePeriod};
//!
//! let annual = |start: &str, values: Vec<f64>| {
//!     let n = values.len();
//!     Cube::new(
//!         "tas",
//!         ArrayD::from_shape_vec(IxDyn(&[n]), values).unwrap(),
//!         vec![Coord::time(
//!             (0..n).map(|y| 180.0 + 360.0 * y as f64).collect(),
//!             start,
//!             Calendar::Day360,
//!         )],
//!         "degC",
//!     )
//!     .unwrap()
//! };
//!
//! let baseline = annual("days since 1980-12-01", vec![9.0, 11.0]);
//! let clim = climatology(&baseline, TemporalAverageType::Annual).unwrap();
//!
//! let request = AnomalyRequest {
//!     tat: TemporalAverageType::Annual,
//!     time_period: TimePeriod::All,
//!     baseline: "b8100".into(),
//!     unit: "Celsius".into(),
//!     name: "tasAnom".into(),
//!     drop_geographic: false,
//! };
//! let anom = anomaly(&annual("days since 2049-12-01", vec![12.5]), &clim, &request).unwrap();
//! assert_eq!(anom.data().as_slice().unwrap(), &[2.5]);
//! assert_eq!(anom.attribute("baseline"), Some("b8100"));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `climatology` | Per-period baseline means |
//! | `anomaly` | [`AnomalyRequest`] and the anomaly computation |
//! | `error` | Error types |

mod anomaly;
mod climatology;
mod error;

pub use anomaly::{ANOMALY_TYPE_ATTRIBUTE, AnomalyRequest, BASELINE_ATTRIBUTE, RELATIVE_CHANGE, anomaly};
pub use climatology::{CLIM_PERIOD, climatology};
pub use error::AnomalyError;
