//! # ukcp-calendar
//!
//! Date arithmetic for the CF calendars used by UKCP datasets, plus the
//! meteorological-year and seasonal conventions the selection pipeline is
//! built around.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["units string"] -->|"TimeUnits::parse()"| B["TimeUnits"]
//!     B -->|".decode(f64)"| C["CalendarDate"]
//!     C -->|"met_year()"| D["meteorological year"]
//!     C -->|".month()"| E["Period::contains_month()"]
//!     F["year range"] -->|"met_year_months()"| G["(year, month) list"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use ukcp_calendar::{Calendar, Period, TimeUnits, met_year};
//!
//! let units = TimeUnits::parse("hours since 1970-01-01 00:00:00", Calendar::Day360).unwrap();
//! let date = units.decode(24.0 * 360.0).unwrap();
//! assert_eq!((date.year(), date.month(), date.day()), (1971, 1, 1));
//!
//! // December belongs to the following meteorological year.
//! assert_eq!(met_year(2017, 12).unwrap(), 2018);
//!
//! let jja = Period::from_code("jja").unwrap();
//! assert!(jja.contains_month(7));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `calendar` | Calendar kinds and day-count arithmetic |
//! | `date` | Calendar-aware date with time of day |
//! | `units` | CF `<step> since <epoch>` time units |
//! | `met_year` | Meteorological (December-start) years |
//! | `period` | Months, seasons and the annual pseudo-period |
//! | `error` | Error types |

mod calendar;
mod date;
mod error;
mod met_year;
mod period;
mod units;

pub use calendar::Calendar;
pub use date::CalendarDate;
pub use error::CalendarError;
pub use met_year::{MET_YEAR_START_MONTH, met_year, met_year_bounds, met_year_months};
pub use period::{MONTH_CODES, Period, Season};
pub use units::{TimeStep, TimeUnits};
