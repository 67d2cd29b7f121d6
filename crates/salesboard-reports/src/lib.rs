//! # Salesboard Reports
//!
//! Report assembly on top of the analytics engine.
//!
//! This crate owns the read interface to the record store, the bounded
//! store pool, the four report assemblers, and the manager that dispatches
//! report requests and turns failures into a uniform response.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod manager;
pub mod pool;
pub mod store;
pub mod traits;

// Report assemblers
pub mod group_performance;
pub mod time_series;
pub mod trend;
pub mod user_performance;

pub use group_performance::GroupPerformanceReport;
pub use manager::*;
pub use pool::*;
pub use store::*;
pub use time_series::TimeSeriesReport;
pub use traits::*;
pub use trend::TrendReport;
pub use user_performance::UserPerformanceReport;
