//! # Salesboard Engine
//!
//! The analytics core: turns report parameters into a filter, buckets and
//! aggregates sales, derives period-over-period growth, and ranks and
//! projects the resulting rows.
//!
//! Everything here is pure computation over already-fetched records. The
//! engine performs no I/O and keeps no state between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod filter;
pub mod granularity;
pub mod growth;
pub mod ranking;

pub use aggregator::*;
pub use filter::*;
pub use granularity::*;
pub use growth::*;
pub use ranking::*;
