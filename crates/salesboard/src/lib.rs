//! # Salesboard
//!
//! Command-line front end for the sales analytics reports.
//!
//! Loads configuration and a dataset snapshot, runs one report through the
//! report manager and renders the response envelope as JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
