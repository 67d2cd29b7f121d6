//! # Salesboard Common
//!
//! Shared types, utilities, and common functionality for salesboard.
//!
//! This crate provides the record-store entities, id newtypes, the error
//! type, and the logging bootstrap used by every other crate in the
//! workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use clock::*;
pub use error::{Result, SalesError};
pub use logging::{init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
