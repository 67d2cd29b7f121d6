//! Application-wide error types using thiserror.

use salesboard_common::SalesError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration, dataset or report error.
    #[error(transparent)]
    Sales(#[from] SalesError),

    /// Rendering the response failed.
    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
