//! Error types for the coverage pass

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoverageError>;

/// Internal-invariant violations; nothing here is recoverable within the
/// pass
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("unexpected data type in toggle coverage expansion: {0}")]
    UnsupportedToggleType(String),
}
