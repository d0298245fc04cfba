//! services/seeder/src/error.rs
//!
//! Defines the primary error type for the seeder service.

use crate::config::ConfigError;
use lms_seed_core::ports::PortError;

/// The primary error type for the `seeder` service.
#[derive(Debug, thiserror::Error)]
pub enum SeederError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the LMS port.
    #[error("LMS API error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., writing the users export).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
