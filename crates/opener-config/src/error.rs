//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment could not merge or extract the provider chain.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A required section has empty fields.
    #[error("Configuration section '{section}' is incomplete (missing: {})", .missing.join(", "))]
    NotConfigured {
        section: String,
        missing: Vec<&'static str>,
    },

    /// A field is set but unusable.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
