//! Cross-cutting error types for the issue opener.
//!
//! Domain-specific errors (`ConfigError`, `TrackerError`, `DispatchError`)
//! live in their respective crates and converge in `opener-cli`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (empty key, bad format).
    #[error("Validation error: {0}")]
    Validation(String),
}
