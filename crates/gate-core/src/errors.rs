//! Cross-cutting error types for Gate.
//!
//! Domain-specific errors (`StoreError`, `GuardError`, ...) are defined in
//! their respective crates. A scanned pass that fails to parse is NOT an error:
//! it becomes a `Verdict::Malformed` value.

use thiserror::Error;

/// Errors raised by pass issuing and encoding.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Visitor input failed validation (empty required field, bad format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A payload could not be serialized for the pass transport.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
