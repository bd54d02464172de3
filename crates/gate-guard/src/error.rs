//! Error types for the guard workflow.

use gate_core::enums::{CheckInState, VerdictKind};
use gate_store::StoreError;
use thiserror::Error;

/// Scan device failures. The session stays in `Scanning` and can be
/// cancelled back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The device could not be acquired (no camera, no reader attached).
    #[error("scan device unavailable: {0}")]
    Unavailable(String),

    /// The device stopped producing frames before anything was decoded.
    #[error("scan device closed before a pass was read")]
    Closed,
}

/// Why a confirmation request was turned down. The session is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfirmRejection {
    /// Only a valid pass can be confirmed as a normal entry.
    #[error("pass is {0}, not valid")]
    NotValid(VerdictKind),

    /// "Log expired anyway" only applies to an expired pass.
    #[error("pass is {0}, not expired")]
    NotExpired(VerdictKind),

    /// A write for this scan is still in flight.
    #[error("a check-in is already being saved")]
    InFlight,
}

/// Failures surfaced to the caller of [`crate::machine::CheckInSession`].
#[derive(Debug, Error)]
pub enum GuardError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The log store did not accept the record. The session is back in
    /// `Reviewing` and the confirmation can be retried.
    #[error("check-in was not saved: {0}")]
    Persistence(#[from] StoreError),

    #[error("confirmation rejected: {0}")]
    Rejected(#[from] ConfirmRejection),

    #[error("cannot {action} while {state}")]
    InvalidAction {
        action: &'static str,
        state: CheckInState,
    },

    /// The background write task panicked or was aborted.
    #[error("check-in write task failed: {0}")]
    Task(String),
}

/// Failures talking to a note enrichment service. Never escapes
/// [`crate::notes::NoteEnricher::annotate`].
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}
