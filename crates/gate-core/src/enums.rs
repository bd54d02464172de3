//! Outcome, verdict kind, and check-in state enums.
//!
//! `Outcome` serializes in SCREAMING case because that is the value stored in
//! the log tables and shown to guards. The other enums use `snake_case`.
//! `CheckInState` provides `allowed_next_states()` so the guard workflow can
//! enforce transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result recorded on a check-in log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Granted,
    Denied,
    Expired,
}

impl Outcome {
    /// Return the string representation used in storage and CSV export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "GRANTED",
            Self::Denied => "DENIED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VerdictKind
// ---------------------------------------------------------------------------

/// Discriminant of a [`crate::validity::Verdict`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Valid,
    Expired,
    Malformed,
}

impl VerdictKind {
    /// The log outcome a verdict of this kind maps to.
    #[must_use]
    pub const fn outcome(self) -> Outcome {
        match self {
            Self::Valid => Outcome::Granted,
            Self::Expired => Outcome::Expired,
            Self::Malformed => Outcome::Denied,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Expired => "expired",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckInState
// ---------------------------------------------------------------------------

/// State of a guard's check-in session.
///
/// ```text
/// idle → scanning → reviewing → confirming → logged
///          ↓            ↓            ↓          ↓
///         idle         idle      reviewing   scanning (scan next)
///       scanning                 (append      idle
///    (device fault,               failed)
///     retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckInState {
    Idle,
    Scanning,
    Reviewing,
    Confirming,
    Logged,
}

impl CheckInState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Scanning],
            Self::Scanning => &[Self::Reviewing, Self::Scanning, Self::Idle],
            Self::Reviewing => &[Self::Confirming, Self::Idle],
            Self::Confirming => &[Self::Logged, Self::Reviewing],
            Self::Logged => &[Self::Scanning, Self::Idle],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether a guard may cancel back to `Idle` from this state.
    #[must_use]
    pub fn is_cancellable(self) -> bool {
        self == Self::Idle || self.can_transition_to(Self::Idle)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Reviewing => "reviewing",
            Self::Confirming => "confirming",
            Self::Logged => "logged",
        }
    }
}

impl fmt::Display for CheckInState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
