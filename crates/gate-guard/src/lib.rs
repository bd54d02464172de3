//! # gate-guard
//!
//! The guard station: scan devices, note enrichment, and the check-in state
//! machine that turns one scan into at most one log record.
//!
//! A [`CheckInSession`] owns one guard's progress through
//! `idle → scanning → reviewing → confirming → logged`. It talks to a
//! [`ScanDevice`] for decoded pass text, evaluates it with the injected
//! clock, and appends a record through a [`gate_store::LogStore`] once the
//! guard confirms.

pub mod error;
pub mod machine;
pub mod notes;
pub mod transport;

pub use error::{ConfirmRejection, GuardError, NoteError, TransportError};
pub use machine::{CheckInSession, LoggedEntry, Review};
pub use notes::{GeminiNote, NoteEnricher, Notes, StaticNote};
pub use transport::{Capture, FramePoller, LineScanner, ScanDevice, Script, ScriptedDevice};
