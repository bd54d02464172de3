//! The guard-side check-in state machine.
//!
//! ```text
//! Idle ─start_scan→ Scanning ─decode→ Reviewing ─confirm→ Confirming ─settle→ Logged
//!                      │                  │                    │                │
//!                   cancel             cancel            append failed      scan_next
//!                      ↓                  ↓                    ↓                ↓
//!                    Idle               Idle              Reviewing         Scanning
//! ```
//!
//! Only `Confirming → Logged` writes to the log store, and only after the
//! append has succeeded. The write runs on its own task so a dropped caller
//! cannot tear it in half; while it is in flight further confirmations are
//! rejected and cancellation is refused.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gate_core::clock::{Clock, SystemClock};
use gate_core::enums::{CheckInState, VerdictKind};
use gate_core::ids::new_record_id;
use gate_core::record::CheckInRecord;
use gate_core::validity::{Verdict, evaluate};
use gate_store::{AppendReceipt, LogStore, StoreError};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::error::{ConfirmRejection, GuardError, TransportError};
use crate::notes::{NoteEnricher, Notes};
use crate::transport::{Capture, ScanDevice};

/// A scanned pass awaiting the guard's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub verdict: Verdict,
    pub scanned_at: DateTime<Utc>,
    /// Message of the last failed confirmation, if any.
    pub last_error: Option<String>,
}

/// A durably logged check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedEntry {
    pub record: CheckInRecord,
    pub receipt: AppendReceipt,
}

type PendingWrite = JoinHandle<Result<LoggedEntry, StoreError>>;

enum Phase {
    Idle,
    Scanning {
        capture: Option<Capture>,
        fault: Option<TransportError>,
    },
    Reviewing(Review),
    Confirming {
        review: Review,
        pending: PendingWrite,
    },
    Logged(LoggedEntry),
}

impl Phase {
    const fn state(&self) -> CheckInState {
        match self {
            Self::Idle => CheckInState::Idle,
            Self::Scanning { .. } => CheckInState::Scanning,
            Self::Reviewing(_) => CheckInState::Reviewing,
            Self::Confirming { .. } => CheckInState::Confirming,
            Self::Logged(_) => CheckInState::Logged,
        }
    }
}

/// One guard's check-in session.
pub struct CheckInSession<S, N = Notes, C = SystemClock> {
    store: Arc<S>,
    notes: Arc<N>,
    clock: Arc<C>,
    phase: Phase,
}

impl<S, N, C> CheckInSession<S, N, C>
where
    S: LogStore + 'static,
    N: NoteEnricher + 'static,
    C: Clock + 'static,
{
    pub const fn new(store: Arc<S>, notes: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            store,
            notes,
            clock,
            phase: Phase::Idle,
        }
    }

    // ---------------------------------------------------------------------
    // Observation
    // ---------------------------------------------------------------------

    #[must_use]
    pub const fn state(&self) -> CheckInState {
        self.phase.state()
    }

    /// The verdict under review (also while its confirmation is in flight).
    #[must_use]
    pub const fn verdict(&self) -> Option<&Verdict> {
        match &self.phase {
            Phase::Reviewing(review) | Phase::Confirming { review, .. } => Some(&review.verdict),
            _ => None,
        }
    }

    #[must_use]
    pub const fn review(&self) -> Option<&Review> {
        match &self.phase {
            Phase::Reviewing(review) | Phase::Confirming { review, .. } => Some(review),
            _ => None,
        }
    }

    #[must_use]
    pub const fn logged(&self) -> Option<&LoggedEntry> {
        match &self.phase {
            Phase::Logged(entry) => Some(entry),
            _ => None,
        }
    }

    /// Why scanning is blocked, if the device failed.
    #[must_use]
    pub const fn transport_fault(&self) -> Option<&TransportError> {
        match &self.phase {
            Phase::Scanning { fault, .. } => fault.as_ref(),
            _ => None,
        }
    }

    /// Whether a log write is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Confirming { .. })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ---------------------------------------------------------------------
    // Scanning
    // ---------------------------------------------------------------------

    /// `Idle → Scanning`. Also retries a faulted scan in place.
    ///
    /// On a device failure the session still enters `Scanning`, with the
    /// fault recorded, so the guard sees a blocked scanner and can cancel.
    ///
    /// # Errors
    ///
    /// `GuardError::Transport` if the device cannot be acquired;
    /// `GuardError::InvalidAction` outside `Idle` or a faulted `Scanning`.
    pub fn start_scan<D: ScanDevice + ?Sized>(&mut self, device: &mut D) -> Result<(), GuardError> {
        match &self.phase {
            Phase::Idle | Phase::Scanning { capture: None, .. } => self.acquire(device),
            _ => Err(self.invalid("start scanning")),
        }
    }

    /// `Logged → Scanning`: reset for the next visitor.
    ///
    /// # Errors
    ///
    /// Same as [`Self::start_scan`], but only valid from `Logged`.
    pub fn scan_next<D: ScanDevice + ?Sized>(&mut self, device: &mut D) -> Result<(), GuardError> {
        match self.phase {
            Phase::Logged(_) => self.acquire(device),
            _ => Err(self.invalid("scan next")),
        }
    }

    fn acquire<D: ScanDevice + ?Sized>(&mut self, device: &mut D) -> Result<(), GuardError> {
        match device.start_capture() {
            Ok(capture) => {
                self.enter(Phase::Scanning {
                    capture: Some(capture),
                    fault: None,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!("scan device failed to start: {e}");
                self.enter(Phase::Scanning {
                    capture: None,
                    fault: Some(e.clone()),
                });
                Err(e.into())
            }
        }
    }

    /// Wait for the device to decode something, then evaluate it.
    ///
    /// Dropping this future leaves the session in `Scanning` with the capture
    /// still owned; [`Self::cancel`] releases it.
    ///
    /// # Errors
    ///
    /// `GuardError::Transport(Closed)` if the device stops without a decode;
    /// the session stays in `Scanning` with the fault recorded.
    pub async fn await_decode(&mut self) -> Result<&Verdict, GuardError> {
        let decoded = match &mut self.phase {
            Phase::Scanning {
                capture: Some(capture),
                ..
            } => capture.next_decode().await,
            _ => return Err(self.invalid("wait for a scan")),
        };

        match decoded {
            Some(raw) => self.ingest_decode(&raw).await,
            None => {
                self.release_capture().await;
                self.enter(Phase::Scanning {
                    capture: None,
                    fault: Some(TransportError::Closed),
                });
                Err(TransportError::Closed.into())
            }
        }
    }

    /// `Scanning → Reviewing` with text decoded elsewhere. The device is
    /// released before the verdict is computed.
    ///
    /// # Errors
    ///
    /// `GuardError::InvalidAction` outside `Scanning`.
    pub async fn ingest_decode(&mut self, raw: &str) -> Result<&Verdict, GuardError> {
        if !matches!(self.phase, Phase::Scanning { .. }) {
            return Err(self.invalid("accept a scan"));
        }
        self.release_capture().await;

        let now = self.clock.now_millis();
        let verdict = evaluate(raw, now);
        tracing::debug!(verdict = %verdict.kind(), "scan evaluated");
        self.enter(Phase::Reviewing(Review {
            verdict,
            scanned_at: self.clock.now(),
            last_error: None,
        }));
        self.verdict()
            .ok_or_else(|| self.invalid("show the verdict"))
    }

    async fn release_capture(&mut self) {
        if let Phase::Scanning { capture, .. } = &mut self.phase {
            if let Some(capture) = capture.take() {
                capture.release().await;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Confirmation
    // ---------------------------------------------------------------------

    /// `Reviewing → Confirming` for a valid pass; the record is `GRANTED`.
    ///
    /// Returns as soon as the write is in flight; [`Self::settle`] reports
    /// how it ended.
    ///
    /// # Errors
    ///
    /// `GuardError::Rejected` if the verdict is not valid or a write is
    /// already in flight, `GuardError::InvalidAction` outside `Reviewing`.
    /// Nothing is written in either case.
    pub fn begin_confirm(&mut self) -> Result<(), GuardError> {
        self.begin_write(VerdictKind::Valid)
    }

    /// `Reviewing → Confirming` for an expired pass the guard chose to log
    /// anyway; the record is `EXPIRED`.
    ///
    /// # Errors
    ///
    /// As [`Self::begin_confirm`], with `NotExpired` for any other verdict.
    pub fn begin_confirm_expired(&mut self) -> Result<(), GuardError> {
        self.begin_write(VerdictKind::Expired)
    }

    fn begin_write(&mut self, required: VerdictKind) -> Result<(), GuardError> {
        let review = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Reviewing(review) => review,
            other => {
                self.phase = other;
                return Err(if self.is_pending() {
                    ConfirmRejection::InFlight.into()
                } else {
                    self.invalid("confirm")
                });
            }
        };

        let kind = review.verdict.kind();
        let payload = match review.verdict.payload() {
            Some(payload) if kind == required => payload.clone(),
            _ => {
                self.phase = Phase::Reviewing(review);
                return Err(match required {
                    VerdictKind::Expired => ConfirmRejection::NotExpired(kind),
                    _ => ConfirmRejection::NotValid(kind),
                }
                .into());
            }
        };

        let outcome = kind.outcome();
        let id = new_record_id();
        let at = self.clock.now();
        let store = Arc::clone(&self.store);
        let notes = Arc::clone(&self.notes);

        let pending: PendingWrite = tokio::spawn(async move {
            let note = notes.annotate(&payload, outcome, at).await;
            let record = CheckInRecord::from_pass(id, &payload, outcome, at, note);
            let receipt = store.append(&record).await?;
            Ok(LoggedEntry { record, receipt })
        });

        self.transition(CheckInState::Reviewing, Phase::Confirming { review, pending });
        Ok(())
    }

    /// Wait for the in-flight write. `Confirming → Logged` on success,
    /// `Confirming → Reviewing` on failure.
    ///
    /// Dropping this future leaves the write in flight; call again to
    /// observe it.
    ///
    /// # Errors
    ///
    /// `GuardError::Persistence` when the store rejected the record,
    /// `GuardError::Task` if the write task died, `GuardError::InvalidAction`
    /// when nothing is in flight.
    pub async fn settle(&mut self) -> Result<&LoggedEntry, GuardError> {
        let joined = match &mut self.phase {
            Phase::Confirming { pending, .. } => pending.await,
            _ => return Err(self.invalid("settle a check-in")),
        };

        let Phase::Confirming { mut review, .. } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return Err(self.invalid("settle a check-in"));
        };

        let failure = match joined {
            Ok(Ok(entry)) => {
                if entry.receipt.is_degraded() {
                    tracing::warn!(
                        id = %entry.record.id,
                        reason = entry.receipt.degraded_reason.as_deref().unwrap_or_default(),
                        "check-in kept in local fallback log"
                    );
                }
                self.transition(CheckInState::Confirming, Phase::Logged(entry));
                return self
                    .logged()
                    .ok_or_else(|| self.invalid("show the logged entry"));
            }
            Ok(Err(store_err)) => GuardError::Persistence(store_err),
            Err(join_err) => GuardError::Task(join_err.to_string()),
        };

        tracing::warn!("check-in append failed: {failure}");
        review.last_error = Some(failure.to_string());
        self.transition(CheckInState::Confirming, Phase::Reviewing(review));
        Err(failure)
    }

    /// Confirm a valid pass and wait for the write.
    ///
    /// # Errors
    ///
    /// `GuardError::Rejected` if the verdict is not valid or a write is in
    /// flight, otherwise as [`Self::settle`].
    pub async fn confirm(&mut self) -> Result<&LoggedEntry, GuardError> {
        self.begin_confirm()?;
        self.settle().await
    }

    /// Log an expired pass as `EXPIRED` and wait for the write.
    ///
    /// # Errors
    ///
    /// As [`Self::confirm`].
    pub async fn confirm_expired(&mut self) -> Result<&LoggedEntry, GuardError> {
        self.begin_confirm_expired()?;
        self.settle().await
    }

    // ---------------------------------------------------------------------
    // Cancel
    // ---------------------------------------------------------------------

    /// Back to `Idle` from anywhere except `Confirming`. Cancelling a scan
    /// releases the device before returning.
    ///
    /// # Errors
    ///
    /// `GuardError::InvalidAction` while a write is in flight.
    pub async fn cancel(&mut self) -> Result<(), GuardError> {
        match self.phase {
            Phase::Confirming { .. } => Err(self.invalid("cancel")),
            Phase::Idle => Ok(()),
            _ => {
                self.release_capture().await;
                self.enter(Phase::Idle);
                Ok(())
            }
        }
    }

    fn enter(&mut self, next: Phase) {
        self.transition(self.phase.state(), next);
    }

    /// Install `next`, checking the move against the session state table.
    /// `from` is explicit for callers that have already taken the phase out.
    fn transition(&mut self, from: CheckInState, next: Phase) {
        let to = next.state();
        debug_assert!(
            from.can_transition_to(to),
            "check-in transition {from} -> {to} is not in the state table"
        );
        tracing::debug!(%from, %to, "check-in transition");
        self.phase = next;
    }

    fn invalid(&self, action: &'static str) -> GuardError {
        GuardError::InvalidAction {
            action,
            state: self.state(),
        }
    }
}
