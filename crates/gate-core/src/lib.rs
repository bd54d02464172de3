//! # gate-core
//!
//! Core types for Gate, the condominium visitor check-in system.
//!
//! This crate provides the foundational types shared across all Gate crates:
//! - The pass payload and the issuer that stamps it
//! - The validity evaluator (tri-state verdict over scanned text)
//! - Check-in records and their outcomes
//! - Session state enum with allowed transitions
//! - Injectable clock and record ID generation
//! - Cross-cutting error types
//!
//! Nothing in here performs I/O. Storage lives in `gate-store`, the guard
//! workflow in `gate-guard`.

pub mod clock;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod pass;
pub mod record;
pub mod validity;
