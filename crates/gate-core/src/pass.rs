//! Visitor pass payload and the issuer that stamps it.
//!
//! A [`PassPayload`] can only be obtained two ways: [`issue_pass`], which
//! normalizes visitor input and stamps `issuedAtMillis` from the injected
//! clock, or the validity evaluator parsing scanned text. Fields are private
//! so nothing else can forge or re-stamp a pass.

use schemars::JsonSchema;
use serde::Serialize;

use crate::clock::Clock;
use crate::errors::CoreError;
use crate::validity::VALIDITY_WINDOW_MILLIS;

/// Plate value recorded when the visitor arrives without a vehicle.
pub const NO_VEHICLE_PLATE: &str = "N/A";

/// Visitor input as typed into the pass form. Carries no timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorDetails {
    pub full_name: String,
    pub phone_number: String,
    pub id_number: String,
    pub vehicle_plate: Option<String>,
    pub block_code: String,
    pub lot_code: String,
    pub unit_code: String,
}

/// The structured visitor data carried by an access pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassPayload {
    visitor_full_name: String,
    phone_number: String,
    id_number: String,
    vehicle_plate: String,
    block_code: String,
    lot_code: String,
    unit_code: String,
    issued_at_millis: i64,
}

impl PassPayload {
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn from_parts(
        visitor_full_name: String,
        phone_number: String,
        id_number: String,
        vehicle_plate: String,
        block_code: String,
        lot_code: String,
        unit_code: String,
        issued_at_millis: i64,
    ) -> Self {
        Self {
            visitor_full_name,
            phone_number,
            id_number,
            vehicle_plate,
            block_code,
            lot_code,
            unit_code,
            issued_at_millis,
        }
    }

    #[must_use]
    pub fn visitor_full_name(&self) -> &str {
        &self.visitor_full_name
    }

    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    #[must_use]
    pub fn id_number(&self) -> &str {
        &self.id_number
    }

    #[must_use]
    pub fn vehicle_plate(&self) -> &str {
        &self.vehicle_plate
    }

    #[must_use]
    pub fn block_code(&self) -> &str {
        &self.block_code
    }

    #[must_use]
    pub fn lot_code(&self) -> &str {
        &self.lot_code
    }

    #[must_use]
    pub fn unit_code(&self) -> &str {
        &self.unit_code
    }

    #[must_use]
    pub const fn issued_at_millis(&self) -> i64 {
        self.issued_at_millis
    }

    /// Destination shown on the log, e.g. `Blk A - 10 - 05`.
    #[must_use]
    pub fn destination_label(&self) -> String {
        format!(
            "Blk {} - {} - {}",
            self.block_code, self.lot_code, self.unit_code
        )
    }

    /// Milliseconds since issuance. Negative for future-dated passes.
    #[must_use]
    pub const fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.issued_at_millis)
    }

    /// Last instant (inclusive) at which the pass still evaluates as valid.
    #[must_use]
    pub const fn valid_until_millis(&self) -> i64 {
        self.issued_at_millis.saturating_add(VALIDITY_WINDOW_MILLIS)
    }

    /// Serialize to the compact JSON text handed to the barcode encoder.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Encoding` if serialization fails.
    pub fn encode(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Normalize visitor input and stamp a new pass with the clock's current time.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the first required field that is
/// empty after normalization.
pub fn issue_pass(details: &VisitorDetails, clock: &dyn Clock) -> Result<PassPayload, CoreError> {
    let visitor_full_name = details.full_name.trim().to_string();
    let phone_number = digits_only(&details.phone_number);
    let id_number = digits_only(&details.id_number);
    let vehicle_plate = normalize_plate(details.vehicle_plate.as_deref());
    let block_code = letters_upper(&details.block_code);
    let lot_code = details.lot_code.trim().to_string();
    let unit_code = details.unit_code.trim().to_string();

    for (field, value) in [
        ("full name", &visitor_full_name),
        ("phone number", &phone_number),
        ("id number", &id_number),
        ("block", &block_code),
        ("lot", &lot_code),
        ("unit", &unit_code),
    ] {
        if value.is_empty() {
            return Err(CoreError::Validation(format!("{field} is required")));
        }
    }

    Ok(PassPayload {
        visitor_full_name,
        phone_number,
        id_number,
        vehicle_plate,
        block_code,
        lot_code,
        unit_code,
        issued_at_millis: clock.now_millis(),
    })
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn letters_upper(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn normalize_plate(raw: Option<&str>) -> String {
    let plate = raw.map(str::trim).unwrap_or_default().to_uppercase();
    if plate.is_empty() {
        NO_VEHICLE_PLATE.to_string()
    } else {
        plate
    }
}
