//! # Validation Module
//!
//! Per-field validators shared by the payment allocation checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form layer (web dashboard / mobile app)                       │
//! │  ├── Input masks, steppers, immediate feedback                          │
//! │  └── UI clamps (option quantity caps)                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - per-field business rules                        │
//! │  ├── Amount shape (positivity, ceiling, decimal places)                 │
//! │  └── Labels, notes, installment numbers, due-date format                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: allocation - cross-field and collection rules                 │
//! │  └── Change coupling, sequencing, balance conciliation                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure. Validators return typed [`IssueKind`]s; the
//! callers attach field paths and assemble the collect-all issue list.

use chrono::NaiveDate;

use crate::error::IssueKind;
use crate::money::{Money, RawAmount};
use crate::{
    MAX_INSTALLMENT_COUNT, MAX_NOTE_LEN, MAX_PAYMENT_CENTAVOS, METHOD_LABEL_MAX, METHOD_LABEL_MIN,
};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a payment method label.
///
/// ## Rules
/// - Trimmed length between 2 and 100 characters
///
/// ## Example
/// ```rust
/// use comanda_core::validation::validate_method_label;
///
/// assert!(validate_method_label("Crédito Visa").is_ok());
/// assert!(validate_method_label("X").is_err());
/// ```
pub fn validate_method_label(label: &str) -> Result<(), IssueKind> {
    let label = label.trim();
    let len = label.chars().count();

    if len < METHOD_LABEL_MIN || len > METHOD_LABEL_MAX {
        return Err(IssueKind::InvalidMethodLabel {
            min: METHOD_LABEL_MIN,
            max: METHOD_LABEL_MAX,
        });
    }

    Ok(())
}

/// Validates an optional free-text note.
///
/// ## Rules
/// - Can be empty
/// - Maximum 255 characters
pub fn validate_note(note: &str) -> Result<(), IssueKind> {
    if note.chars().count() > MAX_NOTE_LEN {
        return Err(IssueKind::NoteTooLong { max: MAX_NOTE_LEN });
    }

    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates a paid/due amount field. Collects every applicable failure so
/// the form can show them all at once.
///
/// ## Rules
/// - At most two decimal places as typed
/// - Strictly positive after normalization
/// - At most the flat ceiling (R$ 99.999,99)
pub fn validate_amount(raw: &RawAmount) -> Vec<IssueKind> {
    let mut kinds = Vec::new();

    if !raw.has_at_most_two_decimals() {
        kinds.push(IssueKind::AmountPrecisionExceeded);
    }

    let amount = raw.to_money();
    if !amount.is_positive() {
        kinds.push(IssueKind::AmountNotPositive);
    }
    if amount.centavos() > MAX_PAYMENT_CENTAVOS {
        kinds.push(IssueKind::AmountAboveLimit {
            limit: Money::from_centavos(MAX_PAYMENT_CENTAVOS),
        });
    }

    kinds
}

/// Validates a change ("troco") field.
///
/// ## Rules
/// - At most two decimal places as typed
/// - Never negative (zero is the default for non-cash payments)
///
/// The change-vs-category and change-vs-paid couplings are cross-field rules
/// and live in the allocation validator.
pub fn validate_change(raw: &RawAmount) -> Vec<IssueKind> {
    let mut kinds = Vec::new();

    if !raw.has_at_most_two_decimals() {
        kinds.push(IssueKind::AmountPrecisionExceeded);
    }
    if raw.to_money().is_negative() {
        kinds.push(IssueKind::NegativeChange);
    }

    kinds
}

// =============================================================================
// Installment Field Validators
// =============================================================================

/// Validates one installment number in isolation.
///
/// ## Rules
/// - Between 1 and 360
///
/// Uniqueness and 1..N contiguity are collection rules and live in the
/// allocation validator.
pub fn validate_installment_number(number: i64) -> Result<(), IssueKind> {
    if number < 1 || number > MAX_INSTALLMENT_COUNT {
        return Err(IssueKind::InstallmentNumberOutOfRange {
            max: MAX_INSTALLMENT_COUNT,
        });
    }

    Ok(())
}

/// Validates and parses an ISO `YYYY-MM-DD` due date.
///
/// ## Rules
/// - Exactly the 10-character ISO shape (no time component)
/// - A real calendar date
///
/// ## Example
/// ```rust
/// use comanda_core::validation::validate_due_date;
///
/// assert!(validate_due_date("2030-02-28").is_ok());
/// assert!(validate_due_date("2030-02-30").is_err());
/// assert!(validate_due_date("28/02/2030").is_err());
/// ```
pub fn validate_due_date(raw: &str) -> Result<NaiveDate, IssueKind> {
    let raw = raw.trim();

    // chrono accepts unpadded fields; the wire contract does not.
    let shape_ok = raw.len() == 10
        && raw
            .bytes()
            .enumerate()
            .all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
    if !shape_ok {
        return Err(IssueKind::InvalidDueDate);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| IssueKind::InvalidDueDate)
}

// =============================================================================
// Unit Tests
// =============================================================================
