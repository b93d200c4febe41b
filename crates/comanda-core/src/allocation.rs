//! # Payment Allocation Validator
//!
//! Validates a proposed split of an order's outstanding balance into
//! immediate payments and deferred installments.
//!
//! ## Validation Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_allocation(request, today)                                    │
//! │                                                                         │
//! │  1. Per-payment / per-installment field shape                           │
//! │  2. Presence (at least one payment or installment)                      │
//! │  3. Installment collection (unique, 1..N, future due dates)             │
//! │  4. Change/category coupling (cash-only change, change ≤ paid)          │
//! │  5. Net positivity (amount − change > 0)                                │
//! │  6. Balance conciliation (Σ proposed ≤ remaining + 1 centavo)           │
//! │                                                                         │
//! │  Every stage runs; nothing short-circuits. The form shows every         │
//! │  invalid field at once                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stateless and pure: "today" is an explicit parameter, the engine holds no
//! memory between calls, and business-rule violations are returned as data.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::error::{Issue, IssueKind};
use crate::money::{Money, RawAmount};
use crate::types::{AllocationRequest, PaymentAtOnce};
use crate::validation::{
    validate_amount, validate_change, validate_due_date, validate_installment_number,
    validate_method_label, validate_note,
};
use crate::SETTLEMENT_TOLERANCE_CENTAVOS;

// =============================================================================
// Path Helpers
// =============================================================================

fn at_once_path(index: usize, field: &str) -> String {
    format!("pagamentos_vista.{index}.{field}")
}

fn installment_path(index: usize, field: &str) -> String {
    format!("parcelas.{index}.{field}")
}

// =============================================================================
// Allocation Validation
// =============================================================================

/// Validates an [`AllocationRequest`]. An empty result means the submission
/// may be persisted.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use comanda_core::allocation::validate_allocation;
/// use comanda_core::money::RawAmount;
/// use comanda_core::types::{AllocationRequest, PaymentAtOnce, PaymentCategory};
///
/// let request = AllocationRequest {
///     at_once: vec![PaymentAtOnce {
///         category: PaymentCategory::Pix,
///         method: "Pix".to_string(),
///         amount: RawAmount::Number(100.0),
///         change: RawAmount::Missing,
///         note: None,
///     }],
///     installments: vec![],
///     order_total: RawAmount::Number(150.0),
///     already_settled: RawAmount::Number(50.0),
///     already_in_installments: RawAmount::Missing,
/// };
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
/// assert!(validate_allocation(&request, today).is_empty());
/// ```
pub fn validate_allocation(request: &AllocationRequest, today: NaiveDate) -> Vec<Issue> {
    let mut issues = Vec::new();

    // Stage 1: per-payment field shape
    for (i, payment) in request.at_once.iter().enumerate() {
        collect_payment_shape_issues(payment, &mut issues, |field| at_once_path(i, field));
    }

    // Stage 1: per-installment field shape (due dates kept for stage 3)
    let mut due_dates: Vec<Option<NaiveDate>> = Vec::with_capacity(request.installments.len());
    for (i, installment) in request.installments.iter().enumerate() {
        if let Err(kind) = validate_installment_number(installment.number) {
            issues.push(Issue::new(installment_path(i, "numero"), kind));
        }
        for kind in validate_amount(&installment.amount) {
            issues.push(Issue::new(installment_path(i, "valor"), kind));
        }
        match validate_due_date(&installment.due_date) {
            Ok(date) => due_dates.push(Some(date)),
            Err(kind) => {
                issues.push(Issue::new(installment_path(i, "vencimento"), kind));
                due_dates.push(None);
            }
        }
    }

    // Stage 2: presence
    if request.at_once.is_empty() && request.installments.is_empty() {
        issues.push(Issue::at_root(IssueKind::EmptySubmission));
    }

    // Stage 3: installment collection invariants
    let mut seen = BTreeSet::new();
    for (i, installment) in request.installments.iter().enumerate() {
        if !seen.insert(installment.number) {
            issues.push(Issue::new(
                installment_path(i, "numero"),
                IssueKind::DuplicateInstallmentNumber {
                    number: installment.number,
                },
            ));
        }
    }
    let contiguous = seen.iter().zip(1i64..).all(|(&number, expected)| number == expected);
    if !request.installments.is_empty() && !contiguous {
        issues.push(Issue::new("parcelas", IssueKind::NonSequentialInstallments));
    }
    for (i, due_date) in due_dates.iter().enumerate() {
        if let Some(date) = due_date {
            if *date <= today {
                issues.push(Issue::new(
                    installment_path(i, "vencimento"),
                    IssueKind::PastDueDate,
                ));
            }
        }
    }

    // Stages 4 and 5: change coupling and net positivity
    for (i, payment) in request.at_once.iter().enumerate() {
        collect_payment_coupling_issues(payment, &mut issues, |field| at_once_path(i, field));
    }

    // Stage 6: balance conciliation
    let summary = request.settlement_summary();
    let proposed = summary.proposed_total();
    let tolerance = Money::from_centavos(SETTLEMENT_TOLERANCE_CENTAVOS);
    if proposed > summary.remaining + tolerance {
        warn!(
            proposed_centavos = proposed.centavos(),
            remaining_centavos = summary.remaining.centavos(),
            "allocation exceeds remaining balance"
        );
        issues.push(Issue::at_root(IssueKind::AllocationExceedsRemaining {
            proposed,
            remaining: summary.remaining,
        }));
    }

    debug!(
        payments = request.at_once.len(),
        installments = request.installments.len(),
        issue_count = issues.len(),
        "validated payment allocation"
    );

    issues
}

// =============================================================================
// Installment Settlement ("baixar parcela")
// =============================================================================

/// Validates paying down a single already-created installment.
///
/// Paths are relative to the settlement form (`valor_pago`, `troco`, ...).
/// The net paid value may not exceed the installment's remaining balance
/// beyond the 1-centavo tolerance.
pub fn validate_installment_settlement(
    installment_remaining: &RawAmount,
    payment: &PaymentAtOnce,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    collect_payment_shape_issues(payment, &mut issues, |field| field.to_string());
    collect_payment_coupling_issues(payment, &mut issues, |field| field.to_string());

    let remaining = installment_remaining.to_money();
    let net = payment.net_value();
    let tolerance = Money::from_centavos(SETTLEMENT_TOLERANCE_CENTAVOS);
    if net > remaining + tolerance {
        issues.push(Issue::new(
            "valor_pago",
            IssueKind::ExceedsInstallmentBalance {
                paid: net,
                remaining,
            },
        ));
    }

    issues
}

// =============================================================================
// Shared Per-Payment Checks
// =============================================================================

/// Stage-1 field shape rules for one at-once payment.
fn collect_payment_shape_issues(
    payment: &PaymentAtOnce,
    issues: &mut Vec<Issue>,
    path: impl Fn(&str) -> String,
) {
    if let Err(kind) = validate_method_label(&payment.method) {
        issues.push(Issue::new(path("forma_pagamento"), kind));
    }
    for kind in validate_amount(&payment.amount) {
        issues.push(Issue::new(path("valor_pago"), kind));
    }
    for kind in validate_change(&payment.change) {
        issues.push(Issue::new(path("troco"), kind));
    }
    if let Some(note) = &payment.note {
        if let Err(kind) = validate_note(note) {
            issues.push(Issue::new(path("observacao"), kind));
        }
    }
}

/// Stage-4/5 cross-field rules for one at-once payment.
fn collect_payment_coupling_issues(
    payment: &PaymentAtOnce,
    issues: &mut Vec<Issue>,
    path: impl Fn(&str) -> String,
) {
    let paid = payment.amount_paid();
    let change = payment.change_given();

    if !payment.category.allows_change() && change.is_positive() {
        issues.push(Issue::new(
            path("troco"),
            IssueKind::ChangeNotAllowedForCategory,
        ));
    }
    if payment.category.allows_change() && change > paid {
        issues.push(Issue::new(path("troco"), IssueKind::ChangeExceedsPaid));
    }

    if !payment.net_value().is_positive() {
        issues.push(Issue::new(
            path("valor_pago"),
            IssueKind::NonPositiveNetPayment,
        ));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
