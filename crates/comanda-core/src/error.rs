//! # Error Types
//!
//! Structured validation issues for the engine.
//!
//! ## Reporting Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Issue Reporting                                   │
//! │                                                                         │
//! │  IssueKind (typed, thiserror)  - what went wrong, with figures          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Issue { code, path, message } - what the form layer consumes           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  caller maps `path` to a form field and renders `message` under it      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Business-rule violations are data, never `Err` and never panics
//! 2. Each kind carries the figures its message interpolates
//! 3. Codes are stable SCREAMING_SNAKE strings the callers key UX logic on
//! 4. Messages are the pt-BR strings rendered verbatim under form fields

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Issue Kind
// =============================================================================

/// A single validation failure, typed and carrying its figures.
///
/// The `Display` impl (via `thiserror`) is the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IssueKind {
    // --- Shape -------------------------------------------------------------
    /// Payment method label outside the allowed length.
    #[error("forma de pagamento deve ter entre {min} e {max} caracteres")]
    InvalidMethodLabel { min: usize, max: usize },

    /// Free-text note too long.
    #[error("observação deve ter no máximo {max} caracteres")]
    NoteTooLong { max: usize },

    /// Amount missing, zero, or negative after normalization.
    #[error("valor deve ser maior que zero")]
    AmountNotPositive,

    /// Amount above the flat per-field ceiling.
    #[error("valor não pode exceder {}", .limit.format_brl())]
    AmountAboveLimit { limit: Money },

    /// Amount typed with more than two decimal places.
    #[error("valor deve ter no máximo 2 casas decimais")]
    AmountPrecisionExceeded,

    /// Negative change.
    #[error("troco não pode ser negativo")]
    NegativeChange,

    /// Installment number outside 1..=max.
    #[error("número da parcela deve estar entre 1 e {max}")]
    InstallmentNumberOutOfRange { max: i64 },

    /// Due date not an ISO `YYYY-MM-DD` calendar date.
    #[error("data de vencimento inválida, use o formato AAAA-MM-DD")]
    InvalidDueDate,

    // --- Presence ----------------------------------------------------------
    /// Neither at-once payments nor installments were submitted.
    #[error("informe ao menos um pagamento à vista ou uma parcela")]
    EmptySubmission,

    // --- Installment collection --------------------------------------------
    /// The same installment number appears more than once.
    #[error("número de parcela duplicado: {number}")]
    DuplicateInstallmentNumber { number: i64 },

    /// Installment numbers do not form a contiguous 1..N sequence.
    #[error("parcelas devem ser numeradas em sequência a partir de 1")]
    NonSequentialInstallments,

    /// Due date is today or earlier.
    #[error("data de vencimento deve ser posterior a hoje")]
    PastDueDate,

    // --- Change/category coupling ------------------------------------------
    /// Change recorded for a non-cash payment.
    #[error("troco só é permitido para pagamento em dinheiro")]
    ChangeNotAllowedForCategory,

    /// Change larger than the amount handed over.
    #[error("troco não pode exceder o valor pago")]
    ChangeExceedsPaid,

    /// Amount minus change is not positive.
    #[error("valor líquido do pagamento deve ser maior que zero")]
    NonPositiveNetPayment,

    // --- Conciliation ------------------------------------------------------
    /// Proposed total exceeds the outstanding balance.
    #[error(
        "total proposto {} excede o restante do pedido {}",
        .proposed.format_brl(),
        .remaining.format_brl()
    )]
    AllocationExceedsRemaining { proposed: Money, remaining: Money },

    /// Settling a single installment with more than its remaining balance.
    #[error(
        "valor líquido {} excede o saldo da parcela {}",
        .paid.format_brl(),
        .remaining.format_brl()
    )]
    ExceedsInstallmentBalance { paid: Money, remaining: Money },

    // --- Lookup / pricing --------------------------------------------------
    /// Order line references a price-table entry the product does not have.
    #[error("preço não encontrado para a opção {entry_id}")]
    PriceEntryNotFound { entry_id: i64 },

    /// Required single-choice group left unselected.
    #[error("adicional obrigatório: selecione uma opção")]
    RequiredSingleChoiceMissing,

    /// Fewer picks than the group's minimum.
    #[error("selecione ao menos {minimum} adicionais (selecionados: {picked})")]
    MultiMinNotMet { minimum: i64, picked: i64 },

    /// More picks than the group's maximum.
    #[error("selecione no máximo {maximum} adicionais (selecionados: {picked})")]
    MultiMaxExceeded { maximum: i64, picked: i64 },

    /// Selected option id unknown to the group (or inactive).
    #[error("opção de adicional não encontrada: {option_id}")]
    AddOnOptionNotFound { option_id: i64 },

    /// Negative quantity supplied for a quantity-mode option.
    #[error("quantidade de adicional não pode ser negativa")]
    NegativeOptionQuantity,

    /// Selection shape does not match the group's selection mode.
    #[error("seleção de adicionais não corresponde ao tipo do grupo")]
    SelectionModeMismatch,
}

impl IssueKind {
    /// Stable machine-readable code for this kind.
    pub const fn code(&self) -> &'static str {
        match self {
            IssueKind::InvalidMethodLabel { .. } => "INVALID_METHOD_LABEL",
            IssueKind::NoteTooLong { .. } => "NOTE_TOO_LONG",
            IssueKind::AmountNotPositive => "AMOUNT_NOT_POSITIVE",
            IssueKind::AmountAboveLimit { .. } => "AMOUNT_ABOVE_LIMIT",
            IssueKind::AmountPrecisionExceeded => "AMOUNT_PRECISION_EXCEEDED",
            IssueKind::NegativeChange => "NEGATIVE_CHANGE",
            IssueKind::InstallmentNumberOutOfRange { .. } => "INSTALLMENT_NUMBER_OUT_OF_RANGE",
            IssueKind::InvalidDueDate => "INVALID_DUE_DATE",
            IssueKind::EmptySubmission => "EMPTY_SUBMISSION",
            IssueKind::DuplicateInstallmentNumber { .. } => "DUPLICATE_INSTALLMENT_NUMBER",
            IssueKind::NonSequentialInstallments => "NON_SEQUENTIAL_INSTALLMENTS",
            IssueKind::PastDueDate => "PAST_DUE_DATE",
            IssueKind::ChangeNotAllowedForCategory => "CHANGE_NOT_ALLOWED_FOR_CATEGORY",
            IssueKind::ChangeExceedsPaid => "CHANGE_EXCEEDS_PAID",
            IssueKind::NonPositiveNetPayment => "NON_POSITIVE_NET_PAYMENT",
            IssueKind::AllocationExceedsRemaining { .. } => "ALLOCATION_EXCEEDS_REMAINING",
            IssueKind::ExceedsInstallmentBalance { .. } => "EXCEEDS_INSTALLMENT_BALANCE",
            IssueKind::PriceEntryNotFound { .. } => "PRICE_ENTRY_NOT_FOUND",
            IssueKind::RequiredSingleChoiceMissing => "REQUIRED_SINGLE_CHOICE_MISSING",
            IssueKind::MultiMinNotMet { .. } => "MULTI_MIN_NOT_MET",
            IssueKind::MultiMaxExceeded { .. } => "MULTI_MAX_EXCEEDED",
            IssueKind::AddOnOptionNotFound { .. } => "ADD_ON_OPTION_NOT_FOUND",
            IssueKind::NegativeOptionQuantity => "NEGATIVE_OPTION_QUANTITY",
            IssueKind::SelectionModeMismatch => "SELECTION_MODE_MISMATCH",
        }
    }
}

// =============================================================================
// Issue
// =============================================================================

/// A field-scoped validation issue as the form layer consumes it.
///
/// `path` uses dotted/indexed notation relative to the submitted document
/// (e.g. `pagamentos_vista.2.troco`); the empty path scopes the issue to the
/// submission as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Issue {
    pub code: String,
    pub path: String,
    pub message: String,
}

impl Issue {
    /// Builds an issue at `path` from a typed kind.
    pub fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        Issue {
            code: kind.code().to_string(),
            path: path.into(),
            message: kind.to_string(),
        }
    }

    /// Builds a submission-level issue (empty path).
    pub fn at_root(kind: IssueKind) -> Self {
        Issue::new("", kind)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
