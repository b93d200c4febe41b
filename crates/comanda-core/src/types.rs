//! # Domain Types
//!
//! Core domain types for the pricing and payment-allocation engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   AddOnGroup    │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  mode           │   │  price entry id │       │
//! │  │  precos[]       │   │  minimo/limite  │   │  quantidade     │       │
//! │  └─────────────────┘   │  opcoes[]       │   │  adicionais     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PaymentAtOnce   │   │   Installment   │   │AllocationRequest│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  tipo           │   │  numero         │   │  pagamentos[]   │       │
//! │  │  valor_pago     │   │  valor          │   │  parcelas[]     │       │
//! │  │  troco          │   │  vencimento     │   │  total/ja pago  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Contract
//! Field names on the wire are the Portuguese names the surrounding system
//! exchanges (`valor_pago`, `troco`, `vencimento`, ...). Rust field names
//! stay English; `#[serde(rename)]` bridges the two. Monetary fields arrive
//! raw ([`RawAmount`]) and are normalized before any arithmetic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;

use crate::money::{Money, RawAmount};

// =============================================================================
// Price Table
// =============================================================================

/// One entry of a product's price table. The customer-facing form picks an
/// entry by id (e.g. "small"/"large" price options of the same product).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceEntry {
    /// Price-option id referenced by order lines.
    #[serde(rename = "id_categoria_opcao")]
    pub id: i64,

    /// Base unit price for this option.
    #[serde(rename = "preco_base")]
    #[ts(type = "string | number | null")]
    pub base_price: RawAmount,
}

impl PriceEntry {
    /// Returns the normalized base unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.base_price.to_money()
    }
}

/// A product available for ordering, carrying its price table.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name shown on the order line.
    #[serde(rename = "nome")]
    pub name: String,

    /// Price table; one entry per selectable price option.
    #[serde(rename = "precos", default)]
    pub prices: Vec<PriceEntry>,
}

impl Product {
    /// Looks up a price-table entry by id.
    pub fn price_entry(&self, entry_id: i64) -> Option<&PriceEntry> {
        self.prices.iter().find(|entry| entry.id == entry_id)
    }
}

// =============================================================================
// Add-On Groups
// =============================================================================

/// How an add-on group is picked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SelectionMode {
    /// At most one option (radio group).
    #[serde(rename = "unica")]
    Single,
    /// A set of options (checkbox group).
    #[serde(rename = "multipla")]
    Multiple,
    /// A quantity per option (stepper group).
    #[serde(rename = "quantidade")]
    Quantity,
}

/// One selectable option inside an [`AddOnGroup`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddOnOption {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    /// Unit price added per pick.
    #[serde(rename = "valor")]
    #[ts(type = "string | number | null")]
    pub price: RawAmount,

    /// Inactive options are stale data from the caller's perspective; the
    /// engine treats them like unknown ids.
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl AddOnOption {
    /// Returns the normalized unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.price.to_money()
    }
}

/// A category's add-on group ("categoria de adicionais"): a set of options
/// with a selection mode and cardinality bounds. Configured by an
/// administrator; read-only to this engine.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddOnGroup {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "tipo_selecao")]
    pub mode: SelectionMode,

    /// Minimum required picks for a valid submission.
    #[serde(rename = "minimo", default)]
    pub minimum: i64,

    /// Maximum allowed picks; absent means unbounded.
    #[serde(rename = "limite", default)]
    pub maximum: Option<i64>,

    /// Ordered option list.
    #[serde(rename = "opcoes", default)]
    pub options: Vec<AddOnOption>,
}

impl AddOnGroup {
    /// Looks up an active option by id. Inactive options resolve to `None`
    /// (same policy as unknown ids).
    pub fn active_option(&self, option_id: i64) -> Option<&AddOnOption> {
        self.options
            .iter()
            .find(|opt| opt.id == option_id && opt.active)
    }

    /// True when the group demands at least one pick.
    #[inline]
    pub fn is_required(&self) -> bool {
        self.minimum > 0
    }
}

// =============================================================================
// Order Line Selection
// =============================================================================

/// The add-on choice carried by one order line. A discriminated union keyed
/// by the group's mode replaces the source system's dynamically keyed
/// `u_*/m_*/q_*` form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "mode")]
#[ts(export)]
pub enum AddOnSelection {
    /// Single-choice pick.
    #[serde(rename = "single")]
    Single { option_id: i64 },
    /// Multi-choice picks.
    #[serde(rename = "multiple")]
    Multiple { option_ids: BTreeSet<i64> },
    /// Quantity per option.
    #[serde(rename = "quantity")]
    Quantity { quantities: BTreeMap<i64, i64> },
}

/// One line of an order being composed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    /// Chosen price-table entry id.
    #[serde(rename = "id_categoria_opcao")]
    pub price_entry_id: i64,

    /// Line quantity; the composer clamps non-positive values up to 1.
    #[serde(rename = "quantidade")]
    pub quantity: i64,

    /// Free-text note for the kitchen/attendant.
    #[serde(rename = "observacao", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Add-on selection; absent when the product has no group.
    #[serde(rename = "adicionais", default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<AddOnSelection>,
}

// =============================================================================
// Payments
// =============================================================================

/// Category of an immediate settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentCategory {
    #[serde(rename = "cartao")]
    Card,
    #[serde(rename = "dinheiro")]
    Cash,
    #[serde(rename = "pix")]
    Pix,
}

impl PaymentCategory {
    /// Only cash payments may hand change back.
    #[inline]
    pub const fn allows_change(&self) -> bool {
        matches!(self, PaymentCategory::Cash)
    }
}

/// One immediate settlement ("pagamento à vista").
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentAtOnce {
    #[serde(rename = "tipo")]
    pub category: PaymentCategory,

    /// Free-text payment method label (e.g. "Crédito Visa").
    #[serde(rename = "forma_pagamento")]
    pub method: String,

    /// Amount handed over by the customer.
    #[serde(rename = "valor_pago")]
    #[ts(type = "string | number | null")]
    pub amount: RawAmount,

    /// Change returned ("troco"); only meaningful for cash.
    #[serde(rename = "troco", default)]
    #[ts(type = "string | number | null")]
    pub change: RawAmount,

    #[serde(rename = "observacao", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PaymentAtOnce {
    /// Normalized amount paid.
    #[inline]
    pub fn amount_paid(&self) -> Money {
        self.amount.to_money()
    }

    /// Normalized change given.
    #[inline]
    pub fn change_given(&self) -> Money {
        self.change.to_money()
    }

    /// Net value settled against the order: amount paid minus change.
    #[inline]
    pub fn net_value(&self) -> Money {
        self.amount_paid() - self.change_given()
    }
}

/// One deferred settlement ("parcela a prazo").
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Installment {
    /// Installment number; the collection must form 1..N without gaps.
    #[serde(rename = "numero")]
    pub number: i64,

    #[serde(rename = "valor")]
    #[ts(type = "string | number | null")]
    pub amount: RawAmount,

    /// Due date as ISO `YYYY-MM-DD`; must be strictly in the future.
    #[serde(rename = "vencimento")]
    pub due_date: String,
}

impl Installment {
    /// Normalized installment amount.
    #[inline]
    pub fn amount_due(&self) -> Money {
        self.amount.to_money()
    }
}

// =============================================================================
// Allocation Request
// =============================================================================

/// The unit submitted for validation when finalizing an order: the proposed
/// new payments plus the order's settlement context.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AllocationRequest {
    #[serde(rename = "pagamentos_vista", default)]
    pub at_once: Vec<PaymentAtOnce>,

    #[serde(rename = "parcelas", default)]
    pub installments: Vec<Installment>,

    /// Order grand total.
    #[serde(rename = "total_pedido")]
    #[ts(type = "string | number | null")]
    pub order_total: RawAmount,

    /// Amount already settled at-once in earlier submissions.
    #[serde(rename = "ja_pago", default)]
    #[ts(type = "string | number | null")]
    pub already_settled: RawAmount,

    /// Amount already committed to installments in earlier submissions.
    #[serde(rename = "em_parcelas", default)]
    #[ts(type = "string | number | null")]
    pub already_in_installments: RawAmount,
}

impl AllocationRequest {
    /// Outstanding balance: total minus everything previously settled or
    /// committed. Used as a threshold only; may be negative when stale
    /// context over-reports settlements, and is never stored.
    pub fn remaining_balance(&self) -> Money {
        self.order_total.to_money()
            - self.already_settled.to_money()
            - self.already_in_installments.to_money()
    }

    /// Aggregates the proposed figures for conciliation and display.
    pub fn settlement_summary(&self) -> SettlementSummary {
        let proposed_at_once: Money = self.at_once.iter().map(|p| p.net_value()).sum();
        let proposed_installments: Money =
            self.installments.iter().map(|i| i.amount_due()).sum();
        SettlementSummary {
            remaining: self.remaining_balance(),
            proposed_at_once,
            proposed_installments,
        }
    }
}

/// Conciliation figures derived from an [`AllocationRequest`]. Consumed by
/// the balance check and by callers rendering running totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SettlementSummary {
    /// Outstanding balance before this submission.
    pub remaining: Money,
    /// Sum of net values of the proposed at-once payments.
    pub proposed_at_once: Money,
    /// Sum of the proposed installment amounts.
    pub proposed_installments: Money,
}

impl SettlementSummary {
    /// Total the submission would settle or commit.
    #[inline]
    pub fn proposed_total(&self) -> Money {
        self.proposed_at_once + self.proposed_installments
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
