//! # comanda-core: Pure Business Logic for Comanda
//!
//! This crate is the **heart** of Comanda's order flow. It contains the
//! pricing and payment-reconciliation rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Web dashboard (Next.js) / Mobile app (Expo)            │   │
//! │  │    Item form ──► Order review ──► Payment form ──► Submit       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process calls, plain data           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comanda-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ allocation │  │   │
//! │  │   │  Product  │  │   Money   │  │ price_line│  │  validate_ │  │   │
//! │  │   │  Payment  │  │ RawAmount │  │price_order│  │ allocation │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            Order-management API (out of scope here)             │   │
//! │  │       persists finalized orders, payments, installments         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, AddOnGroup, PaymentAtOnce, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Structured validation issues
//! - [`validation`] - Per-field business rule validation
//! - [`pricing`] - Line-item pricing composer
//! - [`allocation`] - Payment allocation validator
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Errors As Data**: Business-rule violations come back as issue lists, never panics
//!
//! The callers are event-driven form layers: they re-invoke [`pricing::price_line`],
//! [`pricing::price_order`] and [`allocation::validate_allocation`] on every relevant
//! input change and keep the latest result in their own state. The engine has no
//! memory of previous calls, so there is no staleness to manage and no cancellation
//! concept; debouncing is a caller concern.
//!
//! ## Example Usage
//!
//! ```rust
//! use comanda_core::money::RawAmount;
//! use comanda_core::pricing::price_line;
//! use comanda_core::types::{OrderLine, PriceEntry, Product};
//!
//! let product = Product {
//!     id: 7,
//!     name: "Prato executivo".to_string(),
//!     prices: vec![PriceEntry { id: 1, base_price: RawAmount::Text("24,90".into()) }],
//! };
//! let line = OrderLine { price_entry_id: 1, quantity: 2, note: None, selection: None };
//!
//! let priced = price_line(&product, None, &line);
//! assert_eq!(priced.total.format_brl(), "R$ 49,80");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use comanda_core::Money` instead of
// `use comanda_core::money::Money`

pub use allocation::{validate_allocation, validate_installment_settlement};
pub use error::{Issue, IssueKind};
pub use money::{Money, RawAmount};
pub use pricing::{price_line, price_order, LinePricing};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat ceiling for any single payment or installment amount (R$ 99.999,99).
///
/// ## Business Reason
/// Catches fat-finger input (an extra digit) at the field level. This is
/// independent of the aggregate remaining-balance check; the two ceilings are
/// deliberately separate layers.
pub const MAX_PAYMENT_CENTAVOS: i64 = 9_999_999;

/// Maximum installment number accepted on a single submission.
pub const MAX_INSTALLMENT_COUNT: i64 = 360;

/// Tolerance, in centavos, applied to balance conciliation comparisons.
///
/// ## Business Reason
/// Callers send totals that may have crossed a float boundary on their side;
/// one centavo of slack keeps a correct submission from bouncing while still
/// rejecting real overdrafts.
pub const SETTLEMENT_TOLERANCE_CENTAVOS: i64 = 1;

/// Minimum length of a payment method label.
pub const METHOD_LABEL_MIN: usize = 2;

/// Maximum length of a payment method label.
pub const METHOD_LABEL_MAX: usize = 100;

/// Maximum length of free-text notes on payments and order lines.
pub const MAX_NOTE_LEN: usize = 255;

/// Stepper cap the form layers apply to each quantity-mode add-on option
/// when the group has no maximum of its own.
///
/// The engine validates the *sum* of picks against the group bounds and never
/// clamps per-option values; this cap is published so every caller renders
/// the same stepper range.
pub const OPTION_QTY_UI_CAP: i64 = 99;
