// Property-based coverage for the engine's core invariants:
// - money formatting/normalization round-trips
// - pricing is idempotent and order-independent
// - balance conciliation accepts exact covers and rejects overdrafts

use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::BTreeMap;

use comanda_core::allocation::validate_allocation;
use comanda_core::money::{Money, RawAmount};
use comanda_core::pricing::{price_line, price_order, LinePricing};
use comanda_core::types::{
    AddOnGroup, AddOnOption, AddOnSelection, AllocationRequest, OrderLine, PaymentAtOnce,
    PaymentCategory, PriceEntry, Product, SelectionMode,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn pix(amount: f64) -> PaymentAtOnce {
    PaymentAtOnce {
        category: PaymentCategory::Pix,
        method: "Pix".to_string(),
        amount: RawAmount::Number(amount),
        change: RawAmount::Missing,
        note: None,
    }
}

/// Mixed separator styles normalize to the same value
#[test]
fn test_separator_styles_agree() {
    let styles = ["1234.50", "1234,50", "1.234,50", "1,234.50", "R$ 1.234,50"];
    for style in styles {
        assert_eq!(
            RawAmount::Text(style.to_string()).to_money().centavos(),
            123_450,
            "style: {style}"
        );
    }
}

proptest! {
    /// Property: formatting then re-parsing recovers the exact value
    #[test]
    fn prop_format_parse_round_trip(centavos in 0i64..10_000_000) {
        let money = Money::from_centavos(centavos);
        let reparsed = RawAmount::Text(money.format_brl()).to_money();

        prop_assert_eq!(reparsed, money, "formatted: {}", money.format_brl());
    }

    /// Property: two-decimal numeric input normalizes without drift
    #[test]
    fn prop_two_decimal_numbers_normalize_exactly(centavos in 0i64..10_000_000) {
        let raw = RawAmount::Number(centavos as f64 / 100.0);

        prop_assert!(raw.has_at_most_two_decimals());
        prop_assert_eq!(raw.to_money().centavos(), centavos);
    }

    /// Property: the order total is invariant under line reordering
    #[test]
    fn prop_price_order_is_permutation_invariant(totals in prop::collection::vec(0i64..1_000_000, 0..12)) {
        let lines: Vec<LinePricing> = totals
            .iter()
            .map(|&t| LinePricing { total: Money::from_centavos(t), issues: vec![] })
            .collect();

        let mut sorted = lines.clone();
        sorted.sort_by_key(|line| line.total);
        let mut reversed = lines.clone();
        reversed.reverse();

        prop_assert_eq!(price_order(&lines), price_order(&sorted));
        prop_assert_eq!(price_order(&lines), price_order(&reversed));
    }

    /// Property: pricing the same line twice yields the same result
    #[test]
    fn prop_price_line_is_idempotent(
        base in 0i64..100_000,
        extra in 0i64..10_000,
        qty in 1i64..50,
        picks in 0i64..5,
    ) {
        let product = Product {
            id: 1,
            name: "Produto".to_string(),
            prices: vec![PriceEntry { id: 1, base_price: RawAmount::Number(base as f64 / 100.0) }],
        };
        let group = AddOnGroup {
            id: 1,
            name: "Adicionais".to_string(),
            mode: SelectionMode::Quantity,
            minimum: 0,
            maximum: Some(10),
            options: vec![AddOnOption {
                id: 1,
                name: "Extra".to_string(),
                price: RawAmount::Number(extra as f64 / 100.0),
                active: true,
            }],
        };
        let line = OrderLine {
            price_entry_id: 1,
            quantity: qty,
            note: None,
            selection: Some(AddOnSelection::Quantity {
                quantities: BTreeMap::from([(1, picks)]),
            }),
        };

        let first = price_line(&product, Some(&group), &line);
        let second = price_line(&product, Some(&group), &line);

        prop_assert_eq!(first.total, second.total);
        prop_assert_eq!(first.issues, second.issues);
        prop_assert_eq!(first.total.centavos(), (base + extra * picks) * qty);
    }

    /// Property: a single payment covering the remaining balance exactly
    /// always validates
    #[test]
    fn prop_exact_cover_validates(centavos in 1i64..=9_999_999) {
        let request = AllocationRequest {
            at_once: vec![pix(centavos as f64 / 100.0)],
            installments: vec![],
            order_total: RawAmount::Number(centavos as f64 / 100.0),
            already_settled: RawAmount::Missing,
            already_in_installments: RawAmount::Missing,
        };

        let issues = validate_allocation(&request, today());
        prop_assert!(issues.is_empty(), "issues: {issues:?}");
    }

    /// Property: proposing more than remaining plus tolerance is always
    /// rejected
    #[test]
    fn prop_overdraft_is_rejected(
        remaining in 100i64..9_000_000,
        over in 2i64..1_000,
    ) {
        let request = AllocationRequest {
            at_once: vec![pix((remaining + over) as f64 / 100.0)],
            installments: vec![],
            order_total: RawAmount::Number(remaining as f64 / 100.0),
            already_settled: RawAmount::Missing,
            already_in_installments: RawAmount::Missing,
        };

        let issues = validate_allocation(&request, today());
        prop_assert!(
            issues.iter().any(|i| i.code == "ALLOCATION_EXCEEDS_REMAINING"),
            "issues: {issues:?}"
        );
    }
}
