//! # Line-Item Pricing Composer
//!
//! Computes the monetary total of one order line and validates its add-on
//! selection against the group's cardinality constraints.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price_line(product, group, line)                                       │
//! │                                                                         │
//! │  1. base  = price-table entry for line.price_entry_id                   │
//! │              └── missing entry → PRICE_ENTRY_NOT_FOUND, base = 0        │
//! │  2. extra = add-on contribution per the group's selection mode          │
//! │              ├── Single:   chosen option price                          │
//! │              ├── Multiple: Σ chosen option prices                       │
//! │              └── Quantity: Σ qty × option price                         │
//! │  3. total = (base + extra) × max(line.quantity, 1)                      │
//! │                                                                         │
//! │  Lookup failures never abort: they contribute zero and are surfaced     │
//! │  as issues so the caller blocks submission                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure and synchronous. The form layer re-invokes it on every change to the
//! selection, price table, or quantity; identical inputs always produce
//! identical output.

use tracing::debug;

use crate::error::{Issue, IssueKind};
use crate::money::Money;
use crate::types::{AddOnGroup, AddOnSelection, OrderLine, Product, SelectionMode};

// =============================================================================
// Line Pricing Result
// =============================================================================

/// Result of pricing one order line. The caller renders `total` as currency
/// and blocks submission while `issues` is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePricing {
    pub total: Money,
    pub issues: Vec<Issue>,
}

impl LinePricing {
    /// True when the line can be submitted.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

// =============================================================================
// Composer
// =============================================================================

/// Prices one order line against its product and optional add-on group.
///
/// Issue paths are relative to the line (`id_categoria_opcao`, `adicionais`,
/// `adicionais.<option id>`); callers prefix them with the line's position
/// when rendering a whole order.
///
/// ## Example
/// ```rust
/// use comanda_core::money::RawAmount;
/// use comanda_core::pricing::price_line;
/// use comanda_core::types::{OrderLine, PriceEntry, Product};
///
/// let product = Product {
///     id: 1,
///     name: "Marmita".to_string(),
///     prices: vec![PriceEntry { id: 10, base_price: RawAmount::Number(20.0) }],
/// };
/// let line = OrderLine {
///     price_entry_id: 10,
///     quantity: 2,
///     note: None,
///     selection: None,
/// };
///
/// let priced = price_line(&product, None, &line);
/// assert!(priced.is_valid());
/// assert_eq!(priced.total.centavos(), 4000);
/// ```
pub fn price_line(product: &Product, group: Option<&AddOnGroup>, line: &OrderLine) -> LinePricing {
    let mut issues = Vec::new();

    let base = match product.price_entry(line.price_entry_id) {
        Some(entry) => entry.unit_price(),
        None => {
            issues.push(Issue::new(
                "id_categoria_opcao",
                IssueKind::PriceEntryNotFound {
                    entry_id: line.price_entry_id,
                },
            ));
            Money::zero()
        }
    };

    let extra = match group {
        None => {
            if line.selection.is_some() {
                issues.push(Issue::new("adicionais", IssueKind::SelectionModeMismatch));
            }
            Money::zero()
        }
        Some(group) => price_add_ons(group, line.selection.as_ref(), &mut issues),
    };

    // Callers clamp quantity in the UI; a non-positive value still prices as
    // a single unit rather than zeroing the line.
    let quantity = line.quantity.max(1);
    let total = (base + extra).multiply_quantity(quantity);

    debug!(
        product_id = product.id,
        price_entry_id = line.price_entry_id,
        quantity,
        total_centavos = total.centavos(),
        issue_count = issues.len(),
        "priced order line"
    );

    LinePricing { total, issues }
}

/// Add-on contribution for one unit of the line, validating the selection
/// shape and cardinality along the way.
fn price_add_ons(
    group: &AddOnGroup,
    selection: Option<&AddOnSelection>,
    issues: &mut Vec<Issue>,
) -> Money {
    match (group.mode, selection) {
        // -- Single ----------------------------------------------------------
        (SelectionMode::Single, None) => {
            if group.is_required() {
                issues.push(Issue::new(
                    "adicionais",
                    IssueKind::RequiredSingleChoiceMissing,
                ));
            }
            Money::zero()
        }
        (SelectionMode::Single, Some(AddOnSelection::Single { option_id })) => {
            match group.active_option(*option_id) {
                Some(option) => option.unit_price(),
                None => {
                    issues.push(Issue::new(
                        format!("adicionais.{option_id}"),
                        IssueKind::AddOnOptionNotFound {
                            option_id: *option_id,
                        },
                    ));
                    Money::zero()
                }
            }
        }

        // -- Multiple --------------------------------------------------------
        (SelectionMode::Multiple, None) => {
            check_cardinality(group, 0, issues);
            Money::zero()
        }
        (SelectionMode::Multiple, Some(AddOnSelection::Multiple { option_ids })) => {
            check_cardinality(group, option_ids.len() as i64, issues);

            let mut extra = Money::zero();
            for option_id in option_ids {
                match group.active_option(*option_id) {
                    Some(option) => extra += option.unit_price(),
                    None => issues.push(Issue::new(
                        format!("adicionais.{option_id}"),
                        IssueKind::AddOnOptionNotFound {
                            option_id: *option_id,
                        },
                    )),
                }
            }
            extra
        }

        // -- Quantity --------------------------------------------------------
        (SelectionMode::Quantity, None) => {
            check_cardinality(group, 0, issues);
            Money::zero()
        }
        (SelectionMode::Quantity, Some(AddOnSelection::Quantity { quantities })) => {
            let mut extra = Money::zero();
            let mut picks: i64 = 0;

            for (option_id, qty) in quantities {
                let qty = if *qty < 0 {
                    issues.push(Issue::new(
                        format!("adicionais.{option_id}"),
                        IssueKind::NegativeOptionQuantity,
                    ));
                    0
                } else {
                    *qty
                };
                picks += qty;

                match group.active_option(*option_id) {
                    Some(option) => extra += option.unit_price().multiply_quantity(qty),
                    None => issues.push(Issue::new(
                        format!("adicionais.{option_id}"),
                        IssueKind::AddOnOptionNotFound {
                            option_id: *option_id,
                        },
                    )),
                }
            }

            check_cardinality(group, picks, issues);
            extra
        }

        // -- Shape mismatch ---------------------------------------------------
        (_, Some(_)) => {
            issues.push(Issue::new("adicionais", IssueKind::SelectionModeMismatch));
            Money::zero()
        }
    }
}

/// Total-picks bounds check shared by Multiple and Quantity modes.
fn check_cardinality(group: &AddOnGroup, picked: i64, issues: &mut Vec<Issue>) {
    if picked < group.minimum {
        issues.push(Issue::new(
            "adicionais",
            IssueKind::MultiMinNotMet {
                minimum: group.minimum,
                picked,
            },
        ));
    }
    if let Some(maximum) = group.maximum {
        if picked > maximum {
            issues.push(Issue::new(
                "adicionais",
                IssueKind::MultiMaxExceeded { maximum, picked },
            ));
        }
    }
}

// =============================================================================
// Order Aggregation
// =============================================================================

/// Sums already-priced lines into the order total. Invariant under any
/// permutation of `lines`.
pub fn price_order(lines: &[LinePricing]) -> Money {
    lines.iter().map(|line| line.total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::RawAmount;
    use std::collections::{BTreeMap, BTreeSet};

    fn entry(id: i64, price: f64) -> crate::types::PriceEntry {
        crate::types::PriceEntry {
            id,
            base_price: RawAmount::Number(price),
        }
    }

    fn product() -> Product {
        Product {
            id: 1,
            name: "Marmita".to_string(),
            prices: vec![entry(10, 20.0), entry(11, 28.0)],
        }
    }

    fn option(id: i64, name: &str, price: f64) -> crate::types::AddOnOption {
        crate::types::AddOnOption {
            id,
            name: name.to_string(),
            price: RawAmount::Number(price),
            active: true,
        }
    }

    fn group(mode: SelectionMode, minimum: i64, maximum: Option<i64>) -> AddOnGroup {
        AddOnGroup {
            id: 1,
            name: "Adicionais".to_string(),
            mode,
            minimum,
            maximum,
            options: vec![
                option(1, "Bacon", 5.0),
                option(2, "Cheddar", 4.0),
                option(3, "Ovo", 2.5),
            ],
        }
    }

    fn line(entry_id: i64, quantity: i64, selection: Option<AddOnSelection>) -> OrderLine {
        OrderLine {
            price_entry_id: entry_id,
            quantity,
            note: None,
            selection,
        }
    }

    fn codes(pricing: &LinePricing) -> Vec<&str> {
        pricing.issues.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn test_scenario_base_plus_single_add_on_times_quantity() {
        // base 20.00 + single option 5.00, quantity 2 → 50.00
        let group = group(SelectionMode::Single, 1, None);
        let line = line(10, 2, Some(AddOnSelection::Single { option_id: 1 }));

        let priced = price_line(&product(), Some(&group), &line);
        assert!(priced.is_valid());
        assert_eq!(priced.total.centavos(), 5000);
    }

    #[test]
    fn test_price_entry_not_found_surfaces_but_still_prices() {
        let line = line(99, 3, None);
        let priced = price_line(&product(), None, &line);

        assert_eq!(codes(&priced), vec!["PRICE_ENTRY_NOT_FOUND"]);
        assert_eq!(priced.issues[0].path, "id_categoria_opcao");
        assert_eq!(priced.total, Money::zero());
    }

    #[test]
    fn test_selection_without_group_is_a_mismatch() {
        let line = line(10, 1, Some(AddOnSelection::Single { option_id: 1 }));
        let priced = price_line(&product(), None, &line);

        assert_eq!(codes(&priced), vec!["SELECTION_MODE_MISMATCH"]);
        // base still prices; only the stray selection is rejected
        assert_eq!(priced.total.centavos(), 2000);
    }

    #[test]
    fn test_selection_shape_must_match_mode() {
        let group = group(SelectionMode::Single, 0, None);
        let selection = AddOnSelection::Multiple {
            option_ids: BTreeSet::from([1, 2]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(selection)));

        assert_eq!(codes(&priced), vec!["SELECTION_MODE_MISMATCH"]);
        assert_eq!(priced.total.centavos(), 2000);
    }

    #[test]
    fn test_required_single_choice_missing() {
        let group = group(SelectionMode::Single, 1, None);
        let priced = price_line(&product(), Some(&group), &line(10, 1, None));

        assert_eq!(codes(&priced), vec!["REQUIRED_SINGLE_CHOICE_MISSING"]);
    }

    #[test]
    fn test_optional_single_choice_may_be_absent() {
        let group = group(SelectionMode::Single, 0, None);
        let priced = price_line(&product(), Some(&group), &line(10, 1, None));

        assert!(priced.is_valid());
        assert_eq!(priced.total.centavos(), 2000);
    }

    #[test]
    fn test_multiple_mode_prices_and_bounds() {
        let group = group(SelectionMode::Multiple, 1, Some(2));

        let ok = AddOnSelection::Multiple {
            option_ids: BTreeSet::from([1, 3]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(ok)));
        assert!(priced.is_valid());
        // 20.00 + 5.00 + 2.50
        assert_eq!(priced.total.centavos(), 2750);

        let too_few = AddOnSelection::Multiple {
            option_ids: BTreeSet::new(),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(too_few)));
        assert_eq!(codes(&priced), vec!["MULTI_MIN_NOT_MET"]);

        let too_many = AddOnSelection::Multiple {
            option_ids: BTreeSet::from([1, 2, 3]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(too_many)));
        assert_eq!(codes(&priced), vec!["MULTI_MAX_EXCEEDED"]);
    }

    #[test]
    fn test_unselected_required_multiple_group_is_invalid() {
        let group = group(SelectionMode::Multiple, 1, None);
        let priced = price_line(&product(), Some(&group), &line(10, 1, None));

        assert_eq!(codes(&priced), vec!["MULTI_MIN_NOT_MET"]);
    }

    #[test]
    fn test_quantity_mode_bounds() {
        // minimum 1, maximum 3
        let group = group(SelectionMode::Quantity, 1, Some(3));

        let zero_picks = AddOnSelection::Quantity {
            quantities: BTreeMap::from([(1, 0)]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(zero_picks)));
        assert_eq!(codes(&priced), vec!["MULTI_MIN_NOT_MET"]);

        let four_picks = AddOnSelection::Quantity {
            quantities: BTreeMap::from([(1, 2), (2, 2)]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(four_picks)));
        assert_eq!(codes(&priced), vec!["MULTI_MAX_EXCEEDED"]);

        let two_picks = AddOnSelection::Quantity {
            quantities: BTreeMap::from([(1, 1), (3, 1)]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(two_picks)));
        assert!(priced.is_valid());
        // 20.00 + 1×5.00 + 1×2.50
        assert_eq!(priced.total.centavos(), 2750);
    }

    #[test]
    fn test_quantity_mode_weights_prices() {
        let group = group(SelectionMode::Quantity, 0, None);
        let selection = AddOnSelection::Quantity {
            quantities: BTreeMap::from([(1, 2), (3, 3)]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 2, Some(selection)));

        assert!(priced.is_valid());
        // (20.00 + 2×5.00 + 3×2.50) × 2 = 75.00
        assert_eq!(priced.total.centavos(), 7500);
    }

    #[test]
    fn test_negative_option_quantity_is_a_shape_issue() {
        let group = group(SelectionMode::Quantity, 0, None);
        let selection = AddOnSelection::Quantity {
            quantities: BTreeMap::from([(1, -2), (3, 1)]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(selection)));

        assert_eq!(codes(&priced), vec!["NEGATIVE_OPTION_QUANTITY"]);
        assert_eq!(priced.issues[0].path, "adicionais.1");
        // the negative entry contributes zero picks and zero money
        assert_eq!(priced.total.centavos(), 2250);
    }

    #[test]
    fn test_unknown_and_inactive_options_are_reported() {
        let mut group = group(SelectionMode::Multiple, 0, None);
        group.options[1].active = false;

        let selection = AddOnSelection::Multiple {
            option_ids: BTreeSet::from([1, 2, 99]),
        };
        let priced = price_line(&product(), Some(&group), &line(10, 1, Some(selection)));

        let mut codes = codes(&priced);
        codes.sort_unstable();
        assert_eq!(
            codes,
            vec!["ADD_ON_OPTION_NOT_FOUND", "ADD_ON_OPTION_NOT_FOUND"]
        );
        // only the active, known option contributes
        assert_eq!(priced.total.centavos(), 2500);
    }

    #[test]
    fn test_non_positive_quantity_clamps_to_one() {
        let priced = price_line(&product(), None, &line(10, 0, None));
        assert_eq!(priced.total.centavos(), 2000);

        let priced = price_line(&product(), None, &line(10, -5, None));
        assert_eq!(priced.total.centavos(), 2000);
    }

    #[test]
    fn test_price_line_is_idempotent() {
        let group = group(SelectionMode::Quantity, 1, Some(3));
        let selection = AddOnSelection::Quantity {
            quantities: BTreeMap::from([(1, 1), (2, 1)]),
        };
        let order_line = line(11, 3, Some(selection));

        let first = price_line(&product(), Some(&group), &order_line);
        let second = price_line(&product(), Some(&group), &order_line);
        assert_eq!(first, second);
    }

    #[test]
    fn test_price_order_is_order_independent() {
        let lines = vec![
            LinePricing {
                total: Money::from_centavos(5000),
                issues: vec![],
            },
            LinePricing {
                total: Money::from_centavos(1250),
                issues: vec![],
            },
            LinePricing {
                total: Money::from_centavos(399),
                issues: vec![],
            },
        ];

        let forward = price_order(&lines);
        let mut reversed = lines.clone();
        reversed.reverse();
        assert_eq!(forward, price_order(&reversed));
        assert_eq!(forward.centavos(), 6649);
    }
}
