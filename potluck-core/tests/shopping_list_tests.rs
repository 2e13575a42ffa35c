//! End-to-end aggregation scenarios over realistic cart contents.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use potluck_core::{aggregate, render_text, CartLineItem};

fn item(ingredient: &str, unit: &str, quantity: &str) -> CartLineItem {
    CartLineItem {
        ingredient: ingredient.to_string(),
        unit: unit.to_string(),
        quantity: BigDecimal::from_str(quantity).unwrap(),
    }
}

/// R1 = [(flour, g, 200), (egg, pcs, 2)], R2 = [(flour, g, 300),
/// (milk, ml, 100)], both in the cart.
fn two_recipe_cart() -> Vec<CartLineItem> {
    vec![
        item("flour", "g", "200"),
        item("egg", "pcs", "2"),
        item("flour", "g", "300"),
        item("milk", "ml", "100"),
    ]
}

#[test]
fn merges_quantities_across_recipes_alphabetically() {
    let entries = aggregate(two_recipe_cart());

    let flat: Vec<(&str, &str, String)> = entries
        .iter()
        .map(|e| (e.ingredient.as_str(), e.unit.as_str(), e.total.to_string()))
        .collect();

    assert_eq!(
        flat,
        vec![
            ("egg", "pcs", "2".to_string()),
            ("flour", "g", "500".to_string()),
            ("milk", "ml", "100".to_string()),
        ]
    );
}

#[test]
fn aggregation_is_idempotent() {
    let first = render_text(&aggregate(two_recipe_cart()));
    let second = render_text(&aggregate(two_recipe_cart()));
    assert_eq!(first, second);
}

#[test]
fn removing_a_recipe_reaggregates_the_remainder() {
    // Same cart after R1 is deleted: only R2's line items remain.
    let entries = aggregate(vec![
        item("flour", "g", "300"),
        item("milk", "ml", "100"),
    ]);

    let flat: Vec<(&str, String)> = entries
        .iter()
        .map(|e| (e.ingredient.as_str(), e.total.to_string()))
        .collect();

    assert_eq!(
        flat,
        vec![("flour", "300".to_string()), ("milk", "100".to_string())]
    );
}

#[test]
fn one_entry_per_distinct_name_unit_pair() {
    let entries = aggregate(vec![
        item("sugar", "g", "50"),
        item("sugar", "tbsp", "1"),
        item("sugar", "g", "25"),
    ]);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].unit, "g");
    assert_eq!(entries[0].total, BigDecimal::from(75));
    assert_eq!(entries[1].unit, "tbsp");
}

#[test]
fn rendered_document_matches_export_format() {
    let text = render_text(&aggregate(two_recipe_cart()));
    assert_eq!(text, "egg — 2 pcs\nflour — 500 g\nmilk — 100 ml\n");
}
