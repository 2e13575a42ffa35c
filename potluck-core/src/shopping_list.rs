use std::collections::HashMap;

use bigdecimal::BigDecimal;

/// One (ingredient, quantity) row pulled from a recipe currently in a
/// user's cart. The same ingredient may appear once per recipe.
#[derive(Debug, Clone)]
pub struct CartLineItem {
    pub ingredient: String,
    pub unit: String,
    pub quantity: BigDecimal,
}

/// One merged entry of the final shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListEntry {
    pub ingredient: String,
    pub unit: String,
    pub total: BigDecimal,
}

/// Merges line items across a cart's recipes into one entry per distinct
/// (ingredient name, unit) pair. The unit is part of the grouping key, so
/// "flour (g)" and "flour (cups)" stay separate. Sums are exact decimal
/// additions.
///
/// Output is ordered alphabetically by ingredient name, case-insensitive,
/// with name and unit tie-breaks, so repeated calls over an unchanged cart
/// produce identical output. An empty input is a valid empty list.
pub fn aggregate(items: Vec<CartLineItem>) -> Vec<ShoppingListEntry> {
    let mut totals: HashMap<(String, String), BigDecimal> = HashMap::new();
    for item in items {
        *totals
            .entry((item.ingredient, item.unit))
            .or_insert_with(|| BigDecimal::from(0)) += item.quantity;
    }

    let mut entries: Vec<ShoppingListEntry> = totals
        .into_iter()
        .map(|((ingredient, unit), total)| ShoppingListEntry {
            ingredient,
            unit,
            total,
        })
        .collect();

    entries.sort_by_key(|entry| {
        (
            entry.ingredient.to_lowercase(),
            entry.ingredient.clone(),
            entry.unit.clone(),
        )
    });

    entries
}

/// Renders a shopping list as a flat text document, one
/// `name — totalQuantity unit` line per entry.
pub fn render_text(entries: &[ShoppingListEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{} — {} {}\n",
            entry.ingredient, entry.total, entry.unit
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(ingredient: &str, unit: &str, quantity: &str) -> CartLineItem {
        CartLineItem {
            ingredient: ingredient.to_string(),
            unit: unit.to_string(),
            quantity: BigDecimal::from_str(quantity).unwrap(),
        }
    }

    #[test]
    fn empty_cart_yields_empty_list() {
        assert!(aggregate(Vec::new()).is_empty());
    }

    #[test]
    fn merges_by_name_and_unit() {
        let entries = aggregate(vec![
            item("flour", "g", "200"),
            item("egg", "pcs", "2"),
            item("flour", "g", "300"),
            item("milk", "ml", "100"),
        ]);

        let flat: Vec<(String, String, String)> = entries
            .iter()
            .map(|e| (e.ingredient.clone(), e.unit.clone(), e.total.to_string()))
            .collect();

        assert_eq!(
            flat,
            vec![
                ("egg".to_string(), "pcs".to_string(), "2".to_string()),
                ("flour".to_string(), "g".to_string(), "500".to_string()),
                ("milk".to_string(), "ml".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn same_name_different_unit_stays_separate() {
        let entries = aggregate(vec![
            item("flour", "g", "200"),
            item("flour", "cups", "2"),
        ]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].unit, "cups");
        assert_eq!(entries[1].unit, "g");
    }

    #[test]
    fn ordering_is_case_insensitive() {
        let entries = aggregate(vec![
            item("Zucchini", "pcs", "1"),
            item("apple", "pcs", "3"),
            item("Butter", "g", "50"),
        ]);
        let names: Vec<&str> =
            entries.iter().map(|e| e.ingredient.as_str()).collect();
        assert_eq!(names, vec!["apple", "Butter", "Zucchini"]);
    }

    #[test]
    fn fractional_sums_are_exact() {
        // 0.1 + 0.2 is exactly 0.3 in decimal arithmetic.
        let entries = aggregate(vec![
            item("vanilla extract", "tsp", "0.1"),
            item("vanilla extract", "tsp", "0.2"),
        ]);
        assert_eq!(entries[0].total, BigDecimal::from_str("0.3").unwrap());
    }

    #[test]
    fn repeated_tenth_additions_do_not_drift() {
        let items: Vec<CartLineItem> =
            (0..1000).map(|_| item("water", "l", "0.1")).collect();
        let entries = aggregate(items);
        assert_eq!(entries[0].total, BigDecimal::from_str("100.0").unwrap());
    }

    #[test]
    fn render_produces_one_line_per_entry() {
        let entries = aggregate(vec![
            item("flour", "g", "200"),
            item("egg", "pcs", "2"),
            item("flour", "g", "300"),
        ]);
        assert_eq!(render_text(&entries), "egg — 2 pcs\nflour — 500 g\n");
    }

    #[test]
    fn render_of_empty_list_is_empty() {
        assert_eq!(render_text(&[]), "");
    }
}
