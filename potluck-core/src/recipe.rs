use std::collections::HashSet;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::error::Error;

/// One (ingredient, quantity) entry of a recipe draft. The unit lives on
/// the ingredient itself in the measurement unit registry.
#[derive(Debug, Clone)]
pub struct LineItemDraft {
    pub ingredient_id: Uuid,
    pub quantity: BigDecimal,
}

/// A recipe as submitted for creation or wholesale update, before any
/// database identity is assigned. Tags are referenced by slug.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub title: String,
    pub text: String,
    pub image: String,
    pub cooking_time_minutes: i32,
    pub line_items: Vec<LineItemDraft>,
    pub tags: Vec<String>,
}

impl RecipeDraft {
    /// Checks every invariant a stored recipe must satisfy. Runs before
    /// anything touches the database so a rejected draft has no side
    /// effects.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title cannot be empty"));
        }
        if self.text.trim().is_empty() {
            return Err(Error::validation("description cannot be empty"));
        }
        if self.image.trim().is_empty() {
            return Err(Error::validation("image reference is required"));
        }
        if self.cooking_time_minutes < 1 {
            return Err(Error::validation(
                "cooking time must be at least 1 minute",
            ));
        }
        if self.line_items.is_empty() {
            return Err(Error::validation(
                "recipe must have at least one ingredient",
            ));
        }
        if self.tags.is_empty() {
            return Err(Error::validation("recipe must have at least one tag"));
        }

        let zero = BigDecimal::from(0);
        let mut seen_ingredients = HashSet::new();
        for item in &self.line_items {
            if item.quantity <= zero {
                return Err(Error::validation(
                    "ingredient quantity must be positive",
                ));
            }
            if !seen_ingredients.insert(item.ingredient_id) {
                return Err(Error::validation(
                    "recipe lists the same ingredient twice",
                ));
            }
        }

        let mut seen_tags = HashSet::new();
        for slug in &self.tags {
            if !seen_tags.insert(slug.as_str()) {
                return Err(Error::validation("recipe lists the same tag twice"));
            }
        }

        Ok(())
    }
}

/// Parses a quantity from its decimal-string wire form. Quantities never
/// pass through floating point.
pub fn parse_quantity(raw: &str) -> Result<BigDecimal, Error> {
    BigDecimal::from_str(raw.trim())
        .map_err(|_| Error::validation(format!("invalid quantity: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecipeDraft {
        RecipeDraft {
            title: "Pancakes".to_string(),
            text: "Mix and fry.".to_string(),
            image: "recipes/images/pancakes.png".to_string(),
            cooking_time_minutes: 20,
            line_items: vec![LineItemDraft {
                ingredient_id: Uuid::new_v4(),
                quantity: parse_quantity("200").unwrap(),
            }],
            tags: vec!["breakfast".to_string()],
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn empty_title_rejected() {
        let mut d = draft();
        d.title = "   ".to_string();
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn zero_cooking_time_rejected() {
        let mut d = draft();
        d.cooking_time_minutes = 0;
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn empty_line_items_rejected() {
        let mut d = draft();
        d.line_items.clear();
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn empty_tags_rejected() {
        let mut d = draft();
        d.tags.clear();
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn non_positive_quantity_rejected() {
        let mut d = draft();
        d.line_items[0].quantity = parse_quantity("0").unwrap();
        assert!(matches!(d.validate(), Err(Error::Validation(_))));

        d.line_items[0].quantity = parse_quantity("-1.5").unwrap();
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn duplicate_ingredient_rejected() {
        let mut d = draft();
        let dup = d.line_items[0].clone();
        d.line_items.push(dup);
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn duplicate_tag_rejected() {
        let mut d = draft();
        d.tags.push("breakfast".to_string());
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn fractional_quantity_allowed() {
        let mut d = draft();
        d.line_items[0].quantity = parse_quantity("0.5").unwrap();
        assert_eq!(d.validate(), Ok(()));
    }

    #[test]
    fn quantity_parse_rejects_garbage() {
        assert!(parse_quantity("a lot").is_err());
        assert!(parse_quantity("").is_err());
    }
}
