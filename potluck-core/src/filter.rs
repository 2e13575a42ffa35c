use uuid::Uuid;

use crate::error::Error;

/// The recognized recipe filters, parsed from a raw query string.
///
/// Exactly four keys are recognized: `author`, `tags` (repeatable, OR
/// within), `is_favorited` and `is_in_shopping_cart`. Anything else in the
/// query string passes through unused, so pagination parameters and future
/// additions never break existing clients. Filters of different kinds
/// compose with AND.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilters {
    pub author: Option<Uuid>,
    pub tags: Vec<String>,
    pub only_favorited: bool,
    pub only_in_shopping_cart: bool,
}

impl RecipeFilters {
    pub fn from_query(raw: &str) -> Result<Self, Error> {
        let mut filters = RecipeFilters::default();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "author" => {
                    let id = Uuid::parse_str(&value).map_err(|_| {
                        Error::validation(format!("invalid author id: {value:?}"))
                    })?;
                    filters.author = Some(id);
                }
                "tags" => {
                    if !value.is_empty() {
                        filters.tags.push(value.into_owned());
                    }
                }
                "is_favorited" => {
                    filters.only_favorited = parse_flag("is_favorited", &value)?;
                }
                "is_in_shopping_cart" => {
                    filters.only_in_shopping_cart =
                        parse_flag("is_in_shopping_cart", &value)?;
                }
                // Unrecognized keys are ignored by contract.
                _ => {}
            }
        }

        Ok(filters)
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_none()
            && self.tags.is_empty()
            && !self.only_favorited
            && !self.only_in_shopping_cart
    }

    /// True when an active filter reads the viewing user's own sets, so an
    /// anonymous request cannot evaluate it.
    pub fn requires_viewer(&self) -> bool {
        self.only_favorited || self.only_in_shopping_cart
    }

    /// Applies the filters to one recipe of a collection: the requested
    /// tag slugs are a union (any match keeps the recipe), the filter
    /// kinds intersect. The SQL predicates built from the same filters
    /// follow these semantics.
    pub fn matches(&self, recipe: &RecipeAttributes) -> bool {
        if let Some(author) = self.author {
            if recipe.author != author {
                return false;
            }
        }

        if !self.tags.is_empty()
            && !recipe.tags.iter().any(|slug| self.tags.contains(slug))
        {
            return false;
        }

        if self.only_favorited && !recipe.favorited_by_viewer {
            return false;
        }
        if self.only_in_shopping_cart && !recipe.in_viewer_cart {
            return false;
        }

        true
    }
}

/// The facets of one catalog recipe a filter decision looks at. The two
/// viewer flags are false when no viewing user is supplied.
#[derive(Debug, Clone)]
pub struct RecipeAttributes {
    pub author: Uuid,
    pub tags: Vec<String>,
    pub favorited_by_viewer: bool,
    pub in_viewer_cart: bool,
}

// A falsy value leaves the filter inactive rather than inverting it.
fn parse_flag(key: &str, value: &str) -> Result<bool, Error> {
    match value {
        "1" | "true" => Ok(true),
        "" | "0" | "false" => Ok(false),
        other => Err(Error::validation(format!(
            "invalid value for {key}: {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_no_filters() {
        let filters = RecipeFilters::from_query("").unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn parses_author() {
        let id = Uuid::new_v4();
        let filters = RecipeFilters::from_query(&format!("author={id}")).unwrap();
        assert_eq!(filters.author, Some(id));
    }

    #[test]
    fn invalid_author_is_a_validation_error() {
        let err = RecipeFilters::from_query("author=42").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn repeated_tags_accumulate() {
        let filters =
            RecipeFilters::from_query("tags=breakfast&tags=vegan").unwrap();
        assert_eq!(filters.tags, vec!["breakfast", "vegan"]);
    }

    #[test]
    fn empty_tag_values_are_skipped() {
        let filters = RecipeFilters::from_query("tags=&tags=vegan").unwrap();
        assert_eq!(filters.tags, vec!["vegan"]);
    }

    #[test]
    fn parses_boolean_flags() {
        let filters =
            RecipeFilters::from_query("is_favorited=1&is_in_shopping_cart=true")
                .unwrap();
        assert!(filters.only_favorited);
        assert!(filters.only_in_shopping_cart);
    }

    #[test]
    fn falsy_flags_are_no_ops() {
        let filters =
            RecipeFilters::from_query("is_favorited=0&is_in_shopping_cart=false")
                .unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn bad_flag_value_is_a_validation_error() {
        let err = RecipeFilters::from_query("is_favorited=maybe").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let filters = RecipeFilters::from_query(
            "limit=20&offset=40&recipes_limit=3&search=soup&tags=vegan",
        )
        .unwrap();
        assert_eq!(filters.tags, vec!["vegan"]);
        assert!(filters.author.is_none());
    }

    #[test]
    fn percent_encoded_values_are_decoded() {
        let filters = RecipeFilters::from_query("tags=quick%20meals").unwrap();
        assert_eq!(filters.tags, vec!["quick meals"]);
    }

    #[test]
    fn viewer_scoped_filters_are_flagged() {
        assert!(!RecipeFilters::from_query("tags=vegan").unwrap().requires_viewer());
        assert!(RecipeFilters::from_query("is_favorited=1").unwrap().requires_viewer());
        assert!(RecipeFilters::from_query("is_in_shopping_cart=true")
            .unwrap()
            .requires_viewer());
        // A falsy flag deactivates the filter, so no viewer is needed.
        assert!(!RecipeFilters::from_query("is_favorited=0").unwrap().requires_viewer());
    }

    fn recipe(author: Uuid, tags: &[&str]) -> RecipeAttributes {
        RecipeAttributes {
            author,
            tags: tags.iter().map(|s| s.to_string()).collect(),
            favorited_by_viewer: false,
            in_viewer_cart: false,
        }
    }

    #[test]
    fn no_filters_match_everything() {
        let filters = RecipeFilters::default();
        assert!(filters.matches(&recipe(Uuid::new_v4(), &[])));
    }

    #[test]
    fn tag_filter_is_a_union() {
        let filters =
            RecipeFilters::from_query("tags=breakfast&tags=vegan").unwrap();
        // One matching slug out of several requested is enough.
        assert!(filters.matches(&recipe(Uuid::new_v4(), &["vegan"])));
        assert!(filters.matches(&recipe(Uuid::new_v4(), &["breakfast", "quick"])));
        assert!(!filters.matches(&recipe(Uuid::new_v4(), &["dinner"])));
        assert!(!filters.matches(&recipe(Uuid::new_v4(), &[])));
    }

    #[test]
    fn author_and_tag_filters_intersect() {
        let author = Uuid::new_v4();
        let filters =
            RecipeFilters::from_query(&format!("author={author}&tags=vegan")).unwrap();

        assert!(filters.matches(&recipe(author, &["vegan"])));
        // Matching tag but wrong author fails the intersection.
        assert!(!filters.matches(&recipe(Uuid::new_v4(), &["vegan"])));
        // Matching author but no requested tag fails too.
        assert!(!filters.matches(&recipe(author, &["dinner"])));
    }

    #[test]
    fn favorites_filter_composes_with_the_rest() {
        let filters =
            RecipeFilters::from_query("tags=vegan&is_favorited=1").unwrap();

        let mut favorited = recipe(Uuid::new_v4(), &["vegan"]);
        favorited.favorited_by_viewer = true;
        assert!(filters.matches(&favorited));

        // In the viewer's favorites but missing the tag, or vice versa.
        let mut untagged = recipe(Uuid::new_v4(), &["dinner"]);
        untagged.favorited_by_viewer = true;
        assert!(!filters.matches(&untagged));
        assert!(!filters.matches(&recipe(Uuid::new_v4(), &["vegan"])));
    }

    #[test]
    fn cart_filter_requires_membership() {
        let filters =
            RecipeFilters::from_query("is_in_shopping_cart=1").unwrap();
        let mut in_cart = recipe(Uuid::new_v4(), &[]);
        in_cart.in_viewer_cart = true;
        assert!(filters.matches(&in_cart));
        assert!(!filters.matches(&recipe(Uuid::new_v4(), &[])));
    }
}
