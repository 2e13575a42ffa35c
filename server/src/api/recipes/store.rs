//! Catalog store operations shared by the recipe endpoints: request-body
//! to draft conversion, tag/ingredient resolution, line item and tag link
//! replacement, author checks, and the explicit delete cascade.

use diesel::prelude::*;
use potluck_core::{recipe::parse_quantity, Error, LineItemDraft, RecipeDraft};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::ApiError;
use crate::models::{NewRecipeIngredient, NewRecipeTag};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LineItemPayload {
    /// Ingredient id from the measurement unit registry
    pub ingredient_id: Uuid,
    /// Decimal quantity string, e.g. "200" or "0.5"
    pub quantity: String,
}

/// Request body shared by recipe creation and wholesale update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipePayload {
    pub title: String,
    pub text: String,
    /// Opaque image reference issued by the asset-storage collaborator;
    /// stored and returned unchanged.
    pub image: String,
    pub cooking_time_minutes: i32,
    pub ingredients: Vec<LineItemPayload>,
    /// Tag slugs
    pub tags: Vec<String>,
}

impl RecipePayload {
    /// Converts the wire payload into a validated draft. Rejected drafts
    /// never reach the database.
    pub fn into_draft(self) -> Result<RecipeDraft, Error> {
        let mut line_items = Vec::with_capacity(self.ingredients.len());
        for item in self.ingredients {
            line_items.push(LineItemDraft {
                ingredient_id: item.ingredient_id,
                quantity: parse_quantity(&item.quantity)?,
            });
        }

        let draft = RecipeDraft {
            title: self.title,
            text: self.text,
            image: self.image,
            cooking_time_minutes: self.cooking_time_minutes,
            line_items,
            tags: self.tags,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Resolves tag slugs to ids, rejecting slugs absent from the tag table.
pub(super) fn resolve_tag_ids(
    conn: &mut PgConnection,
    slugs: &[String],
) -> Result<Vec<Uuid>, ApiError> {
    let found: Vec<(Uuid, String)> = tags::table
        .filter(tags::slug.eq_any(slugs))
        .select((tags::id, tags::slug))
        .load(conn)?;

    for slug in slugs {
        if !found.iter().any(|(_, s)| s == slug) {
            return Err(Error::validation(format!("unknown tag: {slug}")).into());
        }
    }

    Ok(found.into_iter().map(|(id, _)| id).collect())
}

/// Checks that every referenced ingredient exists in the registry.
pub(super) fn check_ingredient_ids(
    conn: &mut PgConnection,
    line_items: &[LineItemDraft],
) -> Result<(), ApiError> {
    let ids: Vec<Uuid> = line_items.iter().map(|item| item.ingredient_id).collect();
    let known: Vec<Uuid> = ingredients::table
        .filter(ingredients::id.eq_any(&ids))
        .select(ingredients::id)
        .load(conn)?;

    for id in &ids {
        if !known.contains(id) {
            return Err(Error::validation(format!("unknown ingredient: {id}")).into());
        }
    }

    Ok(())
}

pub(super) fn insert_line_items(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    line_items: &[LineItemDraft],
) -> Result<(), diesel::result::Error> {
    let rows: Vec<NewRecipeIngredient> = line_items
        .iter()
        .map(|item| NewRecipeIngredient {
            recipe_id,
            ingredient_id: item.ingredient_id,
            quantity: item.quantity.clone(),
        })
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

pub(super) fn insert_tag_links(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), diesel::result::Error> {
    let rows: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();

    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

/// Loads a recipe's author, or NotFound if the recipe does not exist.
pub(super) fn recipe_author(
    conn: &mut PgConnection,
    recipe_id: Uuid,
) -> Result<Uuid, ApiError> {
    recipes::table
        .filter(recipes::id.eq(recipe_id))
        .select(recipes::author_id)
        .first::<Uuid>(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("recipe not found").into())
}

/// Only the author may mutate a recipe.
pub(super) fn require_author(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    actor: Uuid,
) -> Result<(), ApiError> {
    if recipe_author(conn, recipe_id)? != actor {
        return Err(Error::permission("only the author can modify this recipe").into());
    }
    Ok(())
}

/// Removes a recipe and everything hanging off it: line items, tag links,
/// and every user's favorite and cart rows referencing it. Runs inside the
/// caller's transaction so the rows disappear together or not at all.
pub(super) fn cascade_delete_recipe(
    conn: &mut PgConnection,
    recipe_id: Uuid,
) -> Result<(), diesel::result::Error> {
    diesel::delete(favorites::table.filter(favorites::recipe_id.eq(recipe_id))).execute(conn)?;
    diesel::delete(shopping_cart::table.filter(shopping_cart::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    diesel::delete(
        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
    )
    .execute(conn)?;
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    diesel::delete(recipes::table.filter(recipes::id.eq(recipe_id))).execute(conn)?;
    Ok(())
}
