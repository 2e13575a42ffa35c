use axum::{
    extract::{Path, State},
    Json,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use potluck_core::Error;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::MaybeUser;
use crate::db::{get_conn, DbPool};
use crate::models::{Recipe, Tag};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags, users,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorInfo {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LineItemView {
    pub ingredient_id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    /// Decimal quantity string
    pub quantity: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub author: AuthorInfo,
    pub title: String,
    pub text: String,
    pub image: String,
    pub cooking_time_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<LineItemView>,
    pub tags: Vec<TagView>,
    /// Whether the viewing user has favorited this recipe
    pub is_favorited: bool,
    /// Whether this recipe is in the viewing user's shopping cart
    pub is_in_shopping_cart: bool,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    MaybeUser(viewer): MaybeUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let recipe: Recipe = recipes::table
        .filter(recipes::id.eq(id))
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::from(Error::not_found("recipe not found")))?;

    let author_username: String = users::table
        .filter(users::id.eq(recipe.author_id))
        .select(users::username)
        .first(&mut conn)?;

    let line_items: Vec<(Uuid, String, String, BigDecimal)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(id))
        .select((
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::quantity,
        ))
        .order(ingredients::name.asc())
        .load(&mut conn)?;

    let recipe_tags_rows: Vec<Tag> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq(id))
        .select(Tag::as_select())
        .order(tags::name.asc())
        .load(&mut conn)?;

    // Anonymous viewers have no favorite or cart sets; both flags stay false.
    let (is_favorited, is_in_shopping_cart) = match &viewer {
        Some(user) => {
            let favorited: bool = diesel::select(exists(
                favorites::table
                    .filter(favorites::user_id.eq(user.id))
                    .filter(favorites::recipe_id.eq(id)),
            ))
            .get_result(&mut conn)?;

            let in_cart: bool = diesel::select(exists(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user.id))
                    .filter(shopping_cart::recipe_id.eq(id)),
            ))
            .get_result(&mut conn)?;

            (favorited, in_cart)
        }
        None => (false, false),
    };

    Ok(Json(RecipeResponse {
        id: recipe.id,
        author: AuthorInfo {
            id: recipe.author_id,
            username: author_username,
        },
        title: recipe.title,
        text: recipe.text,
        image: recipe.image,
        cooking_time_minutes: recipe.cooking_time_minutes,
        created_at: recipe.created_at,
        ingredients: line_items
            .into_iter()
            .map(|(ingredient_id, name, measurement_unit, quantity)| LineItemView {
                ingredient_id,
                name,
                measurement_unit,
                quantity: quantity.to_string(),
            })
            .collect(),
        tags: recipe_tags_rows
            .into_iter()
            .map(|tag| TagView {
                id: tag.id,
                name: tag.name,
                slug: tag.slug,
                color: tag.color,
            })
            .collect(),
        is_favorited,
        is_in_shopping_cart,
    }))
}
