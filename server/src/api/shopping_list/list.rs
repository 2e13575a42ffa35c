use axum::{extract::State, Json};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use potluck_core::shopping_list::{aggregate, CartLineItem, ShoppingListEntry};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbConn, DbPool};
use crate::schema::{ingredients, recipe_ingredients, shopping_cart};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingListEntryView {
    pub ingredient: String,
    pub unit: String,
    /// Exact decimal total, serialized as a string.
    pub total: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingListResponse {
    pub entries: Vec<ShoppingListEntryView>,
}

/// Pulls every (ingredient, unit, quantity) row of every recipe in the
/// user's cart. Aggregation happens in memory, not in SQL, so the merge
/// rules live in one place.
pub(super) fn cart_line_items(
    conn: &mut DbConn,
    user_id: Uuid,
) -> Result<Vec<CartLineItem>, ApiError> {
    let cart_recipes = shopping_cart::table
        .filter(shopping_cart::user_id.eq(user_id))
        .select(shopping_cart::recipe_id);

    let rows: Vec<(String, String, BigDecimal)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(cart_recipes))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::quantity,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(ingredient, unit, quantity)| CartLineItem {
            ingredient,
            unit,
            quantity,
        })
        .collect())
}

pub(super) fn aggregated_entries(
    conn: &mut DbConn,
    user_id: Uuid,
) -> Result<Vec<ShoppingListEntry>, ApiError> {
    Ok(aggregate(cart_line_items(conn, user_id)?))
}

#[utoipa::path(
    get,
    path = "/api/shopping-list",
    tag = "shopping_list",
    responses(
        (status = 200, description = "Aggregated shopping list for the caller's cart", body = ShoppingListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_shopping_list(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<ShoppingListResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let entries = aggregated_entries(&mut conn, user.id)?;

    Ok(Json(ShoppingListResponse {
        entries: entries
            .into_iter()
            .map(|entry| ShoppingListEntryView {
                ingredient: entry.ingredient,
                unit: entry.unit,
                total: entry.total.to_string(),
            })
            .collect(),
    }))
}
