use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use diesel::prelude::*;
use potluck_core::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::NewCartItem;
use crate::schema::shopping_cart;

use super::favorite::{load_recipe_short, RecipeShort};

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping-cart",
    tag = "shopping_cart",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Recipe added to the shopping cart", body = RecipeShort),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already in the shopping cart", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecipeShort>), ApiError> {
    let mut conn = get_conn(&pool)?;

    let recipe = load_recipe_short(&mut conn, id)?;

    let inserted = diesel::insert_into(shopping_cart::table)
        .values(&NewCartItem {
            user_id: user.id,
            recipe_id: id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    if inserted == 0 {
        return Err(Error::conflict("recipe is already in the shopping cart").into());
    }

    Ok((StatusCode::CREATED, Json(recipe)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping-cart",
    tag = "shopping_cart",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe removed from the shopping cart"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe is not in the shopping cart", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;

    let removed = diesel::delete(
        shopping_cart::table
            .filter(shopping_cart::user_id.eq(user.id))
            .filter(shopping_cart::recipe_id.eq(id)),
    )
    .execute(&mut conn)?;

    if removed == 0 {
        return Err(Error::not_found("recipe is not in the shopping cart").into());
    }

    Ok(StatusCode::NO_CONTENT)
}
