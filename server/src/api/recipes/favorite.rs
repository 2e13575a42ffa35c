use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use diesel::prelude::*;
use potluck_core::Error;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool, DbConn};
use crate::models::NewFavorite;
use crate::schema::{favorites, recipes};

/// Compact recipe payload returned when a relation is created and inside
/// followed-author previews.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeShort {
    pub id: Uuid,
    pub title: String,
    pub image: String,
    pub cooking_time_minutes: i32,
}

pub(crate) fn load_recipe_short(
    conn: &mut DbConn,
    recipe_id: Uuid,
) -> Result<RecipeShort, ApiError> {
    let (id, title, image, cooking_time_minutes) = recipes::table
        .filter(recipes::id.eq(recipe_id))
        .select((
            recipes::id,
            recipes::title,
            recipes::image,
            recipes::cooking_time_minutes,
        ))
        .first::<(Uuid, String, String, i32)>(conn)
        .optional()?
        .ok_or_else(|| ApiError::from(Error::not_found("recipe not found")))?;

    Ok(RecipeShort {
        id,
        title,
        image,
        cooking_time_minutes,
    })
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "favorites",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Recipe favorited", body = RecipeShort),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already favorited", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecipeShort>), ApiError> {
    let mut conn = get_conn(&pool)?;

    let recipe = load_recipe_short(&mut conn, id)?;

    // The unique constraint decides; a lost insert race surfaces as a
    // conflict, never as a silent overwrite.
    let inserted = diesel::insert_into(favorites::table)
        .values(&NewFavorite {
            user_id: user.id,
            recipe_id: id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    if inserted == 0 {
        return Err(Error::conflict("recipe is already in favorites").into());
    }

    Ok((StatusCode::CREATED, Json(recipe)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "favorites",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe is not in favorites", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;

    let removed = diesel::delete(
        favorites::table
            .filter(favorites::user_id.eq(user.id))
            .filter(favorites::recipe_id.eq(id)),
    )
    .execute(&mut conn)?;

    if removed == 0 {
        return Err(Error::not_found("recipe is not in favorites").into());
    }

    Ok(StatusCode::NO_CONTENT)
}
