use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::NewRecipe;
use crate::schema::recipes;

use super::store::{
    check_ingredient_ids, insert_line_items, insert_tag_links, resolve_tag_ids, RecipePayload,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipePayload,
    responses(
        (status = 201, description = "Recipe created", body = CreateRecipeResponse),
        (status = 400, description = "Invalid recipe", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<RecipePayload>,
) -> Result<(StatusCode, Json<CreateRecipeResponse>), ApiError> {
    let draft = request.into_draft()?;

    let mut conn = get_conn(&pool)?;

    let recipe_id = conn.transaction::<Uuid, ApiError, _>(|conn| {
        let tag_ids = resolve_tag_ids(conn, &draft.tags)?;
        check_ingredient_ids(conn, &draft.line_items)?;

        let new_recipe = NewRecipe {
            author_id: user.id,
            title: &draft.title,
            text: &draft.text,
            image: &draft.image,
            cooking_time_minutes: draft.cooking_time_minutes,
        };

        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        insert_line_items(conn, recipe_id, &draft.line_items)?;
        insert_tag_links(conn, recipe_id, &tag_ids)?;

        Ok(recipe_id)
    })?;

    tracing::info!(recipe_id = %recipe_id, "recipe created");

    Ok((StatusCode::CREATED, Json(CreateRecipeResponse { id: recipe_id })))
}
