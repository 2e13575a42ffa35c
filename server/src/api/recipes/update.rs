use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::schema::{recipe_ingredients, recipe_tags, recipes};

use super::store::{
    check_ingredient_ids, insert_line_items, insert_tag_links, require_author, resolve_tag_ids,
    RecipePayload,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateRecipeResponse {
    pub id: Uuid,
}

/// Wholesale update: scalar fields are overwritten and the line item / tag
/// link sets are replaced, not merged, all inside one transaction.
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = RecipePayload,
    responses(
        (status = 200, description = "Recipe updated", body = UpdateRecipeResponse),
        (status = 400, description = "Invalid recipe", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecipePayload>,
) -> Result<Json<UpdateRecipeResponse>, ApiError> {
    let draft = request.into_draft()?;

    let mut conn = get_conn(&pool)?;

    conn.transaction::<(), ApiError, _>(|conn| {
        require_author(conn, id, user.id)?;

        let tag_ids = resolve_tag_ids(conn, &draft.tags)?;
        check_ingredient_ids(conn, &draft.line_items)?;

        diesel::update(recipes::table.filter(recipes::id.eq(id)))
            .set((
                recipes::title.eq(&draft.title),
                recipes::text.eq(&draft.text),
                recipes::image.eq(&draft.image),
                recipes::cooking_time_minutes.eq(draft.cooking_time_minutes),
                recipes::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        diesel::delete(
            recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)),
        )
        .execute(conn)?;
        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(id)))
            .execute(conn)?;

        insert_line_items(conn, id, &draft.line_items)?;
        insert_tag_links(conn, id, &tag_ids)?;

        Ok(())
    })?;

    Ok(Json(UpdateRecipeResponse { id }))
}
