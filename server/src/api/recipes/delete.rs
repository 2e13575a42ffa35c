use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};

use super::store::{cascade_delete_recipe, require_author};

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;

    conn.transaction::<(), ApiError, _>(|conn| {
        require_author(conn, id, user.id)?;
        cascade_delete_recipe(conn, id)?;
        Ok(())
    })?;

    tracing::info!(recipe_id = %id, "recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}
