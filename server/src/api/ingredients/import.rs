use axum::{extract::State, Json};
use diesel::prelude::*;
use potluck_core::registry::parse_feed;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::NewIngredient;
use crate::schema::ingredients;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportResponse {
    /// Rows actually inserted.
    pub imported: usize,
    /// Rows skipped because the (name, unit) pair already existed.
    pub skipped: usize,
}

#[utoipa::path(
    post,
    path = "/api/ingredients/import",
    tag = "ingredients",
    request_body(content = String, description = "Ingredient feed, JSON array or CSV lines"),
    responses(
        (status = 200, description = "Import summary", body = ImportResponse),
        (status = 400, description = "Malformed feed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn import_ingredients(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    body: String,
) -> Result<Json<ImportResponse>, ApiError> {
    let specs = parse_feed(&body)?;
    let total = specs.len();

    let mut conn = get_conn(&pool)?;

    let rows: Vec<NewIngredient> = specs
        .iter()
        .map(|spec| NewIngredient {
            name: &spec.name,
            measurement_unit: &spec.measurement_unit,
        })
        .collect();

    let imported = diesel::insert_into(ingredients::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    tracing::info!(imported, skipped = total - imported, "ingredient feed imported");

    Ok(Json(ImportResponse {
        imported,
        skipped: total - imported,
    }))
}
