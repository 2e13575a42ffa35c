use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use potluck_core::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::db::{get_conn, DbPool};
use crate::models::Ingredient;
use crate::schema::ingredients;

use super::list::IngredientView;

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(("id" = Uuid, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "The ingredient", body = IngredientView),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<IngredientView>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let row: Ingredient = ingredients::table
        .filter(ingredients::id.eq(id))
        .select(Ingredient::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::from(Error::not_found("ingredient not found")))?;

    Ok(Json(IngredientView {
        id: row.id,
        name: row.name,
        measurement_unit: row.measurement_unit,
    }))
}
