use axum::{
    extract::{Query, State},
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::db::{get_conn, DbPool};
use crate::models::Ingredient;
use crate::schema::ingredients;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientView {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientsListResponse {
    pub ingredients: Vec<IngredientView>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Case-insensitive name prefix to search for.
    pub name: Option<String>,
}

/// LIKE treats % and _ as wildcards; a literal search term must not.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Matching ingredients, ordered by name", body = IngredientsListResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListIngredientsParams>,
) -> Result<Json<IngredientsListResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let mut query = ingredients::table.into_boxed();
    if let Some(name) = params.name.as_deref() {
        if !name.is_empty() {
            query = query.filter(ingredients::name.ilike(format!("{}%", escape_like(name))));
        }
    }

    let rows: Vec<Ingredient> = query
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .select(Ingredient::as_select())
        .load(&mut conn)?;

    Ok(Json(IngredientsListResponse {
        ingredients: rows
            .into_iter()
            .map(|row| IngredientView {
                id: row.id,
                name: row.name,
                measurement_unit: row.measurement_unit,
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50% cocoa"), "50\\% cocoa");
        assert_eq!(escape_like("egg_white"), "egg\\_white");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn leaves_plain_terms_alone() {
        assert_eq!(escape_like("flour"), "flour");
    }
}
