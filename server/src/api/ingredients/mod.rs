pub mod get;
pub mod import;
pub mod list;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/ingredients endpoints (mounted at
/// /api/ingredients). Reads are public; the bulk import requires auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_ingredients))
        .route("/{id}", get(get::get_ingredient))
        .route("/import", post(import::import_ingredients))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_ingredients, get::get_ingredient, import::import_ingredients),
    components(schemas(
        list::IngredientView,
        list::IngredientsListResponse,
        import::ImportResponse,
    ))
)]
pub struct ApiDoc;
