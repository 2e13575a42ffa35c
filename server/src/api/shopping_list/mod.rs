pub mod download;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/shopping-list endpoints (mounted at
/// /api/shopping-list). Both views are derived from the caller's cart.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::get_shopping_list))
        .route("/download", get(download::download_shopping_list))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::get_shopping_list, download::download_shopping_list),
    components(schemas(list::ShoppingListEntryView, list::ShoppingListResponse))
)]
pub struct ApiDoc;
