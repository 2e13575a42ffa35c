pub mod create;
pub mod get;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/tags endpoints (mounted at /api/tags).
/// Reads are public; creation requires auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_tags).post(create::create_tag))
        .route("/{id}", get(get::get_tag))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_tags, get::get_tag, create::create_tag),
    components(schemas(
        list::TagsListResponse,
        create::CreateTagRequest,
        create::CreateTagResponse,
    ))
)]
pub struct ApiDoc;
