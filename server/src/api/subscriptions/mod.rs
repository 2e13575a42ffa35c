pub mod list;
pub mod subscribe;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/subscriptions endpoints (mounted at
/// /api/subscriptions). All of them act on the caller's follow list.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_subscriptions))
        .route(
            "/{author_id}",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_subscriptions,
        subscribe::subscribe,
        subscribe::unsubscribe,
    ),
    components(schemas(
        list::FollowedAuthor,
        list::ListSubscriptionsResponse,
        subscribe::SubscribeResponse,
    ))
)]
pub struct ApiDoc;
