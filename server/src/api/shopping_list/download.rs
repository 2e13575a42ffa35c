use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
};
use potluck_core::shopping_list::render_text;
use std::sync::Arc;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};

use super::list::aggregated_entries;

#[utoipa::path(
    get,
    path = "/api/shopping-list/download",
    tag = "shopping_list",
    responses(
        (status = 200, description = "Shopping list as a plain-text attachment", body = String),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_shopping_list(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<(HeaderMap, String), ApiError> {
    let mut conn = get_conn(&pool)?;

    let entries = aggregated_entries(&mut conn, user.id)?;
    let body = render_text(&entries);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"shopping_list.txt\""),
    );

    Ok((headers, body))
}
