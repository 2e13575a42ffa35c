use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::recipes::get::TagView;
use crate::api::{ApiError, ErrorResponse};
use crate::db::{get_conn, DbPool};
use crate::models::Tag;
use crate::schema::tags;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagsListResponse {
    pub tags: Vec<TagView>,
}

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags, ordered by name", body = TagsListResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn list_tags(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<TagsListResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let rows: Vec<Tag> = tags::table
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(&mut conn)?;

    Ok(Json(TagsListResponse {
        tags: rows
            .into_iter()
            .map(|tag| TagView {
                id: tag.id,
                name: tag.name,
                slug: tag.slug,
                color: tag.color,
            })
            .collect(),
    }))
}
