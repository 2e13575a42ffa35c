use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use potluck_core::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::recipes::get::TagView;
use crate::api::{ApiError, ErrorResponse};
use crate::db::{get_conn, DbPool};
use crate::models::Tag;
use crate::schema::tags;

#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "tags",
    params(("id" = Uuid, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "The tag", body = TagView),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TagView>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let tag: Tag = tags::table
        .filter(tags::id.eq(id))
        .select(Tag::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::from(Error::not_found("tag not found")))?;

    Ok(Json(TagView {
        id: tag.id,
        name: tag.name,
        slug: tag.slug,
        color: tag.color,
    }))
}
