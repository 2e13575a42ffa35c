use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use diesel::prelude::*;
use potluck_core::Error;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::NewSubscription;
use crate::schema::{subscriptions, users};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscribeResponse {
    pub author_id: Uuid,
    pub username: String,
}

#[utoipa::path(
    post,
    path = "/api/subscriptions/{author_id}",
    tag = "subscriptions",
    params(("author_id" = Uuid, Path, description = "Author to follow")),
    responses(
        (status = 201, description = "Now following the author", body = SubscribeResponse),
        (status = 400, description = "Cannot follow yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 409, description = "Already following", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(author_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubscribeResponse>), ApiError> {
    if author_id == user.id {
        return Err(Error::validation("you cannot follow yourself").into());
    }

    let mut conn = get_conn(&pool)?;

    let username: String = users::table
        .filter(users::id.eq(author_id))
        .select(users::username)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::from(Error::not_found("author not found")))?;

    let inserted = diesel::insert_into(subscriptions::table)
        .values(&NewSubscription {
            follower_id: user.id,
            author_id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    if inserted == 0 {
        return Err(Error::conflict("you are already following this author").into());
    }

    tracing::info!(follower_id = %user.id, author_id = %author_id, "subscription created");

    Ok((
        StatusCode::CREATED,
        Json(SubscribeResponse {
            author_id,
            username,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/subscriptions/{author_id}",
    tag = "subscriptions",
    params(("author_id" = Uuid, Path, description = "Author to unfollow")),
    responses(
        (status = 204, description = "No longer following the author"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not following this author", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;

    let removed = diesel::delete(
        subscriptions::table
            .filter(subscriptions::follower_id.eq(user.id))
            .filter(subscriptions::author_id.eq(author_id)),
    )
    .execute(&mut conn)?;

    if removed == 0 {
        return Err(Error::not_found("you are not following this author").into());
    }

    Ok(StatusCode::NO_CONTENT)
}
