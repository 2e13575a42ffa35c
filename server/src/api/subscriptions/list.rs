use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::recipes::favorite::RecipeShort;
use crate::api::recipes::list::PaginationMetadata;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::schema::{recipes, subscriptions, users};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSubscriptionsParams {
    /// Number of authors to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of authors to skip (default: 0)
    pub offset: Option<i64>,
    /// Recipe previews per author (default: 3, max: 50)
    pub recipes_limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FollowedAuthor {
    pub id: Uuid,
    pub username: String,
    /// Total recipes by this author, independent of the preview cutoff.
    pub recipe_count: i64,
    pub recipes: Vec<RecipeShort>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListSubscriptionsResponse {
    pub authors: Vec<FollowedAuthor>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/subscriptions",
    tag = "subscriptions",
    params(ListSubscriptionsParams),
    responses(
        (status = 200, description = "Followed authors with recipe previews, newest follow first", body = ListSubscriptionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListSubscriptionsParams>,
) -> Result<Json<ListSubscriptionsResponse>, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);
    let recipes_limit = params.recipes_limit.unwrap_or(3).clamp(0, 50);

    let mut conn = get_conn(&pool)?;

    let total: i64 = subscriptions::table
        .filter(subscriptions::follower_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;

    // Two foreign keys into users, so the join condition is spelled out.
    let page: Vec<(Uuid, String)> = subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
        .filter(subscriptions::follower_id.eq(user.id))
        .order((subscriptions::created_at.desc(), subscriptions::id.asc()))
        .limit(limit)
        .offset(offset)
        .select((users::id, users::username))
        .load(&mut conn)?;

    let author_ids: Vec<Uuid> = page.iter().map(|(id, _)| *id).collect();

    let counts: HashMap<Uuid, i64> = recipes::table
        .filter(recipes::author_id.eq_any(&author_ids))
        .group_by(recipes::author_id)
        .select((recipes::author_id, diesel::dsl::count_star()))
        .load::<(Uuid, i64)>(&mut conn)?
        .into_iter()
        .collect();

    let mut authors = Vec::with_capacity(page.len());
    for (author_id, username) in page {
        let previews: Vec<(Uuid, String, String, i32)> = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .order((recipes::created_at.desc(), recipes::id.asc()))
            .limit(recipes_limit)
            .select((
                recipes::id,
                recipes::title,
                recipes::image,
                recipes::cooking_time_minutes,
            ))
            .load(&mut conn)?;

        authors.push(FollowedAuthor {
            id: author_id,
            username,
            recipe_count: counts.get(&author_id).copied().unwrap_or(0),
            recipes: previews
                .into_iter()
                .map(|(id, title, image, cooking_time_minutes)| RecipeShort {
                    id,
                    title,
                    image,
                    cooking_time_minutes,
                })
                .collect(),
        });
    }

    Ok(Json(ListSubscriptionsResponse {
        authors,
        pagination: PaginationMetadata {
            total,
            limit,
            offset,
        },
    }))
}
