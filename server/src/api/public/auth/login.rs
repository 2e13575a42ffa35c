use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::{create_session, verify_password};
use crate::db::{get_conn, DbPool};
use crate::models::User;
use crate::schema::users;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Invalid username or password".to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let mut conn = get_conn(&pool)?;

    let user: Option<User> = users::table
        .filter(users::username.eq(&request.username))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    // Verify against a found user only; an unknown username takes the same
    // rejection path so the response does not leak which part was wrong.
    let user = match user {
        Some(u) if verify_password(&request.password, &u.password_hash) => u,
        _ => return Ok(invalid_credentials()),
    };

    let token = create_session(&mut conn, user.id)?;

    Ok((StatusCode::OK, Json(LoginResponse { token })).into_response())
}
