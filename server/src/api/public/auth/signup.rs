use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use potluck_core::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::{create_session, hash_password};
use crate::db::{get_conn, DbPool};
use crate::models::NewUser;
use crate::schema::users;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid username or password", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(Error::validation("username cannot be empty").into());
    }
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(Error::validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ))
        .into());
    }

    let password_hash =
        hash_password(&request.password).map_err(|_| ApiError::Internal("password hashing failed"))?;

    let mut conn = get_conn(&pool)?;

    let new_user = NewUser {
        username,
        password_hash: &password_hash,
    };

    let user_id: Uuid = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(users::id)
        .get_result(&mut conn)
    {
        Ok(id) => id,
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(Error::conflict("username is already taken").into());
        }
        Err(err) => return Err(err.into()),
    };

    let token = create_session(&mut conn, user_id)?;

    Ok((StatusCode::CREATED, Json(SignupResponse { token })))
}
