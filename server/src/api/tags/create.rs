use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use potluck_core::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::NewTag;
use crate::schema::tags;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    pub name: String,
    pub slug: String,
    /// Hex color like "#49B64E".
    pub color: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateTagResponse {
    pub id: Uuid,
}

fn validate(request: &CreateTagRequest) -> Result<(), Error> {
    if request.name.trim().is_empty() {
        return Err(Error::validation("tag name must not be empty"));
    }
    if request.slug.trim().is_empty() {
        return Err(Error::validation("tag slug must not be empty"));
    }
    let slug_ok = request
        .slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !slug_ok {
        return Err(Error::validation(
            "tag slug may only contain lowercase letters, digits, '-' and '_'",
        ));
    }
    if request.color.trim().is_empty() {
        return Err(Error::validation("tag color must not be empty"));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = CreateTagResponse),
        (status = 400, description = "Invalid tag", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Name or slug already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tag(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<CreateTagResponse>), ApiError> {
    validate(&request)?;

    let mut conn = get_conn(&pool)?;

    let result = diesel::insert_into(tags::table)
        .values(&NewTag {
            name: &request.name,
            slug: &request.slug,
            color: &request.color,
        })
        .returning(tags::id)
        .get_result::<Uuid>(&mut conn);

    let id = match result {
        Ok(id) => id,
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(Error::conflict("a tag with that name or slug already exists").into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(tag_id = %id, slug = %request.slug, "tag created");

    Ok((StatusCode::CREATED, Json(CreateTagResponse { id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, slug: &str, color: &str) -> CreateTagRequest {
        CreateTagRequest {
            name: name.to_string(),
            slug: slug.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_tag() {
        assert!(validate(&request("Breakfast", "breakfast", "#E26C2D")).is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        assert!(validate(&request("  ", "breakfast", "#E26C2D")).is_err());
    }

    #[test]
    fn rejects_uppercase_slug() {
        assert!(validate(&request("Breakfast", "Breakfast", "#E26C2D")).is_err());
    }

    #[test]
    fn rejects_slug_with_spaces() {
        assert!(validate(&request("Breakfast", "break fast", "#E26C2D")).is_err());
    }
}
