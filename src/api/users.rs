//! User account endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::user::{capability, CapabilitySet, CreateUser, User},
};

use super::AuthenticatedUser;

/// Register a new user account
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 403, description = "Missing add_user"),
        (status = 409, description = "Login already exists"),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    claims.require_capability(capability::ADD_USER)?;

    let created = state.services.users.create(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
