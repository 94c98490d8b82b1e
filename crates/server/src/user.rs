//! Endpoints for the logged-in user.

use accounts::Claims;
use api_types::{
    auth::AuthResponse,
    user::{SetRole, UserResponse},
};
use axum::{Extension, Json, extract::State};
use axum_extra::extract::WithRejection;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_role_in(role: api_types::Role) -> accounts::Role {
    match role {
        api_types::Role::Student => accounts::Role::Student,
        api_types::Role::Teacher => accounts::Role::Teacher,
    }
}

pub(crate) fn map_role_out(role: accounts::Role) -> api_types::Role {
    match role {
        accounts::Role::Student => api_types::Role::Student,
        accounts::Role::Teacher => api_types::Role::Teacher,
    }
}

pub(crate) fn map_user(user: accounts::User) -> api_types::user::User {
    api_types::user::User {
        id: user.id,
        email: user.email,
        username: user.username,
        role: map_role_out(user.role),
        first_name: user.first_name,
        last_name: user.last_name,
        bio: user.bio,
        created_at: user.created_at,
    }
}

/// Sign a token for `user` and wrap it in the common auth response.
pub(crate) fn auth_response(
    state: &ServerState,
    user: accounts::User,
    message: &str,
) -> Result<AuthResponse, ServerError> {
    let issued = state.tokens.issue(&user)?;
    Ok(AuthResponse {
        success: true,
        message: message.to_string(),
        token: issued.token,
        expires_in: issued.expires_in,
        user: map_user(user),
    })
}

/// Return the account behind the presented token.
pub async fn me(
    Extension(claims): Extension<Claims>,
    State(state): State<ServerState>,
) -> Result<Json<UserResponse>, ServerError> {
    let user = state.accounts.user(claims.sub).await?;

    Ok(Json(UserResponse {
        success: true,
        user: map_user(user),
    }))
}

/// Change the teacher/student flag of the caller.
///
/// The token presented still carries the old role, so a new one is issued.
pub async fn set_role(
    Extension(claims): Extension<Claims>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<SetRole>, ServerError>,
) -> Result<Json<AuthResponse>, ServerError> {
    let role = map_role_in(payload.role);
    let user = state.accounts.set_role(claims.sub, role).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "role updated");

    Ok(Json(auth_response(&state, user, "role updated")?))
}
