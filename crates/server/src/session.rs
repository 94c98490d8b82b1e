//! Signup and login endpoints.

use accounts::{AccountsError, NewUser};
use api_types::auth::{AuthResponse, Login, Signup};
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;

use crate::{
    ServerError,
    server::ServerState,
    user::{auth_response, map_role_in},
};

/// Create an account and log it in.
pub async fn signup(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Signup>, ServerError>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let user = state
        .accounts
        .register(NewUser {
            email: payload.email,
            username: payload.username,
            password: payload.password,
            role: map_role_in(payload.role),
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
        })
        .await?;
    tracing::info!(user_id = %user.id, role = %user.role, "user signed up");

    let response = auth_response(&state, user, "signup successful")?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange email and password for a token.
pub async fn login(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Login>, ServerError>,
) -> Result<Json<AuthResponse>, ServerError> {
    let user = match state
        .accounts
        .verify_credentials(&payload.email, &payload.password)
        .await
    {
        Ok(user) => user,
        Err(AccountsError::InvalidCredentials) => {
            tracing::warn!("failed login");
            return Err(AccountsError::InvalidCredentials.into());
        }
        Err(err) => return Err(err.into()),
    };
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(auth_response(&state, user, "login successful")?))
}
