use accounts::AccountsError;
use api_types::Status;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
};

pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod server;
mod session;
mod user;

pub enum ServerError {
    Accounts(AccountsError),
    Unauthorized(String),
    /// Well-formed JSON whose fields do not fit the payload type.
    Validation(String),
    Generic(String),
}

fn status_for_accounts_error(err: &AccountsError) -> StatusCode {
    match err {
        AccountsError::InvalidCredentials | AccountsError::InvalidToken(_) => {
            StatusCode::UNAUTHORIZED
        }
        AccountsError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        AccountsError::ExistingKey(_) => StatusCode::CONFLICT,
        AccountsError::InvalidInput(_) | AccountsError::InvalidRole(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AccountsError::Database(_) | AccountsError::Hashing(_) | AccountsError::Signing(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_accounts_error(err: AccountsError) -> String {
    match err {
        AccountsError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        AccountsError::Hashing(detail) | AccountsError::Signing(detail) => {
            tracing::error!("credential error: {detail}");
            "internal server error".to_string()
        }
        // The decoder's reason is only useful in logs.
        AccountsError::InvalidToken(detail) => {
            tracing::debug!("token rejected: {detail}");
            "invalid or expired token".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Accounts(err) => (
                status_for_accounts_error(&err),
                message_for_accounts_error(err),
            ),
            ServerError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            ServerError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ServerError::Generic(message) => (StatusCode::BAD_REQUEST, message),
        };

        (
            status,
            Json(Status {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<AccountsError> for ServerError {
    fn from(value: AccountsError) -> Self {
        Self::Accounts(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        match value {
            JsonRejection::JsonDataError(_) => Self::Validation(value.body_text()),
            _ => Self::Generic(value.body_text()),
        }
    }
}
