use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use std::sync::Arc;

use crate::{ServerError, session, user};
use accounts::{Accounts, TokenIssuer};
use api_types::Status;

#[derive(Clone)]
pub struct ServerState {
    pub accounts: Arc<Accounts>,
    pub tokens: Arc<TokenIssuer>,
}

impl ServerState {
    pub fn new(accounts: Accounts, tokens: TokenIssuer) -> Self {
        Self {
            accounts: Arc::new(accounts),
            tokens: Arc::new(tokens),
        }
    }
}

/// Guard for routes that need a logged-in user.
///
/// Requests must carry `Authorization: Bearer <token>`. On success the
/// verified [`accounts::Claims`] are stored in the request extensions.
async fn require_token(
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let bearer = match bearer {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(rejection) if rejection.is_missing() => {
            return Err(ServerError::Unauthorized(
                "missing bearer token".to_string(),
            ));
        }
        Err(_) => {
            return Err(ServerError::Unauthorized(
                "malformed authorization header".to_string(),
            ));
        }
    };

    let claims = state.tokens.verify(bearer.token())?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

async fn health() -> Json<Status> {
    Json(Status {
        success: true,
        message: "ok".to_string(),
    })
}

pub fn router(state: ServerState) -> Router {
    let guarded = Router::new()
        .route("/me", get(user::me))
        .route("/api/set-role", post(user::set_role))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/health", get(health))
        .route("/signup", post(session::signup))
        .route("/login", post(session::login))
        .merge(guarded)
        .with_state(state)
}

pub async fn run_with_listener(
    accounts: Accounts,
    tokens: TokenIssuer,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(accounts, tokens))).await
}

pub fn spawn_with_listener(
    accounts: Accounts,
    tokens: TokenIssuer,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(accounts, tokens, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
