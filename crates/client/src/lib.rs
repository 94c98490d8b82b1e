//! HTTP client for the studydesk API.
//!
//! The client keeps the token returned by signup/login in a [`TokenStore`]
//! and presents it on guarded routes.

use api_types::{
    Role,
    auth::{AuthResponse, Login, Signup},
    user::{SetRole, User, UserResponse},
};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

pub use store::{Session, TokenStore, default_store_path};

mod store;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid base_url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    store: TokenStore,
}

impl Client {
    pub fn new(base_url: &str, store: TokenStore) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            store,
        })
    }

    /// The current (unexpired) session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.store.session()
    }

    pub async fn signup(&mut self, payload: &Signup) -> Result<AuthResponse> {
        let request = self.http.post(self.endpoint("signup")?).json(payload);
        let response: AuthResponse = self.send(request).await?;
        self.remember(&response)?;
        Ok(response)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse> {
        let payload = Login {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.http.post(self.endpoint("login")?).json(&payload);
        let response: AuthResponse = self.send(request).await?;
        self.remember(&response)?;
        Ok(response)
    }

    pub async fn set_role(&mut self, role: Role) -> Result<AuthResponse> {
        let token = self.token()?;
        let request = self
            .http
            .post(self.endpoint("api/set-role")?)
            .bearer_auth(token)
            .json(&SetRole { role });
        let response: AuthResponse = self.send(request).await?;
        self.remember(&response)?;
        Ok(response)
    }

    pub async fn me(&self) -> Result<User> {
        let token = self.token()?;
        let request = self.http.get(self.endpoint("me")?).bearer_auth(token);
        let response: UserResponse = self.send(request).await?;
        Ok(response.user)
    }

    /// Forget the stored session. Tokens are stateless, so the server is not
    /// contacted.
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear()
    }

    fn token(&self) -> Result<String> {
        self.store
            .session()
            .map(|session| session.token.clone())
            .ok_or(ClientError::NotLoggedIn)
    }

    fn remember(&mut self, response: &AuthResponse) -> Result<()> {
        tracing::debug!(path = %self.store.path().display(), "saving session");
        self.store.save(Session::from_response(response))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl(err.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let res = request.send().await?;

        if res.status().is_success() {
            return Ok(res.json::<T>().await?);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.message)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(body),
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            StatusCode::CONFLICT => ClientError::Conflict(body),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(body)
            }
            _ => ClientError::Server(body),
        };
        Err(err)
    }
}
