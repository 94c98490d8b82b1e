//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a shared secret. They carry the account
//! identity and role, and expire after [`TokenConfig::ttl`]. There is no
//! refresh or revocation: a client whose token expired logs in again.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AccountsError, ResultAccounts, Role, User};

const DEFAULT_ISSUER: &str = "studydesk";
const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Token settings.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    /// Shared HMAC secret. Must not be empty.
    pub secret: String,
    /// Lifetime of an issued token.
    pub ttl: Duration,
    /// Value of the `iss` claim; verification rejects any other issuer.
    pub issuer: String,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: DEFAULT_TTL,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// Claims carried by every token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    issuer: String,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl core::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> ResultAccounts<Self> {
        if config.secret.is_empty() {
            return Err(AccountsError::InvalidInput(
                "token secret must not be empty".to_string(),
            ));
        }
        if config.ttl.is_zero() {
            return Err(AccountsError::InvalidInput(
                "token lifetime must be > 0".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer,
            ttl: config.ttl,
            validation,
        })
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Sign a token for `user`.
    pub fn issue(&self, user: &User) -> ResultAccounts<IssuedToken> {
        let now = Utc::now().timestamp();
        let expires_in = self.ttl_secs();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now,
            exp: now.saturating_add(expires_in),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AccountsError::Signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_in })
    }

    /// Check signature, issuer and expiry, and return the claims.
    pub fn verify(&self, token: &str) -> ResultAccounts<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| AccountsError::InvalidToken(err.to_string()))
    }
}
