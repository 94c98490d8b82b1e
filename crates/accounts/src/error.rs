//! The module contains the errors the account store can throw.
//!
//! Callers mostly care about three groups:
//!
//! - caller mistakes: [`InvalidInput`], [`InvalidRole`], [`ExistingKey`];
//! - authentication failures: [`InvalidCredentials`], [`InvalidToken`];
//! - internal failures: [`Database`], [`Hashing`], [`Signing`].
//!
//!  [`InvalidInput`]: AccountsError::InvalidInput
//!  [`InvalidRole`]: AccountsError::InvalidRole
//!  [`ExistingKey`]: AccountsError::ExistingKey
//!  [`InvalidCredentials`]: AccountsError::InvalidCredentials
//!  [`InvalidToken`]: AccountsError::InvalidToken
//!  [`Database`]: AccountsError::Database
//!  [`Hashing`]: AccountsError::Hashing
//!  [`Signing`]: AccountsError::Signing
use sea_orm::DbErr;
use thiserror::Error;

/// Account store custom errors.
#[derive(Error, Debug)]
pub enum AccountsError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Token signing failed: {0}")]
    Signing(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for AccountsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::InvalidToken(a), Self::InvalidToken(b)) => a == b,
            (Self::Hashing(a), Self::Hashing(b)) => a == b,
            (Self::Signing(a), Self::Signing(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
