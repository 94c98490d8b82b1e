use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use unicode_normalization::UnicodeNormalization;

use crate::{AccountsError, ResultAccounts, Role};

mod credentials;
mod register;
mod roles;
mod users;

const MIN_PASSWORD_CHARS: usize = 8;

/// Account store backed by the `users` table.
#[derive(Debug)]
pub struct Accounts {
    database: DatabaseConnection,
}

impl Accounts {
    /// Return a builder for `Accounts`. Help to build the struct.
    pub fn builder() -> AccountsBuilder {
        AccountsBuilder::default()
    }
}

/// Input of [`Accounts::register`].
#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Lowercase and trim an email, and check it looks like `local@domain`.
fn normalize_email(value: &str) -> ResultAccounts<String> {
    let email = value.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AccountsError::InvalidInput(format!(
            "invalid email address: {value}"
        ))),
    }
}

/// NFKC-normalize and trim a username. Whitespace inside is rejected.
fn normalize_username(value: &str) -> ResultAccounts<String> {
    let username: String = value.trim().nfkc().collect();
    if username.is_empty() {
        return Err(AccountsError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(AccountsError::InvalidInput(
            "username must not contain whitespace".to_string(),
        ));
    }
    Ok(username)
}

fn validate_password(value: &str) -> ResultAccounts<()> {
    if value.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AccountsError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Map a unique-index violation on `users` to `ExistingKey`.
///
/// SQLite reports the offending column as `users.<column>`.
fn map_unique_violation(err: DbErr, email: &str, username: &str) -> AccountsError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("username") => {
            AccountsError::ExistingKey(username.to_string())
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => AccountsError::ExistingKey(email.to_string()),
        _ => AccountsError::Database(err),
    }
}

/// The builder for `Accounts`
#[derive(Default)]
pub struct AccountsBuilder {
    database: DatabaseConnection,
}

impl AccountsBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> AccountsBuilder {
        self.database = db;
        self
    }

    /// Construct `Accounts`
    pub fn build(self) -> Accounts {
        Accounts {
            database: self.database,
        }
    }
}
