//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$...`) with a random salt, so the same
//! password never hashes to the same value twice.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use std::sync::LazyLock;

use crate::{AccountsError, ResultAccounts};

/// Hash checked against when no account matches, so an unknown email costs
/// as much as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("studydesk-no-such-account").ok());

/// Hash a password using Argon2id with default parameters.
pub fn hash_password(password: &str) -> ResultAccounts<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AccountsError::Hashing(err.to_string()))
}

/// Compare a password with a stored hash.
///
/// A mismatch is `Ok(false)`; only an unparsable stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> ResultAccounts<bool> {
    let parsed = PasswordHash::new(hash).map_err(|err| AccountsError::Hashing(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking pool.
pub(crate) async fn hash_password_blocking(password: String) -> ResultAccounts<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| AccountsError::Hashing(err.to_string()))?
}

/// [`verify_password`] on the blocking pool.
pub(crate) async fn verify_password_blocking(
    password: String,
    hash: String,
) -> ResultAccounts<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|err| AccountsError::Hashing(err.to_string()))?
}

/// Run one verification against [`DUMMY_HASH`] and discard the outcome.
pub(crate) async fn verify_dummy_blocking(password: String) {
    if let Some(hash) = DUMMY_HASH.as_ref() {
        let _ = verify_password_blocking(password, hash.clone()).await;
    }
}
