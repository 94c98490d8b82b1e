use sea_orm::{QueryFilter, prelude::*};

use crate::{
    AccountsError, ResultAccounts, User,
    password::{verify_dummy_blocking, verify_password_blocking},
    users,
};

use super::{Accounts, normalize_email};

impl Accounts {
    /// Check an email/password pair.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> ResultAccounts<User> {
        let email = normalize_email(email).map_err(|_| AccountsError::InvalidCredentials)?;

        let Some(model) = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
        else {
            verify_dummy_blocking(password.to_string()).await;
            return Err(AccountsError::InvalidCredentials);
        };

        let matches =
            verify_password_blocking(password.to_string(), model.password_hash.clone()).await?;
        if !matches {
            return Err(AccountsError::InvalidCredentials);
        }

        User::try_from(model)
    }
}
