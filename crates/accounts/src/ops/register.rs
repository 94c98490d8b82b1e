use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, prelude::*};

use crate::{AccountsError, ResultAccounts, User, password, users};

use super::{
    Accounts, NewUser, map_unique_violation, normalize_email, normalize_optional_text,
    normalize_username, validate_password,
};

impl Accounts {
    /// Create a new account and return it.
    ///
    /// The password is hashed once here; the plaintext is dropped afterwards.
    pub async fn register(&self, new_user: NewUser) -> ResultAccounts<User> {
        let email = normalize_email(&new_user.email)?;
        let username = normalize_username(&new_user.username)?;
        validate_password(&new_user.password)?;

        if users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.database)
            .await?
            .is_some()
        {
            return Err(AccountsError::ExistingKey(email));
        }
        if users::Entity::find()
            .filter(users::Column::Username.eq(username.as_str()))
            .one(&self.database)
            .await?
            .is_some()
        {
            return Err(AccountsError::ExistingKey(username));
        }

        let password_hash = password::hash_password_blocking(new_user.password).await?;

        let model = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            email: ActiveValue::Set(email.clone()),
            username: ActiveValue::Set(username.clone()),
            password_hash: ActiveValue::Set(password_hash),
            role: ActiveValue::Set(new_user.role.as_str().to_string()),
            first_name: ActiveValue::Set(normalize_optional_text(new_user.first_name.as_deref())),
            last_name: ActiveValue::Set(normalize_optional_text(new_user.last_name.as_deref())),
            bio: ActiveValue::Set(normalize_optional_text(new_user.bio.as_deref())),
            created_at: ActiveValue::Set(Utc::now()),
        };

        // The lookups above give precise messages; the unique indexes close
        // the window between lookup and insert.
        let model = model
            .insert(&self.database)
            .await
            .map_err(|err| map_unique_violation(err, &email, &username))?;

        User::try_from(model)
    }
}
