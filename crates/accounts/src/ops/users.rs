use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{AccountsError, ResultAccounts, User, users};

use super::{Accounts, normalize_email, normalize_username};

impl Accounts {
    /// Fetch a user by id.
    pub async fn user(&self, id: Uuid) -> ResultAccounts<User> {
        let model = self.require_user_model(id).await?;
        User::try_from(model)
    }

    pub async fn user_by_email(&self, email: &str) -> ResultAccounts<User> {
        let email = normalize_email(email)?;
        users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.database)
            .await?
            .ok_or(AccountsError::KeyNotFound(email))
            .and_then(User::try_from)
    }

    pub async fn user_by_username(&self, username: &str) -> ResultAccounts<User> {
        let username = normalize_username(username)?;
        users::Entity::find()
            .filter(users::Column::Username.eq(username.as_str()))
            .one(&self.database)
            .await?
            .ok_or(AccountsError::KeyNotFound(username))
            .and_then(User::try_from)
    }

    /// All users, oldest first.
    pub async fn list_users(&self) -> ResultAccounts<Vec<User>> {
        users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    pub(super) async fn require_user_model(&self, id: Uuid) -> ResultAccounts<users::Model> {
        users::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| AccountsError::KeyNotFound(id.to_string()))
    }
}
