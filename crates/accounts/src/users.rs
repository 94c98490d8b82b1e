//! Users table and the public `User` view built from it.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{AccountsError, ResultAccounts, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// An account as seen outside the store.
///
/// The password hash stays in [`Model`] and is never copied here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Model> for User {
    type Error = AccountsError;

    fn try_from(model: Model) -> ResultAccounts<Self> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| AccountsError::InvalidInput(format!("invalid user id: {}", model.id)))?;
        Ok(Self {
            id,
            role: Role::try_from(model.role.as_str())?,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            bio: model.bio,
            created_at: model.created_at,
        })
    }
}
