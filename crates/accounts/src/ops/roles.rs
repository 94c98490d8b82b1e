use sea_orm::{ActiveValue, prelude::*};

use crate::{ResultAccounts, Role, User, users};

use super::Accounts;

impl Accounts {
    /// Set the teacher/student flag of a user and return the updated user.
    pub async fn set_role(&self, id: Uuid, role: Role) -> ResultAccounts<User> {
        let model = self.require_user_model(id).await?;
        if model.role == role.as_str() {
            return User::try_from(model);
        }

        let mut active: users::ActiveModel = model.into();
        active.role = ActiveValue::Set(role.as_str().to_string());
        let model = active.update(&self.database).await?;

        User::try_from(model)
    }
}
