//! Optional profile columns on `users`.
//!
//! SQLite accepts a single change per `ALTER TABLE`, so each column gets its
//! own statement.

use sea_orm_migration::prelude::*;

use crate::m20261001_000000_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Profile {
    FirstName,
    LastName,
    Bio,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [Profile::FirstName, Profile::LastName, Profile::Bio] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .add_column(ColumnDef::new(column).string().null())
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [Profile::Bio, Profile::LastName, Profile::FirstName] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
