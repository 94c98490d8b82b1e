pub use sea_orm_migration::prelude::*;

mod m20261001_000000_users;
mod m20261010_000000_user_profile;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000000_users::Migration),
            Box::new(m20261010_000000_user_profile::Migration),
        ]
    }
}
