use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251209_000000_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .modify_column(string_len(Users::Name, 300))
                    .to_owned(),
            )
            .await
    }

    /// Fails if a stored name no longer fits in 100 characters.
    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .modify_column(string_len(Users::Name, 100))
                    .to_owned(),
            )
            .await
    }
}
