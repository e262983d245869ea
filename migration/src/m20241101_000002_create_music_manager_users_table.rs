use sea_orm_migration::prelude::*;

use super::m20241101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MusicManagerUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MusicManagerUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MusicManagerUsers::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MusicManagerUsers::DisplayName)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MusicManagerUsers::Role)
                            .string_len(10)
                            .not_null()
                            .default("viewer"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_music_manager_users_user_id")
                            .from(MusicManagerUsers::Table, MusicManagerUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MusicManagerUsers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MusicManagerUsers {
    Table,
    Id,
    UserId,
    DisplayName,
    Role,
}
