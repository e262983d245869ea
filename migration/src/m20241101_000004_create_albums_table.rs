use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Albums::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Albums::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Albums::Title)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Albums::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Albums::Artist)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Albums::PriceCents)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Albums::Format)
                            .string_len(2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Albums::ReleaseDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Albums::CoverImage)
                            .string_len(255)
                            .not_null()
                            .default("no_cover.jpg"),
                    )
                    .col(
                        ColumnDef::new(Albums::Slug)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Albums::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Albums::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_albums_title_artist_format")
                    .table(Albums::Table)
                    .col(Albums::Title)
                    .col(Albums::Artist)
                    .col(Albums::Format)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_albums_artist")
                    .table(Albums::Table)
                    .col(Albums::Artist)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Albums::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Albums {
    Table,
    Id,
    Title,
    Description,
    Artist,
    PriceCents,
    Format,
    ReleaseDate,
    CoverImage,
    Slug,
    CreatedAt,
    UpdatedAt,
}
