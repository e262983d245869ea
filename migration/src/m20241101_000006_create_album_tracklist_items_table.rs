use sea_orm_migration::prelude::*;

use super::m20241101_000004_create_albums_table::Albums;
use super::m20241101_000005_create_songs_table::Songs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlbumTracklistItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlbumTracklistItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AlbumTracklistItems::AlbumId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlbumTracklistItems::SongId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AlbumTracklistItems::Position).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_tracklist_items_album_id")
                            .from(AlbumTracklistItems::Table, AlbumTracklistItems::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_tracklist_items_song_id")
                            .from(AlbumTracklistItems::Table, AlbumTracklistItems::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_tracklist_items_album_id")
                    .table(AlbumTracklistItems::Table)
                    .col(AlbumTracklistItems::AlbumId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_tracklist_items_unique")
                    .table(AlbumTracklistItems::Table)
                    .col(AlbumTracklistItems::AlbumId)
                    .col(AlbumTracklistItems::SongId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlbumTracklistItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AlbumTracklistItems {
    Table,
    Id,
    AlbumId,
    SongId,
    Position,
}
