use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::AlbumFormat;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "albums")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub artist: String,
    /// Price in minor units, 0..=99999.
    pub price_cents: i32,
    pub format: AlbumFormat,
    pub release_date: Date,
    pub cover_image: String,
    /// Derived from the title on insert and never rewritten.
    pub slug: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::album_tracklist_item::Entity")]
    TracklistItems,
}

impl Related<super::album_tracklist_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TracklistItems.def()
    }
}

impl Related<super::song::Entity> for Entity {
    fn to() -> RelationDef {
        super::album_tracklist_item::Relation::Song.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::album_tracklist_item::Relation::Album.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
