use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Length in seconds.
    pub length: i32,
    pub created_at: DateTimeWithTimeZone,
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

impl ActiveModelBehavior for ActiveModel {}
