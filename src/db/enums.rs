use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Physical or digital release format of an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum AlbumFormat {
    #[sea_orm(string_value = "DD")]
    #[serde(rename = "DD")]
    DigitalDownload,
    #[sea_orm(string_value = "CD")]
    #[serde(rename = "CD")]
    Cd,
    #[sea_orm(string_value = "VL")]
    #[serde(rename = "VL")]
    Vinyl,
}

impl AlbumFormat {
    pub const ALL: [AlbumFormat; 3] = [Self::DigitalDownload, Self::Cd, Self::Vinyl];

    pub fn code(&self) -> &'static str {
        match self {
            Self::DigitalDownload => "DD",
            Self::Cd => "CD",
            Self::Vinyl => "VL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DigitalDownload => "Digital Download",
            Self::Cd => "CD",
            Self::Vinyl => "Vinyl",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "DD" => Some(Self::DigitalDownload),
            "CD" => Some(Self::Cd),
            "VL" => Some(Self::Vinyl),
            _ => None,
        }
    }
}

/// Permission tier attached to a user's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "viewer")]
    Viewer,
    #[sea_orm(string_value = "artist")]
    Artist,
    #[sea_orm(string_value = "editor")]
    Editor,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Artist => "artist",
            Self::Editor => "editor",
        }
    }
}
