pub mod auth;
pub mod catalog;
pub mod slug;
pub mod songs;
pub mod validation;

pub use auth::{AuthService, Principal};
pub use catalog::{AlbumDetail, CatalogService, TrackEntry};
pub use songs::{SongService, TracklistService};
