pub mod album;
pub mod album_tracklist_item;
pub mod music_manager_user;
pub mod session;
pub mod song;
pub mod user;

pub use album::Entity as Album;
pub use album_tracklist_item::Entity as AlbumTracklistItem;
pub use music_manager_user::Entity as MusicManagerUser;
pub use session::Entity as Session;
pub use song::Entity as Song;
pub use user::Entity as User;
