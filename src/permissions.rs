//! Catalog permission rules.
//!
//! Everything here is pure: the resolver sees the acting profile (or nothing for
//! anonymous requests), the operation, and for album-scoped writes the album's
//! `artist` field. Storage lookups happen in the service layer.

use serde::Serialize;

use crate::db::enums::Role;
use crate::error::{AppError, Result};

/// An authenticated principal together with its profile extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub user_id: i32,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl Actor {
    pub fn is_editor(&self) -> bool {
        self.role == Role::Editor
    }

    /// Whether this actor is credited as the given album artist.
    pub fn is_artist_of(&self, album_artist: &str) -> bool {
        self.role == Role::Artist && self.display_name == album_artist
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListAlbums,
    ViewAlbum,
    CreateAlbum,
    EditAlbum,
    DeleteAlbum,
    ManageSongs,
}

impl Operation {
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::ListAlbums | Self::ViewAlbum)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Anonymous principal attempting a write.
    LoginRequired,
    Denied(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Allow => Ok(()),
            Self::LoginRequired => Err(AppError::LoginRequired),
            Self::Denied(reason) => Err(AppError::PermissionDenied(reason.to_string())),
        }
    }
}

/// Which albums an actor sees when listing the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadScope {
    All,
    Artist(String),
}

impl ReadScope {
    pub fn artist_filter(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Artist(name) => Some(name.as_str()),
        }
    }
}

pub fn read_scope(actor: Option<&Actor>) -> ReadScope {
    match actor {
        Some(actor) if actor.role == Role::Artist => ReadScope::Artist(actor.display_name.clone()),
        _ => ReadScope::All,
    }
}

/// Decide whether `actor` may perform `op`.
///
/// `album_artist` is the target album's `artist` field and only matters for
/// `EditAlbum`; passing `None` there denies Artists.
pub fn authorize(actor: Option<&Actor>, op: Operation, album_artist: Option<&str>) -> Decision {
    if !op.is_write() {
        return Decision::Allow;
    }

    let Some(actor) = actor else {
        return Decision::LoginRequired;
    };

    match (actor.role, op) {
        (Role::Editor, _) => Decision::Allow,
        (Role::Artist, Operation::EditAlbum) => match album_artist {
            Some(artist) if actor.is_artist_of(artist) => Decision::Allow,
            _ => Decision::Denied("You do not have permission to edit this album."),
        },
        (Role::Artist, Operation::DeleteAlbum)
            if album_artist.is_some_and(|artist| actor.is_artist_of(artist)) =>
        {
            Decision::Denied("Artists cannot delete their own albums.")
        }
        (_, Operation::EditAlbum) => Decision::Denied("You do not have permission to edit this album."),
        (_, Operation::DeleteAlbum) => {
            Decision::Denied("You do not have permission to delete this album.")
        }
        (_, Operation::CreateAlbum) => Decision::Denied("You do not have permission to create an album."),
        (_, Operation::ManageSongs) => Decision::Denied("You do not have permission to manage songs."),
        (_, Operation::ListAlbums | Operation::ViewAlbum) => Decision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, display_name: &str) -> Actor {
        Actor {
            user_id: 1,
            username: display_name.to_lowercase(),
            display_name: display_name.to_string(),
            role,
        }
    }

    #[test]
    fn anonymous_can_read_but_must_log_in_to_write() {
        assert_eq!(authorize(None, Operation::ListAlbums, None), Decision::Allow);
        assert_eq!(authorize(None, Operation::ViewAlbum, Some("Artist")), Decision::Allow);
        for op in [
            Operation::CreateAlbum,
            Operation::EditAlbum,
            Operation::DeleteAlbum,
            Operation::ManageSongs,
        ] {
            assert_eq!(authorize(None, op, Some("Artist")), Decision::LoginRequired);
        }
    }

    #[test]
    fn viewer_is_read_only() {
        let viewer = actor(Role::Viewer, "Viewer");
        assert!(authorize(Some(&viewer), Operation::ViewAlbum, Some("Artist")).is_allowed());
        assert!(matches!(
            authorize(Some(&viewer), Operation::EditAlbum, Some("Viewer")),
            Decision::Denied(_)
        ));
        assert!(matches!(
            authorize(Some(&viewer), Operation::CreateAlbum, None),
            Decision::Denied(_)
        ));
        assert!(matches!(
            authorize(Some(&viewer), Operation::DeleteAlbum, Some("Artist")),
            Decision::Denied(_)
        ));
    }

    #[test]
    fn artist_edits_only_own_albums() {
        let artist = actor(Role::Artist, "Artist");
        assert!(authorize(Some(&artist), Operation::EditAlbum, Some("Artist")).is_allowed());
        assert_eq!(
            authorize(Some(&artist), Operation::EditAlbum, Some("Other")),
            Decision::Denied("You do not have permission to edit this album.")
        );
        assert!(!authorize(Some(&artist), Operation::EditAlbum, None).is_allowed());
    }

    #[test]
    fn artist_never_creates_or_deletes() {
        let artist = actor(Role::Artist, "Artist");
        assert_eq!(
            authorize(Some(&artist), Operation::DeleteAlbum, Some("Artist")),
            Decision::Denied("Artists cannot delete their own albums.")
        );
        assert_eq!(
            authorize(Some(&artist), Operation::DeleteAlbum, Some("Other")),
            Decision::Denied("You do not have permission to delete this album.")
        );
        assert!(!authorize(Some(&artist), Operation::CreateAlbum, None).is_allowed());
        assert!(!authorize(Some(&artist), Operation::ManageSongs, None).is_allowed());
    }

    #[test]
    fn editor_may_do_everything() {
        let editor = actor(Role::Editor, "Editor");
        for op in [
            Operation::ListAlbums,
            Operation::ViewAlbum,
            Operation::CreateAlbum,
            Operation::EditAlbum,
            Operation::DeleteAlbum,
            Operation::ManageSongs,
        ] {
            assert!(authorize(Some(&editor), op, Some("Someone Else")).is_allowed());
        }
    }

    #[test]
    fn artist_matching_is_exact_text() {
        let artist = actor(Role::Artist, "Artist");
        assert!(!authorize(Some(&artist), Operation::EditAlbum, Some("artist")).is_allowed());
        assert!(!authorize(Some(&artist), Operation::EditAlbum, Some("Artist ")).is_allowed());
    }

    #[test]
    fn read_scope_narrows_only_for_artists() {
        assert_eq!(read_scope(None), ReadScope::All);
        assert_eq!(read_scope(Some(&actor(Role::Viewer, "V"))), ReadScope::All);
        assert_eq!(read_scope(Some(&actor(Role::Editor, "E"))), ReadScope::All);
        assert_eq!(
            read_scope(Some(&actor(Role::Artist, "Artist"))).artist_filter(),
            Some("Artist")
        );
    }

    #[test]
    fn denied_maps_to_permission_error_not_not_found() {
        let err = Decision::Denied("nope").into_result().unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert!(matches!(
            Decision::LoginRequired.into_result(),
            Err(AppError::LoginRequired)
        ));
    }
}
