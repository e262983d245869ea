use maud::{html, Markup};

use crate::error::{FieldErrors, NON_FIELD_ERRORS};
use crate::services::slug::is_linkable;
use crate::services::validation::format_price;
use crate::services::AlbumDetail;

/// `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_duration(seconds: i64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Detail link with the slug when the slug routes back to the detail page.
pub fn album_url(detail: &AlbumDetail) -> String {
    let album = &detail.album;
    if is_linkable(&album.slug) {
        format!("/albums/{}/{}", album.id, album.slug)
    } else {
        format!("/albums/{}", album.id)
    }
}

pub fn album_card(detail: &AlbumDetail) -> Markup {
    let album = &detail.album;
    html! {
        div class="album-card bg-white rounded-lg shadow-md overflow-hidden" {
            a href=(album_url(detail)) {
                div class="relative aspect-square" {
                    img
                        src=(format!("/media/{}", album.cover_image))
                        alt=(format!("{} by {}", album.title, album.artist))
                        class="w-full h-full object-cover"
                        loading="lazy";
                }
            }

            div class="p-4" {
                h3 class="font-semibold text-gray-900 truncate" title=(album.title) {
                    a href=(album_url(detail)) { (album.title) }
                }
                p class="text-sm text-gray-600 truncate" { (album.artist) }
                p class="text-xs text-gray-500 mt-1" {
                    (album.format.label()) " · " (album.release_date.format("%Y")) " · $" (format_price(album.price_cents))
                }
                p class="text-xs text-gray-500" {
                    (detail.tracks.len()) " tracks · " (format_duration(detail.total_playtime()))
                }
            }
        }
    }
}

pub fn non_field_errors(errors: &FieldErrors) -> Markup {
    field_errors(errors, NON_FIELD_ERRORS)
}

pub fn field_errors(errors: &FieldErrors, field: &str) -> Markup {
    let messages = errors.get(field);
    html! {
        @if !messages.is_empty() {
            ul class="errorlist text-sm text-red-600 mt-1" {
                @for message in messages {
                    li { (message) }
                }
            }
        }
    }
}

pub fn text_field(label: &str, name: &str, kind: &str, value: &str, errors: &FieldErrors) -> Markup {
    html! {
        div class="mb-4" {
            label for=(format!("id_{}", name)) class="block text-sm font-medium text-gray-700 mb-1" {
                (label)
            }
            input
                type=(kind)
                id=(format!("id_{}", name))
                name=(name)
                value=(value)
                class="w-full px-3 py-2 border border-gray-300 rounded-md";
            (field_errors(errors, name))
        }
    }
}

pub fn notification(message: &str, notification_type: &str) -> Markup {
    let (bg_color, text_color) = match notification_type {
        "error" => ("bg-red-100", "text-red-800"),
        "success" => ("bg-green-100", "text-green-800"),
        _ => ("bg-blue-100", "text-blue-800"),
    };

    html! {
        div class=(format!("messages {} {} px-4 py-3 rounded-lg mb-4", bg_color, text_color)) {
            (message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{entities::album, enums::AlbumFormat};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(75), "1:15");
        assert_eq!(format_duration(3605), "1:00:05");
    }

    fn album(id: i32, slug: &str) -> AlbumDetail {
        AlbumDetail {
            album: album::Model {
                id,
                title: "Untitled".to_string(),
                description: String::new(),
                artist: "Nobody".to_string(),
                price_cents: 100,
                format: AlbumFormat::Vinyl,
                release_date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
                cover_image: "no_cover.jpg".to_string(),
                slug: slug.to_string(),
                created_at: Utc::now().into(),
                updated_at: Utc::now().into(),
            },
            tracks: Vec::new(),
        }
    }

    #[test]
    fn test_album_url_uses_slug_when_routable() {
        assert_eq!(album_url(&album(4, "blue-train")), "/albums/4/blue-train");
        assert_eq!(album_url(&album(5, "")), "/albums/5");
        assert_eq!(album_url(&album(6, "delete")), "/albums/6");
    }

    #[test]
    fn test_field_errors_render_only_when_present() {
        let errors = FieldErrors::single("title", "This field is required.");
        assert!(field_errors(&errors, "title")
            .into_string()
            .contains("This field is required."));
        assert!(field_errors(&errors, "artist").into_string().is_empty());
    }
}
