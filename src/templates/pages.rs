use axum::http::StatusCode;
use maud::{html, Markup};

use crate::db::{entities::{album, song}, enums::AlbumFormat};
use crate::error::FieldErrors;
use crate::permissions::Actor;
use crate::services::validation::{format_price, AlbumForm, TrackSelection};
use crate::services::AlbumDetail;

use super::components::{
    album_card, field_errors, format_duration, non_field_errors, notification, text_field,
};
use super::layout::base_layout;

pub fn album_list_page(viewer: Option<&Actor>, albums: &[AlbumDetail], flash: Option<&str>) -> Markup {
    base_layout(
        "Albums",
        viewer,
        html! {
            @if let Some(message) = flash {
                (notification(message, "success"))
            }

            div class="mb-6" {
                @if let Some(actor) = viewer {
                    h1 class="text-2xl font-bold text-gray-900" { "Welcome, " (actor.display_name) }
                } @else {
                    h1 class="text-2xl font-bold text-gray-900" { "Albums" }
                }
            }

            @if albums.is_empty() {
                div class="text-center py-12" {
                    p class="text-gray-600 text-lg" { "No albums found." }
                }
            } @else {
                div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-4 xl:grid-cols-5 gap-6" {
                    @for detail in albums {
                        (album_card(detail))
                    }
                }
            }
        },
    )
}

pub fn album_detail_page(
    viewer: Option<&Actor>,
    detail: &AlbumDetail,
    can_edit: bool,
    can_delete: bool,
    flash: Option<&str>,
) -> Markup {
    let album = &detail.album;
    base_layout(
        &album.title,
        viewer,
        html! {
            @if let Some(message) = flash {
                (notification(message, "success"))
            }

            div class="bg-white rounded-lg shadow-md p-6 flex flex-col md:flex-row gap-6" {
                img
                    src=(format!("/media/{}", album.cover_image))
                    alt=(format!("{} by {}", album.title, album.artist))
                    class="w-64 h-64 object-cover rounded";

                div class="flex-1" {
                    h1 class="text-3xl font-bold text-gray-900" { (album.title) }
                    p class="text-lg text-gray-600" { (album.artist) }

                    dl class="grid grid-cols-2 gap-2 mt-4 text-sm" {
                        dt class="text-gray-500" { "Format" }
                        dd { (album.format.label()) }
                        dt class="text-gray-500" { "Released" }
                        dd { (album.release_date.format("%B %-d, %Y")) }
                        dt class="text-gray-500" { "Price" }
                        dd { "$" (format_price(album.price_cents)) }
                        dt class="text-gray-500" { "Total playtime" }
                        dd id="total-playtime" { (format_duration(detail.total_playtime())) }
                    }

                    @if !album.description.is_empty() {
                        p class="mt-4 text-gray-700" { (album.description) }
                    }

                    div class="mt-6 flex space-x-3" {
                        @if can_edit {
                            a href=(format!("/albums/{}/edit", album.id))
                              class="px-4 py-2 bg-blue-600 text-white rounded-md text-sm" { "Edit" }
                        }
                        @if can_delete {
                            a href=(format!("/albums/{}/delete", album.id))
                              class="px-4 py-2 bg-red-600 text-white rounded-md text-sm" { "Delete" }
                        }
                    }
                }
            }

            div class="bg-white rounded-lg shadow-md p-6 mt-6" {
                h2 class="text-xl font-semibold mb-4" { "Tracklist" }
                @if detail.tracks.is_empty() {
                    p class="text-gray-500" { "No songs on this album yet." }
                } @else {
                    ol class="tracklist divide-y" {
                        @for track in &detail.tracks {
                            li class="py-2 flex justify-between" {
                                span {
                                    @if let Some(position) = track.item.position {
                                        span class="text-gray-400 mr-3" { (position) }
                                    }
                                    (track.song.title)
                                }
                                span class="text-gray-500" { (format_duration(i64::from(track.song.length))) }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Everything the create and edit forms need to render.
pub struct AlbumFormView<'a> {
    pub heading: &'a str,
    pub action: String,
    pub form: &'a AlbumForm,
    pub songs: &'a [song::Model],
    pub selected: &'a [TrackSelection],
    pub errors: &'a FieldErrors,
}

pub fn album_form_page(viewer: Option<&Actor>, view: &AlbumFormView<'_>) -> Markup {
    let form = view.form;
    let errors = view.errors;
    base_layout(
        view.heading,
        viewer,
        html! {
            div class="bg-white rounded-lg shadow-md p-6 max-w-3xl" {
                h1 class="text-2xl font-bold text-gray-900 mb-6" { (view.heading) }

                (non_field_errors(errors))

                form method="post" action=(view.action) {
                    (text_field("Title", "title", "text", &form.title, errors))

                    div class="mb-4" {
                        label for="id_description" class="block text-sm font-medium text-gray-700 mb-1" { "Description" }
                        textarea id="id_description" name="description" rows="4"
                                 class="w-full px-3 py-2 border border-gray-300 rounded-md" {
                            (form.description)
                        }
                        (field_errors(errors, "description"))
                    }

                    (text_field("Artist", "artist", "text", &form.artist, errors))
                    (text_field("Price", "price", "text", &form.price, errors))

                    div class="mb-4" {
                        label for="id_format" class="block text-sm font-medium text-gray-700 mb-1" { "Format" }
                        select id="id_format" name="format" class="w-full px-3 py-2 border border-gray-300 rounded-md" {
                            option value="" { "---------" }
                            @for format in AlbumFormat::ALL {
                                option value=(format.code()) selected[form.format == format.code()] {
                                    (format.label())
                                }
                            }
                        }
                        (field_errors(errors, "format"))
                    }

                    (text_field("Release date", "release_date", "date", &form.release_date, errors))
                    (text_field("Cover image", "cover_image", "text", &form.cover_image, errors))

                    fieldset class="mb-6" {
                        legend class="text-sm font-medium text-gray-700 mb-2" { "Tracks" }
                        @for song in view.songs {
                            @let selection = view.selected.iter().find(|t| t.song_id == song.id);
                            div class="flex items-center space-x-3 py-1" {
                                input type="checkbox" name="tracks" value=(song.id)
                                      id=(format!("id_tracks_{}", song.id))
                                      checked[selection.is_some()];
                                label for=(format!("id_tracks_{}", song.id)) class="flex-1" {
                                    (song.title) " (" (format_duration(i64::from(song.length))) ")"
                                }
                                input type="number" min="0"
                                      name=(format!("position_{}", song.id))
                                      value=[selection.and_then(|t| t.position)]
                                      placeholder="Position"
                                      class="w-24 px-2 py-1 border border-gray-300 rounded-md";
                            }
                        }
                        (field_errors(errors, "tracks"))
                    }

                    button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded-md" { "Save" }
                }
            }
        },
    )
}

pub fn album_delete_page(viewer: Option<&Actor>, album: &album::Model) -> Markup {
    base_layout(
        "Delete album",
        viewer,
        html! {
            div class="bg-white rounded-lg shadow-md p-6 max-w-xl" {
                h1 class="text-2xl font-bold text-gray-900 mb-4" { "Delete album" }
                p class="mb-6" {
                    "Are you sure you want to delete \"" (album.title) "\" by " (album.artist) "?"
                }
                form method="post" action=(format!("/albums/{}/delete", album.id)) {
                    button type="submit" class="px-4 py-2 bg-red-600 text-white rounded-md mr-3" { "Delete" }
                    a href=(format!("/albums/{}", album.id)) class="text-gray-600" { "Cancel" }
                }
            }
        },
    )
}

pub fn login_page(next: &str, username: &str, error: Option<&str>) -> Markup {
    base_layout(
        "Log in",
        None,
        html! {
            div class="bg-white rounded-lg shadow-md p-6 max-w-md mx-auto" {
                h1 class="text-2xl font-bold text-gray-900 mb-6" { "Log in" }

                @if let Some(error) = error {
                    (notification(error, "error"))
                }

                form method="post" action="/accounts/login" {
                    input type="hidden" name="next" value=(next);
                    (text_field("Username", "username", "text", username, &FieldErrors::new()))
                    (text_field("Password", "password", "password", "", &FieldErrors::new()))
                    button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded-md" { "Log in" }
                }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let heading = status.canonical_reason().unwrap_or("Error");
    base_layout(
        heading,
        None,
        html! {
            div class="text-center py-12" {
                h1 class="text-4xl font-bold text-gray-900" { (status.as_u16()) " " (heading) }
                p class="text-gray-600 mt-4" { (message) }
                a href="/" class="text-primary hover:underline mt-6 inline-block" { "Back to albums" }
            }
        },
    )
}
