use maud::{html, Markup, DOCTYPE};

use crate::permissions::Actor;

pub fn base_layout(title: &str, viewer: Option<&Actor>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" class="h-full" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - Label Music Manager" }

                link rel="stylesheet" href="/static/css/output.css";
            }
            body class="h-full bg-gray-50" {
                div class="min-h-full" {
                    (nav_bar(viewer))

                    main class="container mx-auto px-4 py-8" {
                        (content)
                    }

                    (footer())
                }
            }
        }
    }
}

fn nav_bar(viewer: Option<&Actor>) -> Markup {
    html! {
        nav class="bg-white shadow-sm" {
            div class="container mx-auto px-4" {
                div class="flex justify-between items-center h-16" {
                    a href="/" class="flex items-center space-x-3" {
                        span class="text-xl font-bold text-gray-900" { "Label Music Manager" }
                    }

                    div class="flex items-center space-x-4" {
                        a href="/" class="text-gray-700 hover:text-primary px-3 py-2 rounded-md text-sm font-medium" {
                            "Albums"
                        }
                        @if let Some(actor) = viewer {
                            @if actor.is_editor() {
                                a href="/albums/new" class="text-gray-700 hover:text-primary px-3 py-2 rounded-md text-sm font-medium" {
                                    "New album"
                                }
                            }
                            span class="text-sm text-gray-600" {
                                (actor.display_name) " (" (actor.role.code()) ")"
                            }
                            form method="post" action="/accounts/logout" class="inline" {
                                button type="submit" class="text-gray-700 hover:text-primary px-3 py-2 text-sm font-medium" {
                                    "Log out"
                                }
                            }
                        } @else {
                            a href="/accounts/login" class="text-gray-700 hover:text-primary px-3 py-2 rounded-md text-sm font-medium" {
                                "Log in"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer class="bg-white border-t border-gray-200 mt-12" {
            div class="container mx-auto px-4 py-6" {
                div class="text-center text-gray-600 text-sm" {
                    "Label Music Manager - catalog management for record labels"
                }
            }
        }
    }
}
