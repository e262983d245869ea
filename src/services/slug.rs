use unicode_normalization::UnicodeNormalization;

/// Path segments the album routes already claim after `/albums/:id/`.
const RESERVED: [&str; 2] = ["edit", "delete"];

/// Build a URL-safe slug from an album title.
///
/// Accented letters are folded to ASCII first (NFKD), then ASCII letters,
/// digits, underscores and hyphens are kept and lowercased, and runs of
/// whitespace or hyphens become a single `-`. Anything else is dropped, so a
/// title with no Latin letters yields an empty slug. A slug equal to one of
/// the reserved action segments gets an `-album` suffix.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.nfkd() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    let slug = slug.trim_matches(|c| c == '-' || c == '_').to_string();
    if RESERVED.contains(&slug.as_str()) {
        format!("{}-album", slug)
    } else {
        slug
    }
}

/// Whether `/albums/:id/<slug>` reaches the detail page for this slug.
pub fn is_linkable(slug: &str) -> bool {
    !slug.is_empty() && !RESERVED.contains(&slug)
}
