//! Input forms and the field rules applied before anything is written.
//!
//! Forms hold raw user input (HTML form fields or JSON bodies). `validate`
//! turns them into typed values or a [`FieldErrors`] map keyed by field name.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::db::{entities::album, enums::AlbumFormat};
use crate::error::FieldErrors;

pub const REQUIRED: &str = "This field is required.";
pub const MAX_TITLE_CHARS: usize = 512;
pub const MAX_PRICE_CENTS: i32 = 99_999;
pub const MIN_SONG_LENGTH: i32 = 10;
pub const RELEASE_WINDOW_DAYS: i64 = 3 * 365;
pub const DEFAULT_COVER_IMAGE: &str = "no_cover.jpg";

/// A JSON scalar accepted where a form would send text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlbumForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub price: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub cover_image: String,
}

/// Album values that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumFields {
    pub title: String,
    pub description: String,
    pub artist: String,
    pub price_cents: i32,
    pub format: AlbumFormat,
    pub release_date: NaiveDate,
    pub cover_image: String,
}

impl AlbumForm {
    pub fn from_model(album: &album::Model) -> Self {
        Self {
            title: album.title.clone(),
            description: album.description.clone(),
            artist: album.artist.clone(),
            price: format_price(album.price_cents),
            format: album.format.code().to_string(),
            release_date: album.release_date.to_string(),
            cover_image: album.cover_image.clone(),
        }
    }

    /// Check every field. `today` anchors the release-date window.
    pub fn validate(&self, today: NaiveDate) -> Result<AlbumFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required_text(&mut errors, "title", &self.title);
        let artist = required_text(&mut errors, "artist", &self.artist);

        let price_cents = match parse_price(&self.price) {
            Ok(cents) => Some(cents),
            Err(message) => {
                errors.add("price", message);
                None
            }
        };

        let format = match self.format.trim() {
            "" => {
                errors.add("format", REQUIRED);
                None
            }
            code => {
                let parsed = AlbumFormat::from_code(code);
                if parsed.is_none() {
                    errors.add(
                        "format",
                        format!("Select a valid choice. {} is not one of the available choices.", code),
                    );
                }
                parsed
            }
        };

        let release_date = match self.release_date.trim() {
            "" => {
                errors.add("release_date", REQUIRED);
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => match check_release_date(date, today) {
                    Ok(()) => Some(date),
                    Err(message) => {
                        errors.add("release_date", message);
                        None
                    }
                },
                Err(_) => {
                    errors.add("release_date", "Enter a valid date.");
                    None
                }
            },
        };

        match (title, artist, price_cents, format, release_date) {
            (Some(title), Some(artist), Some(price_cents), Some(format), Some(release_date))
                if errors.is_empty() =>
            {
                let cover_image = match self.cover_image.trim() {
                    "" => DEFAULT_COVER_IMAGE.to_string(),
                    cover => cover.to_string(),
                };
                Ok(AlbumFields {
                    title,
                    description: self.description.trim().to_string(),
                    artist,
                    price_cents,
                    format,
                    release_date,
                    cover_image,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(errors: &mut FieldErrors, field: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    let chars = value.chars().count();
    if chars > MAX_TITLE_CHARS {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                MAX_TITLE_CHARS, chars
            ),
        );
        return None;
    }
    Some(value.to_string())
}

/// Latest accepted release date is recomputed from `today` on every call.
pub fn check_release_date(date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if date > today + Duration::days(RELEASE_WINDOW_DAYS) {
        return Err("Release date cannot be more than 3 years in the future");
    }
    Ok(())
}

/// Parse a decimal price such as `"12.99"` into minor units.
pub fn parse_price(raw: &str) -> Result<i32, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(REQUIRED.to_string());
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err("Enter a number.".to_string());
    }
    if fraction.len() > 2 {
        return Err("Ensure that there are no more than 2 decimal places.".to_string());
    }

    let whole = whole.trim_start_matches('0');
    if whole.len() > 3 {
        return Err(if negative {
            "Ensure this value is greater than or equal to 0.".to_string()
        } else {
            "Ensure this value is less than or equal to 999.99.".to_string()
        });
    }

    let whole: i32 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| "Enter a number.")? };
    let fraction: i32 = format!("{:0<2}", fraction).parse().map_err(|_| "Enter a number.")?;
    let cents = whole * 100 + fraction;

    if negative && cents > 0 {
        return Err("Ensure this value is greater than or equal to 0.".to_string());
    }
    if cents > MAX_PRICE_CENTS {
        return Err("Ensure this value is less than or equal to 999.99.".to_string());
    }
    Ok(cents)
}

pub fn format_price(cents: i32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SongForm {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub length: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFields {
    pub title: String,
    pub length: i32,
}

impl SongForm {
    pub fn validate(&self) -> Result<SongFields, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required_text(&mut errors, "title", &self.title);

        let length = match self.length.trim() {
            "" => {
                errors.add("length", REQUIRED);
                None
            }
            raw => match raw.parse::<i64>() {
                Ok(seconds) if seconds < i64::from(MIN_SONG_LENGTH) => {
                    errors.add(
                        "length",
                        format!("Ensure this value is greater than or equal to {}.", MIN_SONG_LENGTH),
                    );
                    None
                }
                Ok(seconds) => match i32::try_from(seconds) {
                    Ok(seconds) => Some(seconds),
                    Err(_) => {
                        errors.add(
                            "length",
                            format!("Ensure this value is less than or equal to {}.", i32::MAX),
                        );
                        None
                    }
                },
                Err(_) => {
                    errors.add("length", "Enter a whole number.");
                    None
                }
            },
        };

        match (title, length) {
            (Some(title), Some(length)) => Ok(SongFields { title, length }),
            _ => Err(errors),
        }
    }
}

/// One entry of an album's requested track selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TrackSelection {
    pub song_id: i32,
    #[serde(default)]
    pub position: Option<i32>,
}

/// Positions must be non-negative and a song may appear once per album.
pub fn check_track_selection(tracks: &[TrackSelection], errors: &mut FieldErrors) {
    let mut seen = HashSet::new();
    for track in tracks {
        if track.position.is_some_and(|p| p < 0) {
            errors.add(
                "tracks",
                format!(
                    "Position for song {} must be greater than or equal to 0.",
                    track.song_id
                ),
            );
        }
        if !seen.insert(track.song_id) {
            errors.add(
                "tracks",
                format!("Song {} is selected more than once.", track.song_id),
            );
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TracklistItemForm {
    pub album: i32,
    pub song: i32,
    #[serde(default)]
    pub position: Option<i32>,
}

impl TracklistItemForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if self.position.is_some_and(|p| p < 0) {
            return Err(FieldErrors::single(
                "position",
                "Ensure this value is greater than or equal to 0.",
            ));
        }
        Ok(())
    }
}

/// First 255 characters of a description, with `...` appended when cut.
pub fn short_description(description: &str) -> String {
    const LIMIT: usize = 255;
    match description.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn valid_form() -> AlbumForm {
        AlbumForm {
            title: "New Album".into(),
            description: "A wonderful album".into(),
            artist: "Artist Name".into(),
            price: "12.99".into(),
            format: "CD".into(),
            release_date: "2023-01-01".into(),
            cover_image: "cover.png".into(),
        }
    }

    #[test]
    fn test_valid_album_form() {
        let fields = valid_form().validate(today()).unwrap();
        assert_eq!(
            fields,
            AlbumFields {
                title: "New Album".into(),
                description: "A wonderful album".into(),
                artist: "Artist Name".into(),
                price_cents: 1299,
                format: AlbumFormat::Cd,
                release_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                cover_image: "cover.png".into(),
            }
        );
    }

    #[test]
    fn test_empty_title_is_required() {
        let form = AlbumForm {
            title: "   ".into(),
            ..valid_form()
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.get("title"), [REQUIRED.to_string()]);
        assert!(!errors.contains("artist"));
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let errors = AlbumForm::default().validate(today()).unwrap_err();
        for field in ["title", "artist", "price", "format", "release_date"] {
            assert!(errors.contains(field), "expected error for {}", field);
        }
        assert!(!errors.contains("description"));
    }

    #[test]
    fn test_release_date_window() {
        let limit = today() + Duration::days(RELEASE_WINDOW_DAYS);
        assert!(check_release_date(limit, today()).is_ok());
        assert!(check_release_date(limit + Duration::days(1), today()).is_err());

        let form = AlbumForm {
            release_date: (today() + Duration::days(365 * 4)).to_string(),
            ..valid_form()
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(
            errors.get("release_date"),
            ["Release date cannot be more than 3 years in the future".to_string()]
        );
    }

    #[test]
    fn test_release_date_must_parse() {
        let form = AlbumForm {
            release_date: "01/01/2023".into(),
            ..valid_form()
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.get("release_date"), ["Enter a valid date.".to_string()]);
    }

    #[test]
    fn test_invalid_format_choice() {
        let form = AlbumForm {
            format: "LP".into(),
            ..valid_form()
        };
        let errors = form.validate(today()).unwrap_err();
        assert!(errors.get("format")[0].contains("LP is not one of the available choices"));
    }

    #[test]
    fn test_parse_price_bounds() {
        assert_eq!(parse_price("0"), Ok(0));
        assert_eq!(parse_price("9.99"), Ok(999));
        assert_eq!(parse_price("20"), Ok(2000));
        assert_eq!(parse_price("14.9"), Ok(1490));
        assert_eq!(parse_price(".5"), Ok(50));
        assert_eq!(parse_price("999.99"), Ok(99_999));
        assert!(parse_price("1000").is_err());
        assert!(parse_price("999.999").is_err());
        assert!(parse_price("-0.01").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price(".").is_err());
        assert_eq!(parse_price(""), Err(REQUIRED.to_string()));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "0.00");
        assert_eq!(format_price(1299), "12.99");
        assert_eq!(format_price(99_999), "999.99");
    }

    #[test]
    fn test_album_form_accepts_numeric_json_price() {
        let form: AlbumForm = serde_json::from_str(
            r#"{"title": "T", "artist": "A", "price": 12.5, "format": "VL", "release_date": "2020-02-02"}"#,
        )
        .unwrap();
        assert_eq!(form.price, "12.5");
        assert_eq!(form.validate(today()).unwrap().price_cents, 1250);
    }

    #[test]
    fn test_blank_cover_image_uses_default() {
        let form = AlbumForm {
            cover_image: String::new(),
            ..valid_form()
        };
        assert_eq!(form.validate(today()).unwrap().cover_image, DEFAULT_COVER_IMAGE);
    }

    #[test]
    fn test_song_length_minimum() {
        let short = SongForm {
            title: "Test Song".into(),
            length: "5".into(),
        };
        assert_eq!(
            short.validate().unwrap_err().get("length"),
            ["Ensure this value is greater than or equal to 10.".to_string()]
        );

        let ok = SongForm {
            title: "Test Song".into(),
            length: "10".into(),
        };
        assert_eq!(ok.validate().unwrap().length, 10);
    }

    #[test]
    fn test_song_length_must_be_whole_number() {
        let form = SongForm {
            title: "Test Song".into(),
            length: "2.5".into(),
        };
        assert_eq!(form.validate().unwrap_err().get("length"), ["Enter a whole number.".to_string()]);
    }

    #[test]
    fn test_track_selection_rules() {
        let mut errors = FieldErrors::new();
        check_track_selection(
            &[
                TrackSelection { song_id: 1, position: Some(1) },
                TrackSelection { song_id: 2, position: None },
            ],
            &mut errors,
        );
        assert!(errors.is_empty());

        check_track_selection(
            &[
                TrackSelection { song_id: 1, position: Some(-1) },
                TrackSelection { song_id: 1, position: Some(2) },
            ],
            &mut errors,
        );
        assert_eq!(errors.get("tracks").len(), 2);
    }

    #[test]
    fn test_short_description() {
        assert_eq!(short_description("short"), "short");
        let exact = "a".repeat(255);
        assert_eq!(short_description(&exact), exact);
        let long = "b".repeat(300);
        let short = short_description(&long);
        assert_eq!(short.len(), 258);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_short_description_counts_characters() {
        let long = "é".repeat(256);
        let short = short_description(&long);
        assert_eq!(short.chars().count(), 258);
    }
}
