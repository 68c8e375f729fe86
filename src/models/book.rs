//! Book model, submitted form data and field validation

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// Oldest publication year accepted for a book
pub const MIN_YEAR: i32 = 1700;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const AUTHOR_REQUIRED: &str = "Author is required";
pub const GENRE_REQUIRED: &str = "Genre cannot be null";
pub const YEAR_REQUIRED: &str = "Year is required";
pub const YEAR_NOT_A_NUMBER: &str = "Year must be a whole number";
pub const YEAR_OUT_OF_RANGE: &str = "Year has to be between 1700 and the current year";

/// Field order and missing-value message used when reporting validation errors
const FIELDS: [(&str, &str); 4] = [
    ("title", TITLE_REQUIRED),
    ("author", AUTHOR_REQUIRED),
    ("genre", GENRE_REQUIRED),
    ("year", YEAR_REQUIRED),
];

/// Latest publication year accepted for a book
pub fn max_year() -> i32 {
    Utc::now().year()
}

/// Persisted catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Publication year, between 1700 and the current year
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw book data as submitted by a form or an API client.
///
/// Also serves as the unsaved record shown back to the user when validation
/// fails, so nothing they typed is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookForm {
    /// Target book when editing; never read from the request body
    #[serde(skip_deserializing)]
    pub id: Option<i32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    /// Year as typed; accepts a JSON number or a string
    #[serde(default, deserialize_with = "year_text")]
    #[schema(example = "1954")]
    pub year: String,
}

/// A single field-level validation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Validated values ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
}

/// Presence rules only; every failure maps to the field's `*_REQUIRED` message
#[derive(Debug, Validate)]
struct BookDraft {
    #[validate(length(min = 1))]
    title: String,
    #[validate(length(min = 1))]
    author: String,
    #[validate(length(min = 1))]
    genre: String,
    #[validate(required)]
    year: Option<i32>,
}

impl BookForm {
    /// Check every field and return the values to persist, or the list of
    /// problems in field order.
    pub fn validated(&self) -> Result<NewBook, Vec<FieldError>> {
        let year_text = self.year.trim();
        let parsed_year = year_text.parse::<i32>().ok();

        let draft = BookDraft {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            genre: self.genre.trim().to_string(),
            year: parsed_year,
        };

        let mut errors = match draft.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };

        if !year_text.is_empty() && parsed_year.is_none() {
            // "required" already fired for the unparsable value; replace it
            errors.retain(|e| e.field != "year");
            errors.push(FieldError::new("year", YEAR_NOT_A_NUMBER));
        }

        if let Some(year) = parsed_year {
            if !(MIN_YEAR..=max_year()).contains(&year) {
                errors.push(FieldError::new("year", YEAR_OUT_OF_RANGE));
            }
        }

        match (errors.is_empty(), draft.year) {
            (true, Some(year)) => Ok(NewBook {
                title: draft.title,
                author: draft.author,
                genre: draft.genre,
                year,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year.to_string(),
        }
    }
}

/// Flatten validator output into messages ordered by form field
fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    FIELDS
        .iter()
        .filter(|(field, _)| by_field.contains_key(field))
        .map(|(field, message)| FieldError::new(field, message))
        .collect()
}

/// Accept the year either as text (HTML forms) or as a number (JSON clients)
fn year_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct YearVisitor;

    impl<'de> de::Visitor<'de> for YearVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a year as a string or an integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(YearVisitor)
}
