use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A book row as stored in the `books` table and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Auto-assigned, monotonic identifier.
    pub id: i32,
    pub name: String,
    pub author: String,
    pub description: String,
    /// Price in the smallest currency unit. Never negative.
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete tombstone. `None` while the book is active.
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Book {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Applies the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: BookPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.updated_at = now;
    }
}

/// Payload for `POST /books`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub price: i64,
}

/// Payload for `PUT /books/{id}`.
///
/// Every field is a mask entry: a present field overwrites the stored value (zero values
/// included), an absent one keeps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub author: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
}

/// Query string for the name search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}
