use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::books::domain::model::BookEntity;
use crate::core::domain::Identifiable;
use crate::core::library::{BookStatus, LibraryError, LibraryResult};
use crate::utils::date::serializer;

pub const MIN_PUBLICATION_YEAR: i32 = 1000;
pub const MAX_PUBLICATION_YEAR: i32 = 9999;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub isbn: String,
    pub version: i64,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub copies_in_stock: i32,
    #[serde(flatten)]
    pub book_status: BookStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookDto {
    pub fn new(isbn: &str, title: &str, author: &str, publication_year: i32, copies_in_stock: i32) -> BookDto {
        BookDto {
            isbn: isbn.to_string(),
            version: 0,
            title: title.to_string(),
            author: author.to_string(),
            publication_year,
            copies_in_stock,
            book_status: BookStatus::Active,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.isbn.trim().is_empty() {
            return Err(LibraryError::validation("ISBN is required", Some("400".to_string())));
        }
        if self.title.trim().is_empty() {
            return Err(LibraryError::validation("Title is required", Some("400".to_string())));
        }
        if self.author.trim().is_empty() {
            return Err(LibraryError::validation("Author is required", Some("400".to_string())));
        }
        if !(MIN_PUBLICATION_YEAR..=MAX_PUBLICATION_YEAR).contains(&self.publication_year) {
            return Err(LibraryError::validation(
                format!("Publication year must be between {} and {}, got {}",
                        MIN_PUBLICATION_YEAR, MAX_PUBLICATION_YEAR, self.publication_year).as_str(),
                Some("400".to_string())));
        }
        if self.copies_in_stock < 0 {
            return Err(LibraryError::validation("Number of copies cannot be negative", Some("400".to_string())));
        }
        Ok(())
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> String {
        self.isbn.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Book for BookDto {
    fn status(&self) -> BookStatus {
        self.book_status
    }

    fn copies_in_stock(&self) -> i32 {
        self.copies_in_stock
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            isbn: other.isbn.to_string(),
            version: other.version,
            title: other.title.to_string(),
            author: other.author.to_string(),
            publication_year: other.publication_year,
            copies_in_stock: other.copies_in_stock,
            book_status: other.book_status,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            isbn: other.isbn.to_string(),
            version: other.version,
            title: other.title.to_string(),
            author: other.author.to_string(),
            publication_year: other.publication_year,
            copies_in_stock: other.copies_in_stock,
            borrowed_copies: 0,
            book_status: other.book_status,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
