use std::cmp;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::core::library::BookStatus;
use crate::utils::date::serializer;

// BookEntity abstracts a catalog title identified by its isbn; copies_in_stock counts the
// physical copies currently on the shelf and borrowed_copies the ones out on loan. Borrow and
// return change both in the same write as the borrowing record.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BookEntity {
    pub isbn: String,
    pub version: i64,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub copies_in_stock: i32,
    #[serde(default)]
    pub borrowed_copies: i32,
    #[serde(flatten)]
    pub book_status: BookStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(isbn: &str, title: &str, author: &str, publication_year: i32, copies_in_stock: i32) -> Self {
        Self {
            isbn: isbn.to_string(),
            version: 0,
            title: title.to_string(),
            author: author.to_string(),
            publication_year,
            copies_in_stock,
            borrowed_copies: 0,
            book_status: BookStatus::Active,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    // lowercase text that search queries are matched against
    pub fn search_key(&self) -> String {
        format!("{} {}", self.title, self.author).to_lowercase()
    }

    pub fn lend_copy(&mut self) {
        self.copies_in_stock -= 1;
        self.borrowed_copies += 1;
    }

    pub fn receive_copy(&mut self) {
        self.copies_in_stock += 1;
        self.borrowed_copies = cmp::max(self.borrowed_copies - 1, 0);
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.author.to_lowercase().contains(&query)
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.isbn.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Book for BookEntity {
    fn status(&self) -> BookStatus {
        self.book_status
    }

    fn copies_in_stock(&self) -> i32 {
        self.copies_in_stock
    }
}
