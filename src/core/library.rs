use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::utils::date::serializer;

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    // Business rule violation such as borrowing a book without copies in stock or
    // deleting a book that is still borrowed. The request is well-formed but the
    // current state of the catalog does not allow it.
    InvalidOperation {
        message: String,
    },
    // This is a retry-able error, which indicates that the row being written has been
    // modified by another request since it was read (optimistic version check failed).
    // The caller can retry the whole operation with or without a backoff.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn invalid_operation(message: &str) -> LibraryError {
        LibraryError::InvalidOperation { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("400") {
                LibraryError::validation(
                    format!("bad request error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn message(&self) -> &str {
        match self {
            LibraryError::Database { message, .. } => message,
            LibraryError::DuplicateKey { message } => message,
            LibraryError::NotFound { message } => message,
            LibraryError::InvalidOperation { message } => message,
            LibraryError::CurrentlyUnavailable { message, .. } => message,
            LibraryError::Validation { message, .. } => message,
            LibraryError::Serialization { message } => message,
            LibraryError::Runtime { message, .. } => message,
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::InvalidOperation { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl From<config::ConfigError> for LibraryError {
    fn from(err: config::ConfigError) -> Self {
        LibraryError::validation(
            format!("invalid configuration {}", err).as_str(), None)
    }
}

impl From<csv::Error> for LibraryError {
    fn from(err: csv::Error) -> Self {
        LibraryError::validation(
            format!("csv parsing {}", err).as_str(), Some("400".to_string()))
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::InvalidOperation { message } => {
                write!(f, "{}", message)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for Repository .
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }

    pub(crate) fn map<U>(&self, f: impl Fn(&T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            page: self.page.clone(),
            page_size: self.page_size,
            next_page: self.next_page.clone(),
            records: self.records.iter().map(f).collect(),
        }
    }
}

// BookStatus tracks the soft-delete lifecycle of a book. A deleted book keeps its row
// and always carries the time it was deleted.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "book_status")]
pub enum BookStatus {
    Active,
    Deleted {
        #[serde(with = "serializer")]
        deleted_at: NaiveDateTime,
    },
}

impl BookStatus {
    pub fn is_deleted(&self) -> bool {
        matches!(self, BookStatus::Deleted { .. })
    }

    pub fn deleted_at(&self) -> Option<NaiveDateTime> {
        match self {
            BookStatus::Active => None,
            BookStatus::Deleted { deleted_at } => Some(*deleted_at),
        }
    }

    // name of the status as stored in the book_status attribute
    pub fn name(&self) -> &'static str {
        match self {
            BookStatus::Active => "Active",
            BookStatus::Deleted { .. } => "Deleted",
        }
    }
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// BorrowingStatus tracks a borrowing record; a record is outstanding until it is returned.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "borrowing_status")]
pub enum BorrowingStatus {
    Borrowed,
    Returned {
        #[serde(with = "serializer")]
        returned_at: NaiveDateTime,
    },
}

impl BorrowingStatus {
    pub fn is_outstanding(&self) -> bool {
        matches!(self, BorrowingStatus::Borrowed)
    }

    pub fn returned_at(&self) -> Option<NaiveDateTime> {
        match self {
            BorrowingStatus::Borrowed => None,
            BorrowingStatus::Returned { returned_at } => Some(*returned_at),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BorrowingStatus::Borrowed => "Borrowed",
            BorrowingStatus::Returned { .. } => "Returned",
        }
    }
}

impl Display for BorrowingStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::library::{BookStatus, BorrowingStatus, LibraryError};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_duplicate_key_error() {
        assert!(matches!(LibraryError::duplicate_key("test"), LibraryError::DuplicateKey{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_invalid_operation_error() {
        assert!(matches!(LibraryError::invalid_operation("test"), LibraryError::InvalidOperation{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_unavailable_error() {
        assert!(matches!(LibraryError::unavailable("test", None, false), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_validation_error() {
        assert!(matches!(LibraryError::validation("test", None), LibraryError::Validation{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(LibraryError::database_or_unavailable("test", None, true), LibraryError::CurrentlyUnavailable{ .. }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("404".to_string()), false), LibraryError::NotFound{ .. }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("400".to_string()), false), LibraryError::Validation{ .. }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("500".to_string()), false), LibraryError::Database{ .. }));
        assert!(matches!(LibraryError::database_or_unavailable("test", None, false), LibraryError::Database{ .. }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, LibraryError::database("test", None, false).retryable());
        assert_eq!(false, LibraryError::duplicate_key("test").retryable());
        assert_eq!(false, LibraryError::not_found("test").retryable());
        assert_eq!(false, LibraryError::invalid_operation("test").retryable());
        assert_eq!(false, LibraryError::unavailable("test", None, false).retryable());
        assert_eq!(true, LibraryError::unavailable("test", None, true).retryable());
        assert_eq!(false, LibraryError::validation("test", None).retryable());
        assert_eq!(false, LibraryError::serialization("test").retryable());
        assert_eq!(false, LibraryError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_serialize_book_status_as_tag() {
        let now = Utc::now().naive_utc();
        let active = serde_json::to_value(BookStatus::Active).expect("should serialize");
        assert_eq!("Active", active["book_status"].as_str().unwrap());
        assert!(active.get("deleted_at").is_none());

        let deleted = serde_json::to_value(BookStatus::Deleted { deleted_at: now }).expect("should serialize");
        assert_eq!("Deleted", deleted["book_status"].as_str().unwrap());
        let parsed: BookStatus = serde_json::from_value(deleted).expect("should deserialize");
        assert!(parsed.is_deleted());
        assert!(parsed.deleted_at().is_some());
    }

    #[tokio::test]
    async fn test_should_report_borrowing_status() {
        let now = Utc::now().naive_utc();
        assert!(BorrowingStatus::Borrowed.is_outstanding());
        assert_eq!(None, BorrowingStatus::Borrowed.returned_at());
        let returned = BorrowingStatus::Returned { returned_at: now };
        assert!(!returned.is_outstanding());
        assert_eq!(Some(now), returned.returned_at());
        assert_eq!("Returned", returned.to_string());
    }
}
