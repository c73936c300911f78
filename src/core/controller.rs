use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;

pub const BOOKS_RETRIEVED: &str = "Books retrieved successfully";
pub const BOOK_RETRIEVED: &str = "Book retrieved successfully";
pub const BOOK_CREATED: &str = "Book created successfully";
pub const BOOK_UPDATED: &str = "Book updated successfully";
pub const BOOK_DELETED: &str = "Book successfully marked as deleted";
pub const BOOK_RESTORED: &str = "Book successfully restored";
pub const BOOK_BORROWED: &str = "Book borrowed successfully";
pub const BOOK_RETURNED: &str = "Book returned successfully";
pub const BOOKS_UPLOADED: &str = "Books uploaded successfully";
pub const BOOKS_PARTIALLY_UPLOADED: &str = "Books uploaded with failures";
pub const NO_BOOKS_FOUND: &str = "No books found matching the search criteria";
pub const REPORT_GENERATED: &str = "Borrowing report generated successfully";
pub const NO_BORROWINGS_FOUND: &str = "No borrowing records found for the period";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppState {
    pub(crate) config: Configuration,
    pub(crate) store: RepositoryStore,
}

impl AppState {
    pub fn new(config: Configuration, store: RepositoryStore) -> AppState {
        AppState {
            config,
            store,
        }
    }

    pub fn from_env() -> LibraryResult<AppState> {
        let config = Configuration::from_env()?;
        let store = config.store;
        Ok(AppState::new(config, store))
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn store(&self) -> RepositoryStore {
        self.store
    }
}

// ErrorDetails carries the machine readable code of a failed operation
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ErrorDetails {
    pub code: String,
    pub details: String,
}

// ApiResponse is the envelope of every response: a payload and message on success,
// or an error code and message on failure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: &str) -> Self {
        ApiResponse {
            success: true,
            message: message.to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: &str, code: &str, details: &str) -> Self {
        ApiResponse {
            success: false,
            message: message.to_string(),
            data: None,
            error: Some(ErrorDetails { code: code.to_string(), details: details.to_string() }),
        }
    }
}

pub(crate) type ServerResponse<T> = (StatusCode, Json<ApiResponse<T>>);

pub(crate) type ServerError = (StatusCode, Json<ApiResponse<()>>);

pub(crate) fn ok<T>(data: T, message: &str) -> ServerResponse<T> {
    (StatusCode::OK, Json(ApiResponse::success(data, message)))
}

pub(crate) fn created<T>(data: T, message: &str) -> ServerResponse<T> {
    (StatusCode::CREATED, Json(ApiResponse::success(data, message)))
}

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(
        "Malformed request", "SERIALIZATION_ERROR", format!("{}", err).as_str())))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let (status, message) = match err {
            CommandError::Database { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process request")
            }
            CommandError::DuplicateKey { .. } => {
                (StatusCode::CONFLICT, "Resource already exists")
            }
            CommandError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "Resource not found")
            }
            CommandError::InvalidOperation { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid operation")
            }
            CommandError::Runtime { retryable, .. } => {
                if retryable {
                    (StatusCode::SERVICE_UNAVAILABLE, "Resource is busy, try again")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process request")
                }
            }
            CommandError::Serialization { .. } => {
                (StatusCode::BAD_REQUEST, "Malformed request")
            }
            CommandError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid request")
            }
        };
        (status, Json(ApiResponse::error(message, err.code(), err.message())))
    }
}
