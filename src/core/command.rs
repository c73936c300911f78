use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
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
    InvalidOperation {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

impl CommandError {
    // stable code reported to clients in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Database { .. } => "UPSTREAM_ERROR",
            CommandError::DuplicateKey { .. } => "DUPLICATE_KEY",
            CommandError::NotFound { .. } => "NOT_FOUND",
            CommandError::InvalidOperation { .. } => "INVALID_OPERATION",
            CommandError::Runtime { .. } => "UPSTREAM_ERROR",
            CommandError::Serialization { .. } => "SERIALIZATION_ERROR",
            CommandError::Validation { .. } => "VALIDATION_ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CommandError::Database { message, .. } => message,
            CommandError::DuplicateKey { message } => message,
            CommandError::NotFound { message } => message,
            CommandError::InvalidOperation { message } => message,
            CommandError::Runtime { message, .. } => message,
            CommandError::Serialization { message } => message,
            CommandError::Validation { message, .. } => message,
        }
    }

    // logs the failure at a level matching who is at fault
    pub fn log(&self, operation: &str) {
        match self {
            CommandError::Database { .. } | CommandError::Runtime { .. } => {
                tracing::error!(operation, code = self.code(), "{}", self.message());
            }
            _ => {
                tracing::warn!(operation, code = self.code(), "{}", self.message());
            }
        }
    }
}

// converts a domain failure into a command failure and records it against the operation
pub(crate) fn command_error(operation: &'static str) -> impl Fn(LibraryError) -> CommandError {
    move |err| {
        let err = CommandError::from(err);
        err.log(operation);
        err
    }
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::Database { message, reason_code, retryable } => {
                CommandError::Database { message, reason_code, retryable }
            }
            LibraryError::DuplicateKey { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::InvalidOperation { message } => {
                CommandError::InvalidOperation { message }
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                CommandError::Runtime { message, reason_code, retryable }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code, retryable: false }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::{command_error, CommandError};
    use crate::core::library::LibraryError;

    #[tokio::test]
    async fn test_should_build_command_error() {
        let _ = CommandError::Database { message: "test".to_string(), reason_code: None, retryable: false };
        let _ = CommandError::Runtime { message: "test".to_string(), reason_code: None, retryable: false };
        let _ = CommandError::Serialization { message: "test".to_string() };
        let _ = CommandError::Validation { message: "test".to_string(), reason_code: None };
    }

    #[tokio::test]
    async fn test_should_convert_library_error() {
        let err = CommandError::from(LibraryError::invalid_operation("no copies"));
        assert_eq!("INVALID_OPERATION", err.code());
        assert_eq!("no copies", err.message());
        let err = CommandError::from(LibraryError::not_found("missing"));
        assert_eq!("NOT_FOUND", err.code());
        let err = CommandError::from(LibraryError::unavailable("stale", None, true));
        assert!(matches!(err, CommandError::Runtime { retryable: true, .. }));
        assert_eq!("UPSTREAM_ERROR", err.code());
    }

    #[tokio::test]
    async fn test_should_build_logged_command_error() {
        let err = command_error("borrow_book")(LibraryError::validation("bad isbn", None));
        assert_eq!("VALIDATION_ERROR", err.code());
        assert_eq!("bad isbn", err.message());
    }
}
