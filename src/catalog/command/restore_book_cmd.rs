use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, command_error, CommandError};

pub(crate) struct RestoreBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl RestoreBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestoreBookCommandRequest {
    pub(crate) isbn: String,
}

impl RestoreBookCommandRequest {
    pub fn new(isbn: String) -> Self {
        Self {
            isbn,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RestoreBookCommandResponse {
    pub(crate) book: BookDto,
}

impl RestoreBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<RestoreBookCommandRequest, RestoreBookCommandResponse> for RestoreBookCommand {
    async fn execute(&self, req: RestoreBookCommandRequest) -> Result<RestoreBookCommandResponse, CommandError> {
        let book = self.catalog_service.restore_book(req.isbn.as_str())
            .await.map_err(command_error("restore_book"))?;
        tracing::info!(isbn = book.isbn.as_str(), "book restored");
        Ok(RestoreBookCommandResponse::new(book))
    }
}
