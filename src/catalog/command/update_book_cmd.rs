use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, command_error, CommandError};

pub(crate) struct UpdateBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// target_isbn comes from the path, the body carries the full book
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateBookCommandRequest {
    #[serde(skip)]
    pub(crate) target_isbn: String,
    pub(crate) isbn: String,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) publication_year: i32,
    pub(crate) copies_in_stock: i32,
}

impl UpdateBookCommandRequest {
    pub fn new(target_isbn: &str, book: &BookDto) -> Self {
        Self {
            target_isbn: target_isbn.to_string(),
            isbn: book.isbn.to_string(),
            title: book.title.to_string(),
            author: book.author.to_string(),
            publication_year: book.publication_year,
            copies_in_stock: book.copies_in_stock,
        }
    }

    pub fn build_book(&self) -> BookDto {
        BookDto::new(self.isbn.as_str(), self.title.as_str(), self.author.as_str(),
                     self.publication_year, self.copies_in_stock)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    pub(crate) book: BookDto,
}

impl UpdateBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        let book = req.build_book();
        let book = self.catalog_service.update_book(req.target_isbn.as_str(), &book)
            .await.map_err(command_error("update_book"))?;
        tracing::info!(isbn = book.isbn.as_str(), version = book.version, "book updated");
        Ok(UpdateBookCommandResponse::new(book))
    }
}
