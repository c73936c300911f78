use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, command_error, CommandError};

pub(crate) struct AddBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) isbn: String,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) publication_year: i32,
    pub(crate) copies_in_stock: i32,
}

impl AddBookCommandRequest {
    pub fn new(isbn: &str, title: &str, author: &str, publication_year: i32, copies_in_stock: i32) -> Self {
        Self {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            publication_year,
            copies_in_stock,
        }
    }

    pub fn build_book(&self) -> BookDto {
        BookDto::new(self.isbn.as_str(), self.title.as_str(), self.author.as_str(),
                     self.publication_year, self.copies_in_stock)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    pub(crate) book: BookDto,
}

impl AddBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        let book = req.build_book();
        let book = self.catalog_service.add_book(&book).await.map_err(command_error("add_book"))?;
        tracing::info!(isbn = book.isbn.as_str(), "book added");
        Ok(AddBookCommandResponse::new(book))
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref SUT_CMD : AsyncOnce<AddBookCommand> = AsyncOnce::new(async {
                let svc = factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                AddBookCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_add_book() {
        let cmd = SUT_CMD.get().await.clone();

        let isbn = Uuid::new_v4().to_string();
        let res = cmd.execute(AddBookCommandRequest::new(isbn.as_str(), "test book", "author", 2001, 2))
            .await.expect("should add book");
        assert_eq!(isbn, res.book.isbn);
        assert_eq!(2, res.book.copies_in_stock);

        let res = cmd.execute(AddBookCommandRequest::new(isbn.as_str(), "test book", "author", 2001, 2)).await;
        assert!(matches!(res, Err(CommandError::DuplicateKey { .. })));
    }

    #[tokio::test]
    async fn test_should_not_run_add_invalid_book() {
        let cmd = SUT_CMD.get().await.clone();

        let res = cmd.execute(AddBookCommandRequest::new(Uuid::new_v4().to_string().as_str(), "test book", "", 2001, 2)).await;
        assert!(matches!(res, Err(CommandError::Validation { .. })));
    }
}
