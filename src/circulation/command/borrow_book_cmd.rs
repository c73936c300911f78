use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::borrowings::dto::BorrowingDto;
use crate::circulation::domain::CirculationService;
use crate::core::command::{Command, command_error, CommandError};

pub(crate) struct BorrowBookCommand {
    circulation_service: Box<dyn CirculationService>,
}

impl BorrowBookCommand {
    pub(crate) fn new(circulation_service: Box<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BorrowBookCommandRequest {
    isbn: String,
}

impl BorrowBookCommandRequest {
    pub fn new(isbn: String) -> Self {
        Self {
            isbn,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BorrowBookCommandResponse {
    pub(crate) borrowing: BorrowingDto,
}

impl BorrowBookCommandResponse {
    pub fn new(borrowing: BorrowingDto) -> Self {
        Self {
            borrowing,
        }
    }
}

#[async_trait]
impl Command<BorrowBookCommandRequest, BorrowBookCommandResponse> for BorrowBookCommand {
    async fn execute(&self, req: BorrowBookCommandRequest) -> Result<BorrowBookCommandResponse, CommandError> {
        let borrowing = self.circulation_service.borrow_book(req.isbn.as_str())
            .await.map_err(command_error("borrow_book"))?;
        tracing::info!(isbn = borrowing.isbn.as_str(), borrowing_id = borrowing.borrowing_id.as_str(), "book borrowed");
        Ok(BorrowBookCommandResponse::new(borrowing))
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::factory::create_catalog_service;
    use crate::circulation::command::borrow_book_cmd::{BorrowBookCommand, BorrowBookCommandRequest};
    use crate::circulation::factory::create_circulation_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref BOOK_CMD : AsyncOnce<AddBookCommand> = AsyncOnce::new(async {
                let svc = create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                AddBookCommand::new(svc)
            });
        static ref SUT_CMD : AsyncOnce<BorrowBookCommand> = AsyncOnce::new(async {
                let svc = create_circulation_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                BorrowBookCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_borrow_book() {
        let book_cmd = BOOK_CMD.get().await.clone();
        let borrow_cmd = SUT_CMD.get().await.clone();

        let isbn = Uuid::new_v4().to_string();
        let _ = book_cmd.execute(AddBookCommandRequest::new(isbn.as_str(), "test book", "author", 2001, 1))
            .await.expect("should add book");
        let res = borrow_cmd.execute(BorrowBookCommandRequest::new(isbn.to_string())).await.expect("should borrow book");
        assert_eq!(isbn, res.borrowing.isbn);

        let res = borrow_cmd.execute(BorrowBookCommandRequest::new(isbn.to_string())).await;
        assert!(matches!(res, Err(CommandError::InvalidOperation { .. })));
    }
}
