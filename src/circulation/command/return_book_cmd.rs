use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::borrowings::dto::BorrowingDto;
use crate::circulation::domain::CirculationService;
use crate::core::command::{Command, command_error, CommandError};

pub(crate) struct ReturnBookCommand {
    circulation_service: Box<dyn CirculationService>,
}

impl ReturnBookCommand {
    pub(crate) fn new(circulation_service: Box<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReturnBookCommandRequest {
    isbn: String,
}

impl ReturnBookCommandRequest {
    pub fn new(isbn: String) -> Self {
        Self {
            isbn,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReturnBookCommandResponse {
    pub(crate) borrowing: BorrowingDto,
}

impl ReturnBookCommandResponse {
    pub fn new(borrowing: BorrowingDto) -> Self {
        Self {
            borrowing,
        }
    }
}

#[async_trait]
impl Command<ReturnBookCommandRequest, ReturnBookCommandResponse> for ReturnBookCommand {
    async fn execute(&self, req: ReturnBookCommandRequest) -> Result<ReturnBookCommandResponse, CommandError> {
        let borrowing = self.circulation_service.return_book(req.isbn.as_str())
            .await.map_err(command_error("return_book"))?;
        tracing::info!(isbn = borrowing.isbn.as_str(), borrowing_id = borrowing.borrowing_id.as_str(), "book returned");
        Ok(ReturnBookCommandResponse::new(borrowing))
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
    use crate::circulation::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest};
    use crate::circulation::factory::create_circulation_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref BOOK_CMD : AsyncOnce<AddBookCommand> = AsyncOnce::new(async {
                let svc = create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                AddBookCommand::new(svc)
            });
        static ref BORROW_CMD : AsyncOnce<BorrowBookCommand> = AsyncOnce::new(async {
                let svc = create_circulation_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                BorrowBookCommand::new(svc)
            });
        static ref SUT_CMD : AsyncOnce<ReturnBookCommand> = AsyncOnce::new(async {
                let svc = create_circulation_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                ReturnBookCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_return_book() {
        let book_cmd = BOOK_CMD.get().await.clone();
        let borrow_cmd = BORROW_CMD.get().await.clone();
        let return_cmd = SUT_CMD.get().await.clone();

        let isbn = Uuid::new_v4().to_string();
        let _ = book_cmd.execute(AddBookCommandRequest::new(isbn.as_str(), "test book", "author", 2001, 1))
            .await.expect("should add book");
        let res = return_cmd.execute(ReturnBookCommandRequest::new(isbn.to_string())).await;
        assert!(matches!(res, Err(CommandError::InvalidOperation { .. })));

        let borrowed = borrow_cmd.execute(BorrowBookCommandRequest::new(isbn.to_string())).await.expect("should borrow book");
        let returned = return_cmd.execute(ReturnBookCommandRequest::new(isbn.to_string())).await.expect("should return book");
        assert_eq!(borrowed.borrowing.borrowing_id, returned.borrowing.borrowing_id);
        assert!(!returned.borrowing.borrowing_status.is_outstanding());
    }
}
