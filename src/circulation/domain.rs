pub mod service;

use async_trait::async_trait;
use crate::borrowings::dto::BorrowingDto;
use crate::core::library::LibraryResult;

// CirculationService moves copies of a book off and back onto the shelf. The stock count
// and the borrowing record of each move are written together or not at all.
#[async_trait]
pub(crate) trait CirculationService: Sync + Send {
    async fn borrow_book(&self, isbn: &str) -> LibraryResult<BorrowingDto>;
    // closes the oldest outstanding borrowing of the book
    async fn return_book(&self, isbn: &str) -> LibraryResult<BorrowingDto>;
}
