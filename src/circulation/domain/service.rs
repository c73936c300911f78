use async_trait::async_trait;
use chrono::Utc;
use crate::books::domain::Book;
use crate::books::repository::BookRepository;
use crate::borrowings::domain::model::BorrowingEntity;
use crate::borrowings::dto::BorrowingDto;
use crate::borrowings::repository::BorrowingRepository;
use crate::circulation::domain::CirculationService;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::unit_of_work::{Mutation, UnitOfWork};

pub(crate) struct CirculationServiceImpl {
    book_repository: Box<dyn BookRepository>,
    borrowing_repository: Box<dyn BorrowingRepository>,
    unit_of_work: Box<dyn UnitOfWork>,
}

impl CirculationServiceImpl {
    pub(crate) fn new(book_repository: Box<dyn BookRepository>,
                      borrowing_repository: Box<dyn BorrowingRepository>,
                      unit_of_work: Box<dyn UnitOfWork>) -> Self {
        Self {
            book_repository,
            borrowing_repository,
            unit_of_work,
        }
    }
}

#[async_trait]
impl CirculationService for CirculationServiceImpl {
    async fn borrow_book(&self, isbn: &str) -> LibraryResult<BorrowingDto> {
        let mut book = self.book_repository.find_active_by_isbn(isbn).await?;
        if !book.is_available() {
            return Err(LibraryError::invalid_operation(
                format!("No copies of book {} available for borrowing", isbn).as_str()));
        }
        book.lend_copy();
        let borrowing = BorrowingEntity::new(isbn);
        self.unit_of_work.commit(vec![
            Mutation::UpdateBook(book),
            Mutation::CreateBorrowing(borrowing.clone()),
        ]).await?;
        Ok(BorrowingDto::from(&borrowing))
    }

    async fn return_book(&self, isbn: &str) -> LibraryResult<BorrowingDto> {
        let mut book = self.book_repository.get(isbn).await?;
        let outstanding = self.borrowing_repository.find_outstanding_for_book(isbn).await?;
        let mut borrowing = match outstanding.into_iter().next() {
            Some(borrowing) => borrowing,
            // the book counts a loan whose record the borrowings index does not show yet
            None if book.borrowed_copies > 0 => {
                return Err(LibraryError::unavailable(
                    format!("Borrowing of book {} is not visible yet", isbn).as_str(), None, true));
            }
            None => {
                return Err(LibraryError::invalid_operation(
                    format!("No active borrowing found for book {}", isbn).as_str()));
            }
        };
        borrowing.mark_returned(Utc::now().naive_utc());
        book.receive_copy();
        let borrowing_id = borrowing.borrowing_id.to_string();
        self.unit_of_work.commit(vec![
            Mutation::UpdateBorrowing(borrowing),
            Mutation::UpdateBook(book),
        ]).await?;
        self.borrowing_repository.get(borrowing_id.as_str()).await.map(|b| BorrowingDto::from(&b))
    }
}
