use std::cmp;
use async_trait::async_trait;
use chrono::Utc;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::borrowings::repository::BorrowingRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::library::{BookStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::unit_of_work::{Mutation, UnitOfWork};

pub(crate) struct CatalogServiceImpl {
    config: Configuration,
    book_repository: Box<dyn BookRepository>,
    borrowing_repository: Box<dyn BorrowingRepository>,
    unit_of_work: Box<dyn UnitOfWork>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration,
                      book_repository: Box<dyn BookRepository>,
                      borrowing_repository: Box<dyn BorrowingRepository>,
                      unit_of_work: Box<dyn UnitOfWork>) -> Self {
        Self {
            config: config.clone(),
            book_repository,
            borrowing_repository,
            unit_of_work,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        book.validate()?;
        let now = Utc::now().naive_utc();
        let mut entity = BookEntity::from(book);
        entity.version = 0;
        entity.book_status = BookStatus::Active;
        entity.created_at = now;
        entity.updated_at = now;
        self.book_repository.create(&entity).await?;
        Ok(BookDto::from(&entity))
    }

    async fn update_book(&self, isbn: &str, book: &BookDto) -> LibraryResult<BookDto> {
        book.validate()?;
        if book.isbn != isbn {
            return Err(LibraryError::validation(
                format!("ISBN cannot be changed from {} to {}", isbn, book.isbn).as_str(), Some("400".to_string())));
        }
        let mut existing = self.book_repository.get(isbn).await?;
        existing.title = book.title.to_string();
        existing.author = book.author.to_string();
        existing.publication_year = book.publication_year;
        existing.copies_in_stock = book.copies_in_stock;
        self.book_repository.update(&existing).await?;
        self.find_book_by_isbn(isbn).await
    }

    async fn remove_book(&self, isbn: &str) -> LibraryResult<BookDto> {
        let mut book = self.book_repository.find_active_by_isbn(isbn).await?;
        // the loan counter on the book is read consistently, the borrowings index may lag behind it
        let outstanding = self.borrowing_repository.find_outstanding_for_book(isbn).await?;
        let active = cmp::max(book.borrowed_copies as usize, outstanding.len());
        if active > 0 {
            return Err(LibraryError::invalid_operation(
                format!("Cannot delete book as it is currently borrowed. Active borrowings: {}",
                        active).as_str()));
        }
        book.book_status = BookStatus::Deleted { deleted_at: Utc::now().naive_utc() };
        self.unit_of_work.commit(vec![Mutation::DeleteBook(book)]).await?;
        self.find_book_by_isbn(isbn).await
    }

    async fn restore_book(&self, isbn: &str) -> LibraryResult<BookDto> {
        let mut book = self.book_repository.get(isbn).await?;
        if !book.book_status.is_deleted() {
            return Err(LibraryError::invalid_operation(
                format!("Book {} is not deleted", isbn).as_str()));
        }
        book.book_status = BookStatus::Active;
        self.book_repository.update(&book).await?;
        self.find_book_by_isbn(isbn).await
    }

    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<BookDto> {
        self.book_repository.get(isbn).await.map(|b| BookDto::from(&b))
    }

    async fn find_books(&self, page: Option<&str>, page_size: Option<usize>) -> LibraryResult<PaginatedResult<BookDto>> {
        let res = self.book_repository.find_active(
            page, self.config.effective_page_size(page_size)).await?;
        Ok(res.map(|b| BookDto::from(b)))
    }

    async fn search_books(&self, query: &str,
                          page: Option<&str>, page_size: Option<usize>) -> LibraryResult<PaginatedResult<BookDto>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LibraryError::invalid_operation("Search query cannot be empty"));
        }
        let res = self.book_repository.search(
            query, page, self.config.effective_page_size(page_size)).await?;
        Ok(res.map(|b| BookDto::from(b)))
    }
}
