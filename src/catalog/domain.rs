pub mod service;

use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::core::library::{LibraryResult, PaginatedResult};

// CatalogService manages the lifecycle of books. Removal is a soft delete that is refused
// while copies of the book are still borrowed.
#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto>;
    async fn update_book(&self, isbn: &str, book: &BookDto) -> LibraryResult<BookDto>;
    async fn remove_book(&self, isbn: &str) -> LibraryResult<BookDto>;
    async fn restore_book(&self, isbn: &str) -> LibraryResult<BookDto>;
    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<BookDto>;
    async fn find_books(&self, page: Option<&str>, page_size: Option<usize>) -> LibraryResult<PaginatedResult<BookDto>>;
    async fn search_books(&self, query: &str,
                          page: Option<&str>, page_size: Option<usize>) -> LibraryResult<PaginatedResult<BookDto>>;
}
