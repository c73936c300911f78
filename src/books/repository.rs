pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;

// BookRepository looks books up by isbn; `get` includes soft-deleted books while the
// find_active_* and search methods only return active ones.
#[async_trait]
pub trait BookRepository: Repository<BookEntity> {
    async fn find_active_by_isbn(&self, isbn: &str) -> LibraryResult<BookEntity>;

    async fn find_active(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>>;

    // case-insensitive match of the query against title or author
    async fn search(&self, query: &str,
                    page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>>;
}
