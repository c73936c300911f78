use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::memory::{apply_insert, apply_update, check_insert, check_update, matches_predicate, MemoryStore, paginate};

#[derive(Debug)]
pub struct MemoryBookRepository {
    store: Arc<MemoryStore>,
}

impl MemoryBookRepository {
    pub(crate) fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    fn filter(&self, f: impl Fn(&BookEntity) -> bool) -> LibraryResult<Vec<BookEntity>> {
        self.store.with_tables(|tables| {
            Ok(tables.books.values().filter(|b| f(b)).cloned().collect())
        })
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        self.store.with_tables(|tables| {
            check_insert(&tables.books, entity)?;
            apply_insert(&mut tables.books, entity);
            Ok(1)
        })
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        self.store.with_tables(|tables| {
            check_update(&tables.books, entity)?;
            apply_update(&mut tables.books, entity);
            Ok(1)
        })
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        self.store.with_tables(|tables| {
            tables.books.get(id).cloned()
                .ok_or_else(|| LibraryError::not_found(format!("book not found for isbn {}", id).as_str()))
        })
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let records = self.filter(|b| matches_predicate(b, predicate))?;
        Ok(paginate(records, page, page_size))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_active_by_isbn(&self, isbn: &str) -> LibraryResult<BookEntity> {
        let book = self.get(isbn).await?;
        if book.book_status.is_deleted() {
            return Err(LibraryError::not_found(format!("book not found for isbn {}", isbn).as_str()));
        }
        Ok(book)
    }

    async fn find_active(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let records = self.filter(|b| !b.book_status.is_deleted())?;
        Ok(paginate(records, page, page_size))
    }

    async fn search(&self, query: &str,
                    page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let records = self.filter(|b| !b.book_status.is_deleted() && b.matches(query))?;
        Ok(paginate(records, page, page_size))
    }
}
