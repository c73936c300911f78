pub mod ddb_borrowing_repository;
pub mod memory_borrowing_repository;

use std::collections::BTreeMap;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::borrowings::domain::model::BorrowingEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

#[async_trait]
pub trait BorrowingRepository: Repository<BorrowingEntity> {
    // outstanding records of a book, oldest first
    async fn find_outstanding_for_book(&self, isbn: &str) -> LibraryResult<Vec<BorrowingEntity>>;

    // records borrowed within [start, end], both ends inclusive
    async fn find_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> LibraryResult<Vec<BorrowingEntity>>;

    async fn count_grouped_by_book_in_range(&self, start: NaiveDateTime,
                                            end: NaiveDateTime) -> LibraryResult<BTreeMap<String, i64>>;
}
