use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::borrowings::domain::Borrowing;
use crate::borrowings::domain::model::{BorrowingEntity, sort_by_borrowed_at};
use crate::borrowings::repository::BorrowingRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::memory::{apply_insert, apply_update, check_insert, check_update, matches_predicate, MemoryStore, paginate};

#[derive(Debug)]
pub struct MemoryBorrowingRepository {
    store: Arc<MemoryStore>,
}

impl MemoryBorrowingRepository {
    pub(crate) fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    fn filter(&self, f: impl Fn(&BorrowingEntity) -> bool) -> LibraryResult<Vec<BorrowingEntity>> {
        let mut records: Vec<BorrowingEntity> = self.store.with_tables(|tables| {
            Ok(tables.borrowings.values().filter(|b| f(b)).cloned().collect())
        })?;
        sort_by_borrowed_at(&mut records);
        Ok(records)
    }
}

#[async_trait]
impl Repository<BorrowingEntity> for MemoryBorrowingRepository {
    async fn create(&self, entity: &BorrowingEntity) -> LibraryResult<usize> {
        self.store.with_tables(|tables| {
            check_insert(&tables.borrowings, entity)?;
            apply_insert(&mut tables.borrowings, entity);
            Ok(1)
        })
    }

    async fn update(&self, entity: &BorrowingEntity) -> LibraryResult<usize> {
        self.store.with_tables(|tables| {
            check_update(&tables.borrowings, entity)?;
            apply_update(&mut tables.borrowings, entity);
            Ok(1)
        })
    }

    async fn get(&self, id: &str) -> LibraryResult<BorrowingEntity> {
        self.store.with_tables(|tables| {
            tables.borrowings.get(id).cloned()
                .ok_or_else(|| LibraryError::not_found(format!("borrowing not found for {}", id).as_str()))
        })
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BorrowingEntity>> {
        let records = self.filter(|b| matches_predicate(b, predicate))?;
        Ok(paginate(records, page, page_size))
    }
}

#[async_trait]
impl BorrowingRepository for MemoryBorrowingRepository {
    async fn find_outstanding_for_book(&self, isbn: &str) -> LibraryResult<Vec<BorrowingEntity>> {
        self.filter(|b| b.isbn == isbn && b.is_outstanding())
    }

    async fn find_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> LibraryResult<Vec<BorrowingEntity>> {
        self.filter(|b| b.borrowed_at >= start && b.borrowed_at <= end)
    }

    async fn count_grouped_by_book_in_range(&self, start: NaiveDateTime,
                                            end: NaiveDateTime) -> LibraryResult<BTreeMap<String, i64>> {
        self.store.with_tables(|tables| {
            let mut counts = BTreeMap::new();
            for borrowing in tables.borrowings.values()
                .filter(|b| b.borrowed_at >= start && b.borrowed_at <= end) {
                *counts.entry(borrowing.isbn.to_string()).or_insert(0) += 1;
            }
            Ok(counts)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use chrono::{Duration, Utc};
    use crate::borrowings::domain::model::BorrowingEntity;
    use crate::borrowings::repository::BorrowingRepository;
    use crate::borrowings::repository::memory_borrowing_repository::MemoryBorrowingRepository;
    use crate::core::library::LibraryError;
    use crate::core::repository::Repository;
    use crate::utils::memory::MemoryStore;

    fn new_repo() -> MemoryBorrowingRepository {
        MemoryBorrowingRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_should_create_update_borrowings() {
        let borrowing_repo = new_repo();
        let mut borrowing = BorrowingEntity::new("isbn1");
        assert_eq!(1, borrowing_repo.create(&borrowing).await.expect("should create borrowing"));
        borrowing.mark_returned(Utc::now().naive_utc());
        assert_eq!(1, borrowing_repo.update(&borrowing).await.expect("should update borrowing"));
        assert!(matches!(borrowing_repo.update(&borrowing).await, Err(LibraryError::CurrentlyUnavailable { .. })));
        let loaded = borrowing_repo.get(borrowing.borrowing_id.as_str()).await.expect("should return borrowing");
        assert!(!loaded.borrowing_status.is_outstanding());
    }

    #[tokio::test]
    async fn test_should_find_outstanding_oldest_first() {
        let borrowing_repo = new_repo();
        let now = Utc::now().naive_utc();
        let mut newer = BorrowingEntity::new("isbn1");
        newer.borrowed_at = now;
        let mut older = BorrowingEntity::new("isbn1");
        older.borrowed_at = now - Duration::hours(1);
        let mut returned = BorrowingEntity::new("isbn1");
        returned.mark_returned(now);
        for b in [&newer, &older, &returned, &BorrowingEntity::new("isbn2")] {
            borrowing_repo.create(b).await.expect("should create borrowing");
        }
        let outstanding = borrowing_repo.find_outstanding_for_book("isbn1").await.expect("should find borrowings");
        assert_eq!(vec![older.borrowing_id.clone(), newer.borrowing_id.clone()],
                   outstanding.iter().map(|b| b.borrowing_id.clone()).collect::<Vec<String>>());

        let res = borrowing_repo.query(&HashMap::from([("borrowing_status".to_string(), "Returned".to_string())]), None, 10)
            .await.expect("should query");
        assert_eq!(1, res.records.len());
    }

    #[tokio::test]
    async fn test_should_find_and_count_in_range() {
        let borrowing_repo = new_repo();
        let now = Utc::now().naive_utc();
        for (isbn, days) in [("isbn1", 1), ("isbn1", 2), ("isbn2", 3), ("isbn2", 30)] {
            let mut borrowing = BorrowingEntity::new(isbn);
            borrowing.borrowed_at = now - Duration::days(days);
            borrowing_repo.create(&borrowing).await.expect("should create borrowing");
        }
        let start = now - Duration::days(10);
        let in_range = borrowing_repo.find_in_range(start, now).await.expect("should find borrowings");
        assert_eq!(3, in_range.len());
        assert!(in_range[0].borrowed_at <= in_range[1].borrowed_at);
        let counts = borrowing_repo.count_grouped_by_book_in_range(start, now).await.expect("should count borrowings");
        assert_eq!(Some(&2), counts.get("isbn1"));
        assert_eq!(Some(&1), counts.get("isbn2"));

        // range bounds are inclusive
        let edge = now - Duration::days(30);
        assert_eq!(1, borrowing_repo.find_in_range(edge, edge).await.expect("should find borrowings").len());
    }
}
