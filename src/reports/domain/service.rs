use std::collections::HashMap;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::books::repository::BookRepository;
use crate::borrowings::repository::BorrowingRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::reports::domain::ReportService;
use crate::reports::dto::{BorrowingEventDto, BorrowingReportDto};

pub(crate) struct ReportServiceImpl {
    book_repository: Box<dyn BookRepository>,
    borrowing_repository: Box<dyn BorrowingRepository>,
}

impl ReportServiceImpl {
    pub(crate) fn new(book_repository: Box<dyn BookRepository>,
                      borrowing_repository: Box<dyn BorrowingRepository>) -> Self {
        Self {
            book_repository,
            borrowing_repository,
        }
    }

    // current title of the book, deleted books included; a missing book reports an empty title
    async fn book_title(&self, isbn: &str) -> LibraryResult<String> {
        match self.book_repository.get(isbn).await {
            Ok(book) => Ok(book.title),
            Err(LibraryError::NotFound { .. }) => Ok(String::new()),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    async fn generate_report(&self, start: NaiveDateTime, end: NaiveDateTime) -> LibraryResult<BorrowingReportDto> {
        if end < start {
            return Err(LibraryError::invalid_operation(
                format!("Report end {} is before start {}", end, start).as_str()));
        }
        let borrowings = self.borrowing_repository.find_in_range(start, end).await?;
        if borrowings.is_empty() {
            return Ok(BorrowingReportDto::default());
        }
        let borrowing_counts_by_book = self.borrowing_repository.count_grouped_by_book_in_range(start, end).await?;

        let mut titles: HashMap<String, String> = HashMap::new();
        let mut borrowing_events = Vec::with_capacity(borrowings.len());
        for borrowing in borrowings {
            if !titles.contains_key(&borrowing.isbn) {
                let title = self.book_title(borrowing.isbn.as_str()).await?;
                titles.insert(borrowing.isbn.to_string(), title);
            }
            borrowing_events.push(BorrowingEventDto {
                book_title: titles.get(&borrowing.isbn).cloned().unwrap_or_default(),
                isbn: borrowing.isbn,
                borrowed_at: borrowing.borrowed_at,
                returned_at: borrowing.borrowing_status.returned_at(),
            });
        }
        Ok(BorrowingReportDto {
            borrowing_counts_by_book,
            borrowing_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{Duration, NaiveDateTime};
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::borrowings::domain::model::BorrowingEntity;
    use crate::borrowings::repository::memory_borrowing_repository::MemoryBorrowingRepository;
    use crate::core::library::{BookStatus, LibraryError};
    use crate::core::repository::Repository;
    use crate::reports::domain::ReportService;
    use crate::reports::domain::service::ReportServiceImpl;
    use crate::utils::date::parse_date;
    use crate::utils::memory::MemoryStore;

    fn base_date() -> NaiveDateTime {
        parse_date("2023-04-12T12:00:00").expect("should parse date")
    }

    async fn build_report_service() -> ReportServiceImpl {
        let store = Arc::new(MemoryStore::new());
        let books_repo = MemoryBookRepository::new(store.clone());
        let borrowing_repo = MemoryBorrowingRepository::new(store.clone());

        let mut deleted = BookEntity::new("isbn2", "Deleted Book", "Author", 2001, 1);
        deleted.book_status = BookStatus::Deleted { deleted_at: base_date() };
        books_repo.create(&BookEntity::new("isbn1", "First Book", "Author", 2001, 1)).await.expect("should create book");
        books_repo.create(&deleted).await.expect("should create book");

        for (isbn, hours, returned) in [("isbn1", 3, true), ("isbn2", 1, false), ("isbn1", 2, false),
                                        ("isbn3", 4, false), ("isbn1", 100, false)] {
            let mut borrowing = BorrowingEntity::new(isbn);
            borrowing.borrowed_at = base_date() + Duration::hours(hours);
            if returned {
                borrowing.mark_returned(borrowing.borrowed_at + Duration::minutes(30));
            }
            borrowing_repo.create(&borrowing).await.expect("should create borrowing");
        }
        ReportServiceImpl::new(Box::new(MemoryBookRepository::new(store.clone())),
                               Box::new(MemoryBorrowingRepository::new(store)))
    }

    #[tokio::test]
    async fn test_should_generate_report() {
        let report_svc = build_report_service().await;

        let report = report_svc.generate_report(base_date(), base_date() + Duration::hours(4))
            .await.expect("should generate report");
        assert_eq!(Some(&2), report.borrowing_counts_by_book.get("isbn1"));
        assert_eq!(Some(&1), report.borrowing_counts_by_book.get("isbn2"));
        assert_eq!(Some(&1), report.borrowing_counts_by_book.get("isbn3"));

        assert_eq!(vec!["isbn2", "isbn1", "isbn1", "isbn3"],
                   report.borrowing_events.iter().map(|e| e.isbn.as_str()).collect::<Vec<&str>>());
        assert_eq!("Deleted Book", report.borrowing_events[0].book_title.as_str());
        assert_eq!("First Book", report.borrowing_events[1].book_title.as_str());
        assert_eq!("", report.borrowing_events[3].book_title.as_str());
        assert!(report.borrowing_events[2].returned_at.is_some());
        assert!(report.borrowing_events[1].returned_at.is_none());
    }

    #[tokio::test]
    async fn test_should_generate_empty_report() {
        let report_svc = build_report_service().await;

        let start = base_date() - Duration::days(10);
        let report = report_svc.generate_report(start, start + Duration::days(1))
            .await.expect("should generate report");
        assert!(report.borrowing_counts_by_book.is_empty());
        assert!(report.is_empty());

        let json = serde_json::to_value(&report).expect("should serialize");
        assert_eq!(serde_json::json!({"borrowing_counts_by_book": {}, "borrowing_events": []}), json);
    }

    #[tokio::test]
    async fn test_should_not_generate_report_for_inverted_range() {
        let report_svc = build_report_service().await;

        let res = report_svc.generate_report(base_date(), base_date() - Duration::seconds(1)).await;
        assert!(matches!(res, Err(LibraryError::InvalidOperation { .. })));

        // a single instant is a valid range
        let at = base_date() + Duration::hours(1);
        let report = report_svc.generate_report(at, at).await.expect("should generate report");
        assert_eq!(1, report.borrowing_events.len());
    }
}
