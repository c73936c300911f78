pub mod service;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::reports::dto::BorrowingReportDto;

#[async_trait]
pub(crate) trait ReportService: Sync + Send {
    // borrowings with borrowed_at in [start, end], oldest first
    async fn generate_report(&self, start: NaiveDateTime, end: NaiveDateTime) -> LibraryResult<BorrowingReportDto>;
}
