use std::collections::BTreeMap;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::utils::date::serializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowingEventDto {
    pub isbn: String,
    pub book_title: String,
    #[serde(with = "serializer")]
    pub borrowed_at: NaiveDateTime,
    pub returned_at: Option<NaiveDateTime>,
}

// BorrowingReportDto summarizes the borrowings that started within a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorrowingReportDto {
    pub borrowing_counts_by_book: BTreeMap<String, i64>,
    pub borrowing_events: Vec<BorrowingEventDto>,
}

impl BorrowingReportDto {
    pub fn is_empty(&self) -> bool {
        self.borrowing_events.is_empty()
    }
}
