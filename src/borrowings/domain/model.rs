use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::borrowings::domain::Borrowing;
use crate::core::domain::Identifiable;
use crate::core::library::BorrowingStatus;
use crate::utils::date::serializer;

// BorrowingEntity records one copy of a book leaving the shelf; it stays outstanding
// until the copy comes back.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BorrowingEntity {
    pub borrowing_id: String,
    pub version: i64,
    pub isbn: String,
    #[serde(with = "serializer")]
    pub borrowed_at: NaiveDateTime,
    #[serde(flatten)]
    pub borrowing_status: BorrowingStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BorrowingEntity {
    pub fn new(isbn: &str) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            borrowing_id: Uuid::new_v4().to_string(),
            version: 0,
            isbn: isbn.to_string(),
            borrowed_at: now,
            borrowing_status: BorrowingStatus::Borrowed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_returned(&mut self, returned_at: NaiveDateTime) {
        self.borrowing_status = BorrowingStatus::Returned { returned_at };
    }
}

impl Identifiable for BorrowingEntity {
    fn id(&self) -> String {
        self.borrowing_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Borrowing for BorrowingEntity {
    fn isbn(&self) -> String {
        self.isbn.to_string()
    }

    fn status(&self) -> BorrowingStatus {
        self.borrowing_status
    }
}

// orders records by borrowed_at, oldest first, with borrowing_id breaking ties
pub fn sort_by_borrowed_at(records: &mut [BorrowingEntity]) {
    records.sort_by(|a, b| a.borrowed_at.cmp(&b.borrowed_at)
        .then_with(|| a.borrowing_id.cmp(&b.borrowing_id)));
}
