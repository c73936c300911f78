use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::borrowings::domain::Borrowing;
use crate::borrowings::domain::model::BorrowingEntity;
use crate::core::domain::Identifiable;
use crate::core::library::BorrowingStatus;
use crate::utils::date::serializer;

// BorrowingDto is returned by the borrow and return operations
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BorrowingDto {
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

impl Identifiable for BorrowingDto {
    fn id(&self) -> String {
        self.borrowing_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Borrowing for BorrowingDto {
    fn isbn(&self) -> String {
        self.isbn.to_string()
    }

    fn status(&self) -> BorrowingStatus {
        self.borrowing_status
    }
}

impl From<&BorrowingEntity> for BorrowingDto {
    fn from(other: &BorrowingEntity) -> Self {
        Self {
            borrowing_id: other.borrowing_id.to_string(),
            version: other.version,
            isbn: other.isbn.to_string(),
            borrowed_at: other.borrowed_at,
            borrowing_status: other.borrowing_status,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
