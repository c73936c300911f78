use crate::core::domain::Identifiable;
use crate::core::library::BorrowingStatus;

pub mod model;

pub trait Borrowing: Identifiable {
    fn isbn(&self) -> String;
    fn status(&self) -> BorrowingStatus;

    fn is_outstanding(&self) -> bool {
        self.status().is_outstanding()
    }
}
