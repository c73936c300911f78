use crate::core::domain::Identifiable;
use crate::core::library::BookStatus;

pub mod model;

pub trait Book: Identifiable {
    fn status(&self) -> BookStatus;
    fn copies_in_stock(&self) -> i32;

    fn is_deleted(&self) -> bool {
        self.status().is_deleted()
    }

    fn is_available(&self) -> bool {
        !self.is_deleted() && self.copies_in_stock() > 0
    }
}
