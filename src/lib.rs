pub mod books;
pub mod borrowings;
pub mod catalog;
pub mod circulation;
pub mod core;
pub mod imports;
pub mod reports;
pub mod utils;
