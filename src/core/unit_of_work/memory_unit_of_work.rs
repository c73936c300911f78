use std::sync::Arc;
use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::unit_of_work::{Mutation, UnitOfWork};
use crate::utils::memory::{apply_insert, apply_update, check_insert, check_not_borrowed, check_update, MemoryStore};

#[derive(Debug)]
pub struct MemoryUnitOfWork {
    store: Arc<MemoryStore>,
}

impl MemoryUnitOfWork {
    pub(crate) fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(&self, mutations: Vec<Mutation>) -> LibraryResult<usize> {
        self.store.with_tables(|tables| {
            // nothing is written unless every mutation passes its check
            for mutation in &mutations {
                match mutation {
                    Mutation::UpdateBook(book) => check_update(&tables.books, book)?,
                    Mutation::DeleteBook(book) => check_not_borrowed(&tables.books, book)?,
                    Mutation::CreateBorrowing(borrowing) => check_insert(&tables.borrowings, borrowing)?,
                    Mutation::UpdateBorrowing(borrowing) => check_update(&tables.borrowings, borrowing)?,
                }
            }
            for mutation in &mutations {
                match mutation {
                    Mutation::UpdateBook(book) | Mutation::DeleteBook(book) => apply_update(&mut tables.books, book),
                    Mutation::CreateBorrowing(borrowing) => apply_insert(&mut tables.borrowings, borrowing),
                    Mutation::UpdateBorrowing(borrowing) => apply_update(&mut tables.borrowings, borrowing),
                }
            }
            Ok(mutations.len())
        })
    }
}
