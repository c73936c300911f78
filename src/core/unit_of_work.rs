pub mod ddb_unit_of_work;
pub mod memory_unit_of_work;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::borrowings::domain::model::BorrowingEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::core::unit_of_work::ddb_unit_of_work::DDBUnitOfWork;
use crate::core::unit_of_work::memory_unit_of_work::MemoryUnitOfWork;
use crate::utils::ddb::build_db_client;
use crate::utils::memory::shared_memory_store;

// Mutation is a single write of a unit of work. Updates are conditional on the version
// the entity was read with, creates on the key being unused. DeleteBook is an update that
// also requires the stored book to have no copies out on loan.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    UpdateBook(BookEntity),
    DeleteBook(BookEntity),
    CreateBorrowing(BorrowingEntity),
    UpdateBorrowing(BorrowingEntity),
}

#[async_trait]
pub trait UnitOfWork: Sync + Send {
    // commits all mutations or none of them, a stale version fails with a retryable error
    async fn commit(&self, mutations: Vec<Mutation>) -> LibraryResult<usize>;
}

pub(crate) async fn create_unit_of_work(store: RepositoryStore) -> Box<dyn UnitOfWork> {
    match store {
        RepositoryStore::DynamoDB | RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBUnitOfWork::new(client, "books", "borrowings"))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryUnitOfWork::new(shared_memory_store()))
        }
    }
}
