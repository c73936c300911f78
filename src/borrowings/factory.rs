use crate::borrowings::repository::BorrowingRepository;
use crate::borrowings::repository::ddb_borrowing_repository::DDBBorrowingRepository;
use crate::borrowings::repository::memory_borrowing_repository::MemoryBorrowingRepository;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};
use crate::utils::memory::shared_memory_store;

pub(crate) async fn create_borrowing_repository(store: RepositoryStore) -> Box<dyn BorrowingRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBBorrowingRepository::new(client, "borrowings", "borrowings_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "borrowings", "borrowing_id", "isbn", "borrowed_at").await;
            Box::new(DDBBorrowingRepository::new(client, "borrowings", "borrowings_ndx"))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryBorrowingRepository::new(shared_memory_store()))
        }
    }
}
