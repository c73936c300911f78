use async_trait::async_trait;
use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryResult, PaginatedResult};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity, fails with duplicate-key if it already exists
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // updates an entity if its stored version still matches
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;

    // find by attribute equality
    async fn query(&self, predicate: &HashMap::<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<Entity>>;
}

// RepositoryStore selects the backing store, configured as `dynamodb`, `local` or `memory`
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    #[serde(rename = "dynamodb")]
    DynamoDB,
    #[serde(rename = "local")]
    LocalDynamoDB,
    #[serde(rename = "memory")]
    Memory,
}
