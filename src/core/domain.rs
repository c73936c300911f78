use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Configuration abstracts config options for library system
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Configuration {
    #[serde(alias = "branch")]
    pub branch_id: String,
    pub store: RepositoryStore,
    pub dev_mode: bool,
    pub log_level: String,
    pub page_size: usize,
    pub max_page_size: usize,
    pub dynamodb_endpoint: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new("dev")
    }
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            store: RepositoryStore::LocalDynamoDB,
            dev_mode: true,
            log_level: "info".to_string(),
            page_size: 20,
            max_page_size: 100,
            dynamodb_endpoint: "http://localhost:8000".to_string(),
        }
    }

    /// Loads configuration from `LIBRARY_*` environment variables, e.g. `LIBRARY_STORE=memory`.
    /// Unset keys keep their defaults, malformed values fail the load.
    pub fn from_env() -> LibraryResult<Self> {
        Configuration::from_source(config::Environment::with_prefix("LIBRARY"))
    }

    pub(crate) fn from_source<S>(source: S) -> LibraryResult<Self>
        where S: config::Source + Send + Sync + 'static {
        let cfg = config::Config::builder()
            .add_source(source)
            .build()?;
        Ok(cfg.try_deserialize::<Configuration>()?)
    }

    // page size requested by a client, clamped to the configured bounds
    pub fn effective_page_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.page_size).clamp(1, self.max_page_size)
    }
}
