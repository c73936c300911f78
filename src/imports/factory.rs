use crate::catalog::factory::create_catalog_service;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::imports::domain::ImportService;
use crate::imports::domain::service::ImportServiceImpl;

pub(crate) async fn create_import_service(config: &Configuration, store: RepositoryStore) -> Box<dyn ImportService> {
    let catalog_service = create_catalog_service(config, store).await;
    Box::new(ImportServiceImpl::new(catalog_service))
}
