use crate::books::factory::create_book_repository;
use crate::borrowings::factory::create_borrowing_repository;
use crate::circulation::domain::CirculationService;
use crate::circulation::domain::service::CirculationServiceImpl;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::core::unit_of_work::create_unit_of_work;

pub(crate) async fn create_circulation_service(_config: &Configuration, store: RepositoryStore) -> Box<dyn CirculationService> {
    let book_repo = create_book_repository(store).await;
    let borrowing_repo = create_borrowing_repository(store).await;
    let unit_of_work = create_unit_of_work(store).await;
    Box::new(CirculationServiceImpl::new(book_repo, borrowing_repo, unit_of_work))
}
