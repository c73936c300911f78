use crate::books::factory::create_book_repository;
use crate::borrowings::factory::create_borrowing_repository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::reports::domain::ReportService;
use crate::reports::domain::service::ReportServiceImpl;

pub(crate) async fn create_report_service(_config: &Configuration, store: RepositoryStore) -> Box<dyn ReportService> {
    let book_repo = create_book_repository(store).await;
    let borrowing_repo = create_borrowing_repository(store).await;
    Box::new(ReportServiceImpl::new(book_repo, borrowing_repo))
}
