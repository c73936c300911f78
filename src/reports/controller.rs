use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use crate::core::command::Command;
use crate::core::controller::{AppState, NO_BORROWINGS_FOUND, ok, REPORT_GENERATED, ServerError, ServerResponse};
use crate::reports::command::borrowing_report_cmd::{BorrowingReportCommand, BorrowingReportCommandRequest};
use crate::reports::dto::BorrowingReportDto;
use crate::reports::factory;

pub fn routes(state: AppState) -> Router<(), lambda_http::Body> {
    Router::new()
        .route("/books/borrowing-report", get(borrowing_report))
        .with_state(state)
}

pub(crate) async fn borrowing_report(
    State(state): State<AppState>,
    Query(req): Query<BorrowingReportCommandRequest>) -> Result<ServerResponse<BorrowingReportDto>, ServerError> {
    let svc = factory::create_report_service(&state.config, state.store).await;
    let res = BorrowingReportCommand::new(svc).execute(req).await?;
    let message = if res.report.is_empty() { NO_BORROWINGS_FOUND } else { REPORT_GENERATED };
    Ok(ok(res.report, message))
}
