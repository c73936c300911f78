use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, command_error, CommandError};
use crate::core::library::{LibraryError, LibraryResult};
use crate::reports::domain::ReportService;
use crate::reports::dto::BorrowingReportDto;
use crate::utils::date::parse_date;

pub(crate) struct BorrowingReportCommand {
    report_service: Box<dyn ReportService>,
}

impl BorrowingReportCommand {
    pub(crate) fn new(report_service: Box<dyn ReportService>) -> Self {
        Self {
            report_service,
        }
    }
}

// period bounds as sent by the client, e.g. 2023-04-12T00:00:00
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BorrowingReportCommandRequest {
    start: Option<String>,
    end: Option<String>,
}

impl BorrowingReportCommandRequest {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> LibraryResult<NaiveDateTime> {
    let value = value.ok_or_else(|| LibraryError::validation(
        format!("{} date is required", name).as_str(), Some("400".to_string())))?;
    parse_date(value.trim()).ok_or_else(|| LibraryError::validation(
        format!("{} date is invalid: {}", name, value).as_str(), Some("400".to_string())))
}

#[derive(Debug, Serialize)]
pub(crate) struct BorrowingReportCommandResponse {
    pub(crate) report: BorrowingReportDto,
}

impl BorrowingReportCommandResponse {
    pub fn new(report: BorrowingReportDto) -> Self {
        Self {
            report,
        }
    }
}

#[async_trait]
impl Command<BorrowingReportCommandRequest, BorrowingReportCommandResponse> for BorrowingReportCommand {
    async fn execute(&self, req: BorrowingReportCommandRequest) -> Result<BorrowingReportCommandResponse, CommandError> {
        let start = parse_bound("start", req.start.as_deref()).map_err(command_error("borrowing_report"))?;
        let end = parse_bound("end", req.end.as_deref()).map_err(command_error("borrowing_report"))?;
        let report = self.report_service.generate_report(start, end)
            .await.map_err(command_error("borrowing_report"))?;
        tracing::info!(events = report.borrowing_events.len(), books = report.borrowing_counts_by_book.len(),
            "borrowing report generated");
        Ok(BorrowingReportCommandResponse::new(report))
    }
}
