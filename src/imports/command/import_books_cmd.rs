use std::io::Cursor;
use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, command_error, CommandError};
use crate::imports::domain::ImportService;
use crate::imports::dto::ImportSummary;
use crate::imports::reader::CsvRowReader;

pub(crate) struct ImportBooksCommand {
    import_service: Box<dyn ImportService>,
}

impl ImportBooksCommand {
    pub(crate) fn new(import_service: Box<dyn ImportService>) -> Self {
        Self {
            import_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ImportBooksCommandRequest {
    content: Vec<u8>,
}

impl ImportBooksCommandRequest {
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportBooksCommandResponse {
    pub(crate) summary: ImportSummary,
}

impl ImportBooksCommandResponse {
    pub fn new(summary: ImportSummary) -> Self {
        Self {
            summary,
        }
    }
}

#[async_trait]
impl Command<ImportBooksCommandRequest, ImportBooksCommandResponse> for ImportBooksCommand {
    async fn execute(&self, req: ImportBooksCommandRequest) -> Result<ImportBooksCommandResponse, CommandError> {
        let rows = CsvRowReader::new(Cursor::new(req.content)).map_err(command_error("import_books"))?;
        let summary = self.import_service.import_books(Box::new(rows))
            .await.map_err(command_error("import_books"))?;
        if summary.is_complete() {
            tracing::info!(total = summary.total, imported = summary.imported, "books imported");
        } else {
            tracing::warn!(total = summary.total, imported = summary.imported,
                failed = summary.failures.len(), "books imported with failures");
        }
        Ok(ImportBooksCommandResponse::new(summary))
    }
}
