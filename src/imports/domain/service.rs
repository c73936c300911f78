use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::library::LibraryResult;
use crate::imports::domain::{BookRows, ImportService};
use crate::imports::dto::{ImportFailure, ImportSummary};
use crate::imports::reader::BookRow;

pub(crate) struct ImportServiceImpl {
    catalog_service: Box<dyn CatalogService>,
}

impl ImportServiceImpl {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }

    async fn import_row(&self, row: &BookRow) -> LibraryResult<BookDto> {
        let book = row.to_book()?;
        self.catalog_service.add_book(&book).await
    }
}

#[async_trait]
impl ImportService for ImportServiceImpl {
    async fn import_books(&self, rows: BookRows) -> LibraryResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        for (ndx, row) in rows.enumerate() {
            summary.total += 1;
            let (isbn, res) = match row {
                Ok(row) => (Some(row.isbn.to_string()), self.import_row(&row).await.map(|_| ())),
                Err(err) => (None, Err(err)),
            };
            match res {
                Ok(_) => summary.imported += 1,
                Err(err) => {
                    let isbn = isbn.filter(|isbn| !isbn.is_empty());
                    summary.failures.push(ImportFailure::new(ndx + 1, isbn, err.message()));
                }
            }
        }
        Ok(summary)
    }
}
