pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::imports::dto::ImportSummary;
use crate::imports::reader::BookRow;

pub(crate) type BookRows = Box<dyn Iterator<Item=LibraryResult<BookRow>> + Send>;

// ImportService adds books in bulk. Every row is attempted on its own and failures are
// collected instead of aborting the upload.
#[async_trait]
pub(crate) trait ImportService: Sync + Send {
    async fn import_books(&self, rows: BookRows) -> LibraryResult<ImportSummary>;
}
