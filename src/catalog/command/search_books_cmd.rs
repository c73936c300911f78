use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, command_error, CommandError};
use crate::core::library::PaginatedResult;

pub(crate) struct SearchBooksCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl SearchBooksCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchBooksCommandRequest {
    #[serde(default)]
    pub(crate) query: String,
    pub(crate) page: Option<String>,
    pub(crate) page_size: Option<usize>,
}

impl SearchBooksCommandRequest {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            page: None,
            page_size: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchBooksCommandResponse {
    pub(crate) books: PaginatedResult<BookDto>,
}

impl SearchBooksCommandResponse {
    pub fn new(books: PaginatedResult<BookDto>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<SearchBooksCommandRequest, SearchBooksCommandResponse> for SearchBooksCommand {
    async fn execute(&self, req: SearchBooksCommandRequest) -> Result<SearchBooksCommandResponse, CommandError> {
        self.catalog_service.search_books(req.query.as_str(), req.page.as_deref(), req.page_size)
            .await.map_err(command_error("search_books")).map(SearchBooksCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::search_books_cmd::{SearchBooksCommand, SearchBooksCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref ADD_CMD : AsyncOnce<AddBookCommand> = AsyncOnce::new(async {
                let svc = factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                AddBookCommand::new(svc)
            });
        static ref SEARCH_CMD : AsyncOnce<SearchBooksCommand> = AsyncOnce::new(async {
                let svc = factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                SearchBooksCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_search_books() {
        let add_cmd = ADD_CMD.get().await.clone();
        let search_cmd = SEARCH_CMD.get().await.clone();

        let author = Uuid::new_v4().to_string();
        let _ = add_cmd.execute(AddBookCommandRequest::new(Uuid::new_v4().to_string().as_str(), "test book", author.as_str(), 2001, 1))
            .await.expect("should add book");
        let res = search_cmd.execute(SearchBooksCommandRequest::new(author.to_uppercase().as_str()))
            .await.expect("should search books");
        assert_eq!(1, res.books.records.len());

        let res = search_cmd.execute(SearchBooksCommandRequest::default()).await;
        assert!(matches!(res, Err(CommandError::InvalidOperation { .. })));
    }
}
