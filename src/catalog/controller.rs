use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use crate::books::dto::BookDto;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::restore_book_cmd::{RestoreBookCommand, RestoreBookCommandRequest};
use crate::catalog::command::search_books_cmd::{SearchBooksCommand, SearchBooksCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, BOOK_CREATED, BOOK_DELETED, BOOK_RESTORED, BOOK_RETRIEVED,
                              BOOK_UPDATED, BOOKS_PARTIALLY_UPLOADED, BOOKS_RETRIEVED, BOOKS_UPLOADED,
                              created, json_to_server_error, NO_BOOKS_FOUND, ok, ServerError, ServerResponse};
use crate::core::library::PaginatedResult;
use crate::imports::command::import_books_cmd::{ImportBooksCommand, ImportBooksCommandRequest};
use crate::imports::dto::ImportSummary;
use crate::imports::factory::create_import_service;

pub fn routes(state: AppState) -> Router<(), lambda_http::Body> {
    Router::new()
        .route("/books", post(add_book).get(list_books))
        .route("/books/search", get(search_books))
        .route("/books/bulk-upload", post(bulk_upload_books))
        .route("/books/:isbn",
               get(find_book_by_isbn).put(update_book).delete(remove_book))
        .route("/books/:isbn/restore", post(restore_book))
        .with_state(state)
}

async fn build_service(state: AppState) -> Box<dyn CatalogService> {
    factory::create_catalog_service(&state.config, state.store).await
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<ServerResponse<BookDto>, ServerError> {
    let req: AddBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = AddBookCommand::new(svc).execute(req).await?;
    Ok(created(res.book, BOOK_CREATED))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    json: Json<Value>) -> Result<ServerResponse<BookDto>, ServerError> {
    let mut req: UpdateBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.target_isbn = isbn;
    let svc = build_service(state).await;
    let res = UpdateBookCommand::new(svc).execute(req).await?;
    Ok(ok(res.book, BOOK_UPDATED))
}

pub(crate) async fn find_book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<ServerResponse<BookDto>, ServerError> {
    let req = GetBookCommandRequest::new(isbn);
    let svc = build_service(state).await;
    let res = GetBookCommand::new(svc).execute(req).await?;
    Ok(ok(res.book, BOOK_RETRIEVED))
}

pub(crate) async fn list_books(
    State(state): State<AppState>,
    Query(req): Query<ListBooksCommandRequest>) -> Result<ServerResponse<PaginatedResult<BookDto>>, ServerError> {
    let svc = build_service(state).await;
    let res = ListBooksCommand::new(svc).execute(req).await?;
    Ok(ok(res.books, BOOKS_RETRIEVED))
}

pub(crate) async fn search_books(
    State(state): State<AppState>,
    Query(req): Query<SearchBooksCommandRequest>) -> Result<ServerResponse<PaginatedResult<BookDto>>, ServerError> {
    let svc = build_service(state).await;
    let res = SearchBooksCommand::new(svc).execute(req).await?;
    let message = if res.books.records.is_empty() { NO_BOOKS_FOUND } else { BOOKS_RETRIEVED };
    Ok(ok(res.books, message))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<ServerResponse<BookDto>, ServerError> {
    let req = RemoveBookCommandRequest::new(isbn);
    let svc = build_service(state).await;
    let res = RemoveBookCommand::new(svc).execute(req).await?;
    Ok(ok(res.book, BOOK_DELETED))
}

pub(crate) async fn restore_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<ServerResponse<BookDto>, ServerError> {
    let req = RestoreBookCommandRequest::new(isbn);
    let svc = build_service(state).await;
    let res = RestoreBookCommand::new(svc).execute(req).await?;
    Ok(ok(res.book, BOOK_RESTORED))
}

pub(crate) async fn bulk_upload_books(
    State(state): State<AppState>,
    body: Bytes) -> Result<ServerResponse<ImportSummary>, ServerError> {
    tracing::debug!(bytes = body.len(), "received bulk upload");
    let req = ImportBooksCommandRequest::new(body.to_vec());
    let svc = create_import_service(&state.config, state.store).await;
    let res = ImportBooksCommand::new(svc).execute(req).await?;
    let message = if res.summary.is_complete() { BOOKS_UPLOADED } else { BOOKS_PARTIALLY_UPLOADED };
    Ok(ok(res.summary, message))
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::Json;
    use serde_json::json;
    use uuid::Uuid;
    use crate::catalog::command::list_books_cmd::ListBooksCommandRequest;
    use crate::catalog::command::search_books_cmd::SearchBooksCommandRequest;
    use crate::catalog::controller::{add_book, bulk_upload_books, find_book_by_isbn, list_books, remove_book,
                                     restore_book, search_books, update_book};
    use crate::core::controller::{AppState, BOOKS_PARTIALLY_UPLOADED, NO_BOOKS_FOUND};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    fn state() -> AppState {
        AppState::new(Configuration::new("test"), RepositoryStore::Memory)
    }

    fn book_json(isbn: &str, title: &str) -> serde_json::Value {
        json!({"isbn": isbn, "title": title, "author": "Author", "publication_year": 2020, "copies_in_stock": 2})
    }

    #[tokio::test]
    async fn test_should_manage_book_lifecycle() {
        let isbn = Uuid::new_v4().to_string();
        let (status, body) = add_book(State(state()), Json(book_json(isbn.as_str(), "Title")))
            .await.expect("should add book");
        assert_eq!(StatusCode::CREATED, status);
        assert!(body.0.success);

        let (status, body) = update_book(State(state()), Path(isbn.to_string()), Json(book_json(isbn.as_str(), "New Title")))
            .await.expect("should update book");
        assert_eq!(StatusCode::OK, status);
        assert_eq!("New Title", body.0.data.expect("should have book").title.as_str());

        let (_, body) = remove_book(State(state()), Path(isbn.to_string())).await.expect("should remove book");
        assert!(body.0.data.expect("should have book").book_status.is_deleted());

        let (_, body) = find_book_by_isbn(State(state()), Path(isbn.to_string())).await.expect("should get book");
        assert!(body.0.data.expect("should have book").book_status.is_deleted());

        let (status, body) = restore_book(State(state()), Path(isbn.to_string())).await.expect("should restore book");
        assert_eq!(StatusCode::OK, status);
        assert!(!body.0.data.expect("should have book").book_status.is_deleted());
    }

    #[tokio::test]
    async fn test_should_map_failures_to_status() {
        let (status, body) = find_book_by_isbn(State(state()), Path(Uuid::new_v4().to_string()))
            .await.expect_err("should not find book");
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!("NOT_FOUND", body.0.error.expect("should have error").code.as_str());

        let (status, body) = add_book(State(state()), Json(json!({"isbn": "1"})))
            .await.expect_err("should reject payload");
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("SERIALIZATION_ERROR", body.0.error.expect("should have error").code.as_str());

        let isbn = Uuid::new_v4().to_string();
        let _ = add_book(State(state()), Json(book_json(isbn.as_str(), "Title"))).await.expect("should add book");
        let (status, _) = add_book(State(state()), Json(book_json(isbn.as_str(), "Title")))
            .await.expect_err("should reject duplicate");
        assert_eq!(StatusCode::CONFLICT, status);

        let (status, body) = restore_book(State(state()), Path(isbn.to_string()))
            .await.expect_err("should not restore active book");
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("INVALID_OPERATION", body.0.error.expect("should have error").code.as_str());
    }

    #[tokio::test]
    async fn test_should_list_and_search_books() {
        let title = Uuid::new_v4().to_string();
        let _ = add_book(State(state()), Json(book_json(Uuid::new_v4().to_string().as_str(), title.as_str())))
            .await.expect("should add book");

        let (_, body) = list_books(State(state()), Query(ListBooksCommandRequest::default()))
            .await.expect("should list books");
        assert!(!body.0.data.expect("should have books").records.is_empty());

        let (_, body) = search_books(State(state()), Query(SearchBooksCommandRequest::new(title.as_str())))
            .await.expect("should search books");
        assert_eq!(1, body.0.data.expect("should have books").records.len());

        let (status, body) = search_books(State(state()), Query(SearchBooksCommandRequest::new(Uuid::new_v4().to_string().as_str())))
            .await.expect("should search books");
        assert_eq!(StatusCode::OK, status);
        assert_eq!(NO_BOOKS_FOUND, body.0.message.as_str());
    }

    #[tokio::test]
    async fn test_should_bulk_upload_books() {
        let content = format!("ISBN,title,author,publication_year,copies\n{},Test,Author,2023,5\n{},Test,Author,1,5\n",
                              Uuid::new_v4(), Uuid::new_v4());
        let (status, body) = bulk_upload_books(State(state()), Bytes::from(content))
            .await.expect("should upload books");
        assert_eq!(StatusCode::OK, status);
        assert_eq!(BOOKS_PARTIALLY_UPLOADED, body.0.message.as_str());
        let summary = body.0.data.expect("should have summary");
        assert_eq!(1, summary.imported);
        assert_eq!(1, summary.failures.len());

        let (status, _) = bulk_upload_books(State(state()), Bytes::from("isbn,title\n1,Test\n"))
            .await.expect_err("should reject upload");
        assert_eq!(StatusCode::BAD_REQUEST, status);
    }
}
