use axum::{
    extract::{Path, State},
    routing::post,
    Router,
};
use crate::borrowings::dto::BorrowingDto;
use crate::circulation::command::borrow_book_cmd::{BorrowBookCommand, BorrowBookCommandRequest};
use crate::circulation::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest};
use crate::circulation::domain::CirculationService;
use crate::circulation::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, BOOK_BORROWED, BOOK_RETURNED, ok, ServerError, ServerResponse};

pub fn routes(state: AppState) -> Router<(), lambda_http::Body> {
    Router::new()
        .route("/books/:isbn/borrow", post(borrow_book))
        .route("/books/:isbn/return", post(return_book))
        .with_state(state)
}

async fn build_service(state: AppState) -> Box<dyn CirculationService> {
    factory::create_circulation_service(&state.config, state.store).await
}

pub(crate) async fn borrow_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<ServerResponse<BorrowingDto>, ServerError> {
    let req = BorrowBookCommandRequest::new(isbn);
    let svc = build_service(state).await;
    let res = BorrowBookCommand::new(svc).execute(req).await?;
    Ok(ok(res.borrowing, BOOK_BORROWED))
}

pub(crate) async fn return_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<ServerResponse<BorrowingDto>, ServerError> {
    let req = ReturnBookCommandRequest::new(isbn);
    let svc = build_service(state).await;
    let res = ReturnBookCommand::new(svc).execute(req).await?;
    Ok(ok(res.borrowing, BOOK_RETURNED))
}

#[cfg(test)]
mod tests {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;
    use serde_json::json;
    use uuid::Uuid;
    use crate::catalog::controller::{add_book, remove_book};
    use crate::circulation::controller::{borrow_book, return_book};
    use crate::core::controller::AppState;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    fn state() -> AppState {
        AppState::new(Configuration::new("test"), RepositoryStore::Memory)
    }

    #[tokio::test]
    async fn test_should_borrow_return_and_delete() {
        let isbn = Uuid::new_v4().to_string();
        let _ = add_book(State(state()), Json(json!({"isbn": isbn, "title": "ABC", "author": "Author",
            "publication_year": 2020, "copies_in_stock": 1}))).await.expect("should add book");

        let (status, body) = borrow_book(State(state()), Path(isbn.to_string())).await.expect("should borrow book");
        assert_eq!(StatusCode::OK, status);
        assert!(body.0.data.expect("should have borrowing").borrowing_status.is_outstanding());

        let (status, body) = borrow_book(State(state()), Path(isbn.to_string())).await.expect_err("should not borrow");
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("INVALID_OPERATION", body.0.error.expect("should have error").code.as_str());

        let (status, _) = remove_book(State(state()), Path(isbn.to_string())).await.expect_err("should not delete");
        assert_eq!(StatusCode::BAD_REQUEST, status);

        let (status, body) = return_book(State(state()), Path(isbn.to_string())).await.expect("should return book");
        assert_eq!(StatusCode::OK, status);
        assert!(!body.0.data.expect("should have borrowing").borrowing_status.is_outstanding());

        let _ = remove_book(State(state()), Path(isbn.to_string())).await.expect("should delete book");
        let (status, _) = borrow_book(State(state()), Path(isbn.to_string())).await.expect_err("should not borrow");
        assert_eq!(StatusCode::NOT_FOUND, status);
    }
}
