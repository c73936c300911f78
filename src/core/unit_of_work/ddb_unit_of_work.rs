use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem, Update};
use chrono::Utc;
use crate::books::repository::ddb_book_repository::{BOOK_UPDATE_EXPR, book_update_values, NOT_BORROWED_CONDITION, VERSION_CONDITION};
use crate::borrowings::repository::ddb_borrowing_repository::{BORROWING_UPDATE_EXPR, borrowing_update_values};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::unit_of_work::{Mutation, UnitOfWork};
use crate::utils::ddb::parse_item;

// DDBUnitOfWork commits mutations with a single TransactWriteItems call
#[derive(Debug)]
pub struct DDBUnitOfWork {
    client: Client,
    books_table: String,
    borrowings_table: String,
}

impl DDBUnitOfWork {
    pub(crate) fn new(client: Client, books_table: &str, borrowings_table: &str) -> Self {
        Self {
            client,
            books_table: books_table.to_string(),
            borrowings_table: borrowings_table.to_string(),
        }
    }

    fn to_transact_item(&self, mutation: &Mutation) -> LibraryResult<TransactWriteItem> {
        let now = Utc::now().naive_utc();
        let item = match mutation {
            Mutation::UpdateBook(book) => {
                TransactWriteItem::builder().update(Update::builder()
                    .table_name(self.books_table.as_str())
                    .key("isbn", AttributeValue::S(book.isbn.to_string()))
                    .update_expression(BOOK_UPDATE_EXPR)
                    .set_expression_attribute_values(Some(book_update_values(book, now)))
                    .condition_expression(VERSION_CONDITION)
                    .build()).build()
            }
            Mutation::DeleteBook(book) => {
                let mut values = book_update_values(book, now);
                values.insert(":no_copies".to_string(), AttributeValue::N("0".to_string()));
                TransactWriteItem::builder().update(Update::builder()
                    .table_name(self.books_table.as_str())
                    .key("isbn", AttributeValue::S(book.isbn.to_string()))
                    .update_expression(BOOK_UPDATE_EXPR)
                    .set_expression_attribute_values(Some(values))
                    .condition_expression(NOT_BORROWED_CONDITION)
                    .build()).build()
            }
            Mutation::CreateBorrowing(borrowing) => {
                let val = serde_json::to_value(borrowing)?;
                TransactWriteItem::builder().put(Put::builder()
                    .table_name(self.borrowings_table.as_str())
                    .set_item(Some(parse_item(val)?))
                    .condition_expression("attribute_not_exists(borrowing_id)")
                    .build()).build()
            }
            Mutation::UpdateBorrowing(borrowing) => {
                TransactWriteItem::builder().update(Update::builder()
                    .table_name(self.borrowings_table.as_str())
                    .key("borrowing_id", AttributeValue::S(borrowing.borrowing_id.to_string()))
                    .update_expression(BORROWING_UPDATE_EXPR)
                    .set_expression_attribute_values(Some(borrowing_update_values(borrowing, now)))
                    .condition_expression(VERSION_CONDITION)
                    .build()).build()
            }
        };
        Ok(item)
    }
}

#[async_trait]
impl UnitOfWork for DDBUnitOfWork {
    async fn commit(&self, mutations: Vec<Mutation>) -> LibraryResult<usize> {
        if mutations.is_empty() {
            return Ok(0);
        }
        let size = mutations.len();
        let items = mutations.iter()
            .map(|m| self.to_transact_item(m))
            .collect::<LibraryResult<Vec<TransactWriteItem>>>()?;
        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await.map(|_| size).map_err(LibraryError::from)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use chrono::Utc;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::ddb_book_repository::DDBBookRepository;
    use crate::borrowings::domain::model::BorrowingEntity;
    use crate::borrowings::repository::ddb_borrowing_repository::DDBBorrowingRepository;
    use crate::core::library::{BookStatus, LibraryError};
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::core::unit_of_work::{Mutation, UnitOfWork};
    use crate::core::unit_of_work::ddb_unit_of_work::DDBUnitOfWork;
    use crate::utils::ddb::{build_db_client, create_table};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = create_table(&client, "books", "isbn", "book_status", "title").await;
                let _ = create_table(&client, "borrowings", "borrowing_id", "isbn", "borrowed_at").await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "requires local DynamoDB"]
    async fn test_should_commit_or_reject_all() {
        let client = CLIENT.get().await.clone();
        let books_repo = DDBBookRepository::new(client.clone(), "books", "books_ndx");
        let borrowing_repo = DDBBorrowingRepository::new(client.clone(), "borrowings", "borrowings_ndx");
        let uow = DDBUnitOfWork::new(client, "books", "borrowings");

        let mut book = BookEntity::new(Uuid::new_v4().to_string().as_str(), "title", "author", 2001, 2);
        books_repo.create(&book).await.expect("should create book");
        book.lend_copy();
        let borrowing = BorrowingEntity::new(book.isbn.as_str());
        let size = uow.commit(vec![Mutation::UpdateBook(book.clone()), Mutation::CreateBorrowing(borrowing.clone())])
            .await.expect("should commit");
        assert_eq!(2, size);

        // book still carries the version it was read with
        let other = BorrowingEntity::new(book.isbn.as_str());
        let res = uow.commit(vec![Mutation::UpdateBook(book.clone()), Mutation::CreateBorrowing(other.clone())]).await;
        assert!(matches!(res, Err(LibraryError::CurrentlyUnavailable { .. })));
        assert!(borrowing_repo.get(other.borrowing_id.as_str()).await.is_err());
        assert_eq!(1, books_repo.get(book.isbn.as_str()).await.expect("should get book").copies_in_stock);

        // current version but a copy is still on loan
        let mut stored = books_repo.get(book.isbn.as_str()).await.expect("should get book");
        assert_eq!(1, stored.borrowed_copies);
        stored.book_status = BookStatus::Deleted { deleted_at: Utc::now().naive_utc() };
        let res = uow.commit(vec![Mutation::DeleteBook(stored)]).await;
        assert!(matches!(res, Err(LibraryError::CurrentlyUnavailable { .. })));
    }
}
