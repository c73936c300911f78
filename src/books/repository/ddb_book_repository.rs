use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{NaiveDateTime, Utc};

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{BookStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, from_ddb, opt_string_date, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

pub(crate) const BOOK_UPDATE_EXPR: &str = "SET version = :version, title = :title, author = :author, publication_year = :publication_year, copies_in_stock = :copies_in_stock, borrowed_copies = :borrowed_copies, book_status = :book_status, deleted_at = :deleted_at, search_key = :search_key, updated_at = :updated_at";

pub(crate) const VERSION_CONDITION: &str = "attribute_exists(version) AND version = :old_version";

// a book can only be deleted while none of its copies are out on loan
pub(crate) const NOT_BORROWED_CONDITION: &str = "attribute_exists(version) AND version = :old_version AND (attribute_not_exists(borrowed_copies) OR borrowed_copies = :no_copies)";

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let item = book_to_item(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(isbn)")
            .set_item(Some(item))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(entity.isbn.clone()))
            .update_expression(BOOK_UPDATE_EXPR)
            .set_expression_attribute_values(Some(book_update_values(entity, Utc::now().naive_utc())))
            .condition_expression(VERSION_CONDITION)
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "isbn = :isbn",
            )
            .expression_attribute_values(
                ":isbn",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(LibraryError::database(format!("too many books for {}", id).as_str(), None, false));
                } else if let Some(map) = items.first() {
                    return Ok(map_to_book(map));
                }
            }
            Err(LibraryError::not_found(format!("book not found for isbn {}", id).as_str()))
        })
    }

    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let exclusive_start_key = to_ddb_page(page);
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .expression_attribute_values(":book_status", AttributeValue::S(
                predicate.get("book_status").map(String::as_str).unwrap_or(BookStatus::Active.name()).to_string()
            ));
        // handle GSI keys first
        let mut key_cond = String::new();
        key_cond.push_str("book_status = :book_status");

        if let Some(title) = predicate.get("title") {
            key_cond.push_str(" AND title = :title");
            request = request.expression_attribute_values(":title", AttributeValue::S(title.to_string()));
        }
        request = request.key_condition_expression(key_cond);
        let mut filter_expr = String::new();
        // then handle other filters
        for (k, v) in predicate {
            if k != "book_status" && k != "title" {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }

        request
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(map_to_book).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn find_active_by_isbn(&self, isbn: &str) -> LibraryResult<BookEntity> {
        let book = self.get(isbn).await?;
        if book.book_status.is_deleted() {
            return Err(LibraryError::not_found(format!("book not found for isbn {}", isbn).as_str()));
        }
        Ok(book)
    }

    async fn find_active(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let predicate = HashMap::from([
            ("book_status".to_string(), BookStatus::Active.name().to_string()),
        ]);
        self.query(&predicate, page, page_size).await
    }

    // search_key holds the lowercase title and author so the filter can ignore case. The filter
    // runs after `limit` rows were read, so a page is filled across as many queries as needed
    // and the next page starts after the last book returned.
    async fn search(&self, query: &str,
                    page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let mut start_key = to_ddb_page(page);
        let mut items: Vec<HashMap<String, AttributeValue>> = vec![];
        let next_key = loop {
            let out = self.client
                .query()
                .table_name(table_name)
                .index_name(index_name)
                .limit(cmp::min(page_size, 500) as i32)
                .consistent_read(false)
                .set_exclusive_start_key(start_key.take())
                .key_condition_expression("book_status = :book_status")
                .filter_expression("contains(search_key, :query)")
                .expression_attribute_values(":book_status", AttributeValue::S(BookStatus::Active.name().to_string()))
                .expression_attribute_values(":query", AttributeValue::S(query.to_lowercase()))
                .send()
                .await.map_err(LibraryError::from)?;
            let last_key = out.last_evaluated_key().cloned();
            let found = out.items.unwrap_or_default();
            let room = page_size.saturating_sub(items.len());
            if found.len() > room {
                items.extend(found.into_iter().take(room));
                break items.last().map(search_index_key);
            }
            items.extend(found);
            match last_key {
                Some(key) if items.len() < page_size => start_key = Some(key),
                other => break other,
            }
        };
        let records = items.iter().map(map_to_book).collect();
        Ok(from_ddb(page, page_size, next_key.as_ref(), records))
    }
}

// position of an item in books_ndx: the index keys plus the table key
fn search_index_key(item: &HashMap<String, AttributeValue>) -> HashMap<String, AttributeValue> {
    item.iter()
        .filter(|(k, _)| matches!(k.as_str(), "isbn" | "book_status" | "title"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

pub(crate) fn book_to_item(entity: &BookEntity) -> LibraryResult<HashMap<String, AttributeValue>> {
    let val = serde_json::to_value(entity)?;
    let mut item = parse_item(val)?;
    item.insert("search_key".to_string(), AttributeValue::S(entity.search_key()));
    Ok(item)
}

// values of BOOK_UPDATE_EXPR and VERSION_CONDITION, the stored version is bumped on every write
pub(crate) fn book_update_values(entity: &BookEntity, now: NaiveDateTime) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (":old_version".to_string(), AttributeValue::N(entity.version.to_string())),
        (":version".to_string(), AttributeValue::N((entity.version + 1).to_string())),
        (":title".to_string(), AttributeValue::S(entity.title.to_string())),
        (":author".to_string(), AttributeValue::S(entity.author.to_string())),
        (":publication_year".to_string(), AttributeValue::N(entity.publication_year.to_string())),
        (":copies_in_stock".to_string(), AttributeValue::N(entity.copies_in_stock.to_string())),
        (":borrowed_copies".to_string(), AttributeValue::N(entity.borrowed_copies.to_string())),
        (":book_status".to_string(), AttributeValue::S(entity.book_status.name().to_string())),
        (":deleted_at".to_string(), opt_string_date(entity.book_status.deleted_at())),
        (":search_key".to_string(), AttributeValue::S(entity.search_key())),
        (":updated_at".to_string(), string_date(now)),
    ])
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    let updated_at = parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc());
    let book_status = match parse_string_attribute("book_status", map).as_deref() {
        Some("Deleted") => BookStatus::Deleted {
            deleted_at: parse_date_attribute("deleted_at", map).unwrap_or(updated_at),
        },
        _ => BookStatus::Active,
    };
    BookEntity {
        isbn: parse_string_attribute("isbn", map).unwrap_or(String::from("")),
        version: parse_number_attribute("version", map),
        title: parse_string_attribute("title", map).unwrap_or(String::from("")),
        author: parse_string_attribute("author", map).unwrap_or(String::from("")),
        publication_year: parse_number_attribute("publication_year", map) as i32,
        copies_in_stock: parse_number_attribute("copies_in_stock", map) as i32,
        borrowed_copies: parse_number_attribute("borrowed_copies", map) as i32,
        book_status,
        created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
        updated_at,
    }
}
