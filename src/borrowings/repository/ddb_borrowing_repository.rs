use std::cmp;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{NaiveDateTime, Utc};

use crate::borrowings::domain::model::{BorrowingEntity, sort_by_borrowed_at};
use crate::borrowings::repository::BorrowingRepository;
use crate::core::library::{BorrowingStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, from_ddb, opt_string_date, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

pub(crate) const BORROWING_UPDATE_EXPR: &str = "SET version = :version, borrowing_status = :borrowing_status, returned_at = :returned_at, updated_at = :updated_at";

const RANGE_FILTER: &str = "borrowed_at BETWEEN :start AND :end";

#[derive(Debug)]
pub struct DDBBorrowingRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBBorrowingRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }

    // scans every page of the table with the given filter
    async fn scan_all(&self, filter_expr: &str,
                      values: HashMap<String, AttributeValue>,
                      projection: Option<&str>) -> LibraryResult<Vec<HashMap<String, AttributeValue>>> {
        let table_name: &str = self.table_name.as_ref();
        let mut items = vec![];
        let mut exclusive_start_key = None;
        loop {
            let res = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(true)
                .filter_expression(filter_expr)
                .set_expression_attribute_values(Some(values.clone()))
                .set_projection_expression(projection.map(str::to_string))
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await?;
            if let Some(page) = res.items {
                items.extend(page);
            }
            exclusive_start_key = res.last_evaluated_key;
            if exclusive_start_key.is_none() {
                break;
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl Repository<BorrowingEntity> for DDBBorrowingRepository {
    async fn create(&self, entity: &BorrowingEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(borrowing_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &BorrowingEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("borrowing_id", AttributeValue::S(entity.borrowing_id.clone()))
            .update_expression(BORROWING_UPDATE_EXPR)
            .set_expression_attribute_values(Some(borrowing_update_values(entity, Utc::now().naive_utc())))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BorrowingEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "borrowing_id = :borrowing_id",
            )
            .expression_attribute_values(
                ":borrowing_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(LibraryError::database(format!("too many borrowings for {}", id).as_str(), None, false));
                } else if let Some(map) = items.first() {
                    return Ok(BorrowingEntity::from(map));
                }
            }
            Err(LibraryError::not_found(format!("borrowing not found for {}", id).as_str()))
        })
    }

    // the isbn is the hash key of the index, predicates without it are not supported
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BorrowingEntity>> {
        let isbn = predicate.get("isbn").ok_or_else(|| LibraryError::validation(
            "borrowings can only be queried by isbn", Some("400".to_string())))?;
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
            .key_condition_expression("isbn = :isbn")
            .expression_attribute_values(":isbn", AttributeValue::S(isbn.to_string()));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "isbn" {
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
                .map(BorrowingEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl BorrowingRepository for DDBBorrowingRepository {
    async fn find_outstanding_for_book(&self, isbn: &str) -> LibraryResult<Vec<BorrowingEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let mut records = vec![];
        let mut exclusive_start_key = None;
        loop {
            let res = self.client
                .query()
                .table_name(table_name)
                .index_name(index_name)
                .consistent_read(false)
                .scan_index_forward(true)
                .key_condition_expression("isbn = :isbn")
                .filter_expression("borrowing_status = :borrowing_status")
                .expression_attribute_values(":isbn", AttributeValue::S(isbn.to_string()))
                .expression_attribute_values(":borrowing_status",
                                             AttributeValue::S(BorrowingStatus::Borrowed.name().to_string()))
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await?;
            if let Some(items) = res.items {
                records.extend(items.iter().map(BorrowingEntity::from));
            }
            exclusive_start_key = res.last_evaluated_key;
            if exclusive_start_key.is_none() {
                break;
            }
        }
        sort_by_borrowed_at(&mut records);
        Ok(records)
    }

    async fn find_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> LibraryResult<Vec<BorrowingEntity>> {
        let items = self.scan_all(RANGE_FILTER, range_values(start, end), None).await?;
        let mut records: Vec<BorrowingEntity> = items.iter().map(BorrowingEntity::from).collect();
        sort_by_borrowed_at(&mut records);
        Ok(records)
    }

    async fn count_grouped_by_book_in_range(&self, start: NaiveDateTime,
                                            end: NaiveDateTime) -> LibraryResult<BTreeMap<String, i64>> {
        let items = self.scan_all(RANGE_FILTER, range_values(start, end), Some("isbn")).await?;
        let mut counts = BTreeMap::new();
        for isbn in items.iter().filter_map(|item| parse_string_attribute("isbn", item)) {
            *counts.entry(isbn).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

fn range_values(start: NaiveDateTime, end: NaiveDateTime) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (":start".to_string(), string_date(start)),
        (":end".to_string(), string_date(end)),
    ])
}

pub(crate) fn borrowing_update_values(entity: &BorrowingEntity, now: NaiveDateTime) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (":old_version".to_string(), AttributeValue::N(entity.version.to_string())),
        (":version".to_string(), AttributeValue::N((entity.version + 1).to_string())),
        (":borrowing_status".to_string(), AttributeValue::S(entity.borrowing_status.name().to_string())),
        (":returned_at".to_string(), opt_string_date(entity.borrowing_status.returned_at())),
        (":updated_at".to_string(), string_date(now)),
    ])
}

impl From<&HashMap<String, AttributeValue>> for BorrowingEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        let borrowing_status = match (parse_string_attribute("borrowing_status", map).as_deref(),
                                      parse_date_attribute("returned_at", map)) {
            (Some("Returned"), Some(returned_at)) => BorrowingStatus::Returned { returned_at },
            _ => BorrowingStatus::Borrowed,
        };
        BorrowingEntity {
            borrowing_id: parse_string_attribute("borrowing_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            isbn: parse_string_attribute("isbn", map).unwrap_or_else(|| String::from("")),
            borrowed_at: parse_date_attribute("borrowed_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            borrowing_status,
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
