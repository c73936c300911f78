use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use chrono::{NaiveDateTime, Utc};
use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::Value;
use crate::books::domain::model::BookEntity;
use crate::borrowings::domain::model::BorrowingEntity;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};

lazy_static! {
    // process wide store so that services built by different factories see the same rows,
    // the same way they would share a DynamoDB table.
    static ref SHARED_STORE: Arc<MemoryStore> = Arc::new(MemoryStore::new());
}

pub(crate) fn shared_memory_store() -> Arc<MemoryStore> {
    SHARED_STORE.clone()
}

// MemoryRecord is implemented by entities kept in the memory store
pub(crate) trait MemoryRecord: Identifiable + Clone + Serialize {
    const KIND: &'static str;

    // marks a successful write: next version and last update time
    fn touch(&mut self, now: NaiveDateTime);
}

impl MemoryRecord for BookEntity {
    const KIND: &'static str = "book";

    fn touch(&mut self, now: NaiveDateTime) {
        self.version += 1;
        self.updated_at = now;
    }
}

impl MemoryRecord for BorrowingEntity {
    const KIND: &'static str = "borrowing";

    fn touch(&mut self, now: NaiveDateTime) {
        self.version += 1;
        self.updated_at = now;
    }
}

#[derive(Debug, Default)]
pub(crate) struct MemoryTables {
    pub(crate) books: BTreeMap<String, BookEntity>,
    pub(crate) borrowings: BTreeMap<String, BorrowingEntity>,
}

// MemoryStore keeps all tables behind a single lock so a unit of work can validate and
// apply several writes without another request observing a partial state.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    tables: Mutex<MemoryTables>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_tables<T>(&self, f: impl FnOnce(&mut MemoryTables) -> LibraryResult<T>) -> LibraryResult<T> {
        let mut tables = self.tables.lock()
            .map_err(|err| LibraryError::runtime(format!("memory store poisoned {}", err).as_str(), None))?;
        f(&mut tables)
    }
}

pub(crate) fn check_insert<T: MemoryRecord>(table: &BTreeMap<String, T>, entity: &T) -> LibraryResult<()> {
    if table.contains_key(&entity.id()) {
        return Err(LibraryError::duplicate_key(
            format!("{} {} already exists", T::KIND, entity.id()).as_str()));
    }
    Ok(())
}

pub(crate) fn check_update<T: MemoryRecord>(table: &BTreeMap<String, T>, entity: &T) -> LibraryResult<()> {
    match table.get(&entity.id()) {
        None => {
            Err(LibraryError::not_found(format!("{} not found for {}", T::KIND, entity.id()).as_str()))
        }
        Some(existing) if existing.version() != entity.version() => {
            Err(LibraryError::unavailable(
                format!("{} {} was modified concurrently, expected version {} but found {}",
                        T::KIND, entity.id(), entity.version(), existing.version()).as_str(),
                Some("ConditionalCheckFailed".to_string()), true))
        }
        Some(_) => Ok(()),
    }
}

pub(crate) fn check_not_borrowed(table: &BTreeMap<String, BookEntity>, book: &BookEntity) -> LibraryResult<()> {
    check_update(table, book)?;
    match table.get(&book.isbn) {
        Some(existing) if existing.borrowed_copies > 0 => {
            Err(LibraryError::unavailable(
                format!("book {} has {} copies on loan", book.isbn, existing.borrowed_copies).as_str(),
                Some("ConditionalCheckFailed".to_string()), true))
        }
        _ => Ok(()),
    }
}

pub(crate) fn apply_insert<T: MemoryRecord>(table: &mut BTreeMap<String, T>, entity: &T) {
    table.insert(entity.id(), entity.clone());
}

pub(crate) fn apply_update<T: MemoryRecord>(table: &mut BTreeMap<String, T>, entity: &T) {
    let mut updated = entity.clone();
    updated.touch(Utc::now().naive_utc());
    table.insert(updated.id(), updated);
}

// every predicate entry must equal the serialized attribute of the same name
pub(crate) fn matches_predicate<T: Serialize>(entity: &T, predicate: &HashMap<String, String>) -> bool {
    let value = match serde_json::to_value(entity) {
        Ok(value) => value,
        Err(_) => return false,
    };
    predicate.iter().all(|(k, v)| {
        match value.get(k) {
            Some(Value::String(s)) => s == v,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == *v,
        }
    })
}

// the page token of the memory store is the offset of the first record
pub(crate) fn paginate<T>(records: Vec<T>, page: Option<&str>, page_size: usize) -> PaginatedResult<T> {
    let offset = page.and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
    let total = records.len();
    let records: Vec<T> = records.into_iter().skip(offset).take(page_size).collect();
    let next_offset = offset + records.len();
    let next_page = if next_offset < total { Some(next_offset.to_string()) } else { None };
    PaginatedResult::new(page, page_size, next_page, records)
}
