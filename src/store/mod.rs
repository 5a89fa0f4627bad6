//! Entity store: typed records addressable by integer id.
//!
//! Two backends share the [`EntityStore`] trait: [`MemoryStore`] keeps tables in process memory,
//! [`PgStore`] maps each entity to a PostgreSQL table. Neither backend knows about cascades,
//! defaults or validation; the service layer handles those before calling in.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::config::{EntityDescriptor, Record};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Exact-match filters plus paging for [`EntityStore::list`].
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub filters: Vec<(String, Value)>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by(field: &str, value: Value) -> Self {
        ListQuery {
            filters: vec![(field.to_string(), value)],
            ..Self::default()
        }
    }

    /// True when every filter matches the record exactly.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| record.get(field).unwrap_or(&Value::Null) == value)
    }
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Store a new record and return it with its assigned `id`. Any `id` in `record` is ignored.
    async fn insert(&self, entity: &EntityDescriptor, record: Record) -> Result<Record, AppError>;

    async fn get(&self, entity: &EntityDescriptor, id: i64) -> Result<Option<Record>, AppError>;

    /// Records in insertion (id) order.
    async fn list(&self, entity: &EntityDescriptor, query: &ListQuery) -> Result<Vec<Record>, AppError>;

    /// Replace every field of an existing record. `None` if the id is absent.
    async fn update(
        &self,
        entity: &EntityDescriptor,
        id: i64,
        record: Record,
    ) -> Result<Option<Record>, AppError>;

    /// Remove a record, returning it. `None` if the id is absent.
    async fn delete(&self, entity: &EntityDescriptor, id: i64) -> Result<Option<Record>, AppError>;

    /// Backend reachability, for readiness checks.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_by(
        &self,
        entity: &EntityDescriptor,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Record>, AppError> {
        self.list(entity, &ListQuery::by(field, value.clone())).await
    }
}

/// Integer id of a record; `0` never occurs for stored records.
pub fn record_id(record: &Record) -> i64 {
    record.get(crate::config::ID_FIELD).and_then(Value::as_i64).unwrap_or(0)
}
