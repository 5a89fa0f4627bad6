//! In-process store: one id-ordered map per entity behind an async RwLock.

use super::{EntityStore, ListQuery};
use crate::config::{EntityDescriptor, Record, ID_FIELD};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Record>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Copy of `record` with `id` as the first key.
fn with_id(id: i64, mut record: Record) -> Record {
    record.remove(ID_FIELD);
    let mut out = Record::with_capacity(record.len() + 1);
    out.insert(ID_FIELD.to_string(), Value::from(id));
    out.extend(record);
    out
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn insert(&self, entity: &EntityDescriptor, record: Record) -> Result<Record, AppError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(entity.table).or_default();
        table.next_id += 1;
        let id = table.next_id;
        let row = with_id(id, record);
        table.rows.insert(id, row.clone());
        tracing::debug!(table = entity.table, id, "insert");
        Ok(row)
    }

    async fn get(&self, entity: &EntityDescriptor, id: i64) -> Result<Option<Record>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.get(entity.table).and_then(|t| t.rows.get(&id)).cloned())
    }

    async fn list(&self, entity: &EntityDescriptor, query: &ListQuery) -> Result<Vec<Record>, AppError> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(entity.table) else {
            return Ok(Vec::new());
        };
        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map(|n| n as usize).unwrap_or(usize::MAX);
        Ok(table
            .rows
            .values()
            .filter(|r| query.matches(r))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        entity: &EntityDescriptor,
        id: i64,
        record: Record,
    ) -> Result<Option<Record>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.get_mut(entity.table).and_then(|t| t.rows.get_mut(&id)) else {
            return Ok(None);
        };
        *slot = with_id(id, record);
        tracing::debug!(table = entity.table, id, "update");
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, entity: &EntityDescriptor, id: i64) -> Result<Option<Record>, AppError> {
        let mut tables = self.tables.write().await;
        let removed = tables.get_mut(entity.table).and_then(|t| t.rows.remove(&id));
        if removed.is_some() {
            tracing::debug!(table = entity.table, id, "delete");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldKind, FieldSpec};
    use serde_json::json;

    fn entity() -> EntityDescriptor {
        EntityDescriptor::new("reply", "reply", vec![FieldSpec::new("message", FieldKind::Text)])
    }

    fn record(message: &str) -> Record {
        let mut r = Record::new();
        r.insert("message".into(), json!(message));
        r
    }

    #[tokio::test]
    async fn ids_are_monotonic_and_never_reused() {
        let store = MemoryStore::new();
        let e = entity();
        let a = store.insert(&e, record("a")).await.unwrap();
        let b = store.insert(&e, record("b")).await.unwrap();
        assert_eq!(a["id"], json!(1));
        assert_eq!(b["id"], json!(2));
        store.delete(&e, 2).await.unwrap();
        let c = store.insert(&e, record("c")).await.unwrap();
        assert_eq!(c["id"], json!(3));
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_and_pages() {
        let store = MemoryStore::new();
        let e = entity();
        for m in ["a", "b", "c", "b"] {
            store.insert(&e, record(m)).await.unwrap();
        }
        let rows = store.find_by(&e, "message", &json!("b")).await.unwrap();
        assert_eq!(rows.iter().map(|r| r["id"].clone()).collect::<Vec<_>>(), vec![json!(2), json!(4)]);

        let page = ListQuery { limit: Some(2), offset: Some(1), ..ListQuery::all() };
        let rows = store.list(&e, &page).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["message"], json!("b"));
    }

    #[tokio::test]
    async fn update_and_delete_missing_ids() {
        let store = MemoryStore::new();
        let e = entity();
        assert!(store.update(&e, 9, record("x")).await.unwrap().is_none());
        assert!(store.delete(&e, 9).await.unwrap().is_none());
        assert!(store.get(&e, 9).await.unwrap().is_none());
    }
}
