//! Gateway: per-entity list/get/create/update/delete/filter with relationship rules.
//!
//! Writes are serialized through one async mutex, so a uniqueness check and the insert that
//! follows it cannot interleave with another writer on either store backend.

use super::RecordValidator;
use crate::config::{Catalog, EntityDescriptor, FieldKind, OnDelete, Record, ID_FIELD};
use crate::error::{AppError, FieldErrors};
use crate::store::{record_id, EntityStore, ListQuery};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub struct Gateway {
    store: Arc<dyn EntityStore>,
    catalog: Arc<Catalog>,
    writes: Mutex<()>,
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn not_found(entity: &EntityDescriptor, id: i64) -> AppError {
    AppError::NotFound(format!("{} {}", entity.name, id))
}

impl Gateway {
    pub fn new(store: Arc<dyn EntityStore>, catalog: Arc<Catalog>) -> Self {
        Gateway {
            store,
            catalog,
            writes: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn entity(&self, name: &str) -> Result<&EntityDescriptor, AppError> {
        self.catalog
            .entity(name)
            .ok_or_else(|| AppError::NotFound(format!("entity {}", name)))
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }

    /// List with exact-match filters. Without a `limit` every matching record is returned.
    pub async fn list(&self, entity: &str, query: &ListQuery) -> Result<Vec<Record>, AppError> {
        let entity = self.entity(entity)?;
        self.store.list(entity, query).await
    }

    pub async fn all(&self, entity: &str) -> Result<Vec<Record>, AppError> {
        let entity = self.entity(entity)?;
        self.store.list(entity, &ListQuery::all()).await
    }

    pub async fn get(&self, entity: &str, id: i64) -> Result<Record, AppError> {
        let entity = self.entity(entity)?;
        self.store.get(entity, id).await?.ok_or_else(|| not_found(entity, id))
    }

    pub async fn find_one(&self, entity: &str, field: &str, value: &Value) -> Result<Option<Record>, AppError> {
        let entity = self.entity(entity)?;
        Ok(self.store.find_by(entity, field, value).await?.into_iter().next())
    }

    /// Full scan: every record for which `predicate` holds, in insertion order.
    pub async fn filter<F>(&self, entity: &str, predicate: F) -> Result<Vec<Record>, AppError>
    where
        F: Fn(&Record) -> bool + Send,
    {
        let entity = self.entity(entity)?;
        let rows = self.store.list(entity, &ListQuery::all()).await?;
        Ok(rows.into_iter().filter(|r| predicate(r)).collect())
    }

    /// Insert a record built from decoded fields. Missing fields take their defaults and creation
    /// timestamps are set here. All rule violations come back together.
    pub async fn create(&self, entity: &str, fields: Record) -> Result<Record, AppError> {
        let entity = self.entity(entity)?;
        let mut record = Record::new();
        for spec in &entity.fields {
            let value = if spec.auto_now_add {
                now()
            } else {
                fields
                    .get(spec.name)
                    .cloned()
                    .or_else(|| spec.default.clone())
                    .unwrap_or(Value::Null)
            };
            record.insert(spec.name.to_string(), value);
        }

        let _guard = self.writes.lock().await;
        self.check(entity, &record, None).await?;
        let created = self.store.insert(entity, record).await?;
        tracing::info!(entity = entity.name, id = record_id(&created), "created");
        Ok(created)
    }

    /// Overlay `fields` on the stored record and write it back. Read-only fields are kept.
    pub async fn update(&self, entity: &str, id: i64, fields: Record) -> Result<Record, AppError> {
        let entity = self.entity(entity)?;
        let _guard = self.writes.lock().await;
        let mut record = self.store.get(entity, id).await?.ok_or_else(|| not_found(entity, id))?;
        for (k, v) in fields {
            let writable = entity.field(&k).map(|f| !f.auto_now_add).unwrap_or(false);
            if writable {
                record.insert(k, v);
            }
        }
        record.remove(ID_FIELD);
        self.check(entity, &record, Some(id)).await?;
        let updated = self
            .store
            .update(entity, id, record)
            .await?
            .ok_or_else(|| not_found(entity, id))?;
        tracing::info!(entity = entity.name, id, "updated");
        Ok(updated)
    }

    /// Add `delta` to an integer field under the write lock.
    pub async fn increment(&self, entity: &str, id: i64, field: &str, delta: i64) -> Result<Record, AppError> {
        let entity = self.entity(entity)?;
        let spec = entity
            .field(field)
            .filter(|f| matches!(f.kind, FieldKind::Integer | FieldKind::PositiveInteger))
            .ok_or_else(|| AppError::BadRequest(format!("{} is not a counter", field)))?;
        let _guard = self.writes.lock().await;
        let mut record = self.store.get(entity, id).await?.ok_or_else(|| not_found(entity, id))?;
        let current = record.get(spec.name).and_then(Value::as_i64).unwrap_or(0);
        let next = current
            .checked_add(delta)
            .ok_or_else(|| AppError::field(spec.name, "Counter overflow."))?;
        record.insert(spec.name.to_string(), Value::from(next));
        record.remove(ID_FIELD);
        RecordValidator::validate(entity, &record).into_result()?;
        let updated = self
            .store
            .update(entity, id, record)
            .await?
            .ok_or_else(|| not_found(entity, id))?;
        tracing::debug!(entity = entity.name, id, field, value = next, "incremented");
        Ok(updated)
    }

    /// Delete as the entity declares: soft-deleting entities get `is_deleted = true` and keep their
    /// dependents; everything else is purged.
    pub async fn delete(&self, entity: &str, id: i64) -> Result<Record, AppError> {
        let descriptor = self.entity(entity)?;
        if !descriptor.soft_delete {
            return self.purge(entity, id).await;
        }
        let _guard = self.writes.lock().await;
        let mut record = self
            .store
            .get(descriptor, id)
            .await?
            .ok_or_else(|| not_found(descriptor, id))?;
        record.insert("is_deleted".into(), Value::Bool(true));
        record.remove(ID_FIELD);
        let updated = self
            .store
            .update(descriptor, id, record)
            .await?
            .ok_or_else(|| not_found(descriptor, id))?;
        tracing::info!(entity = descriptor.name, id, "soft-deleted");
        Ok(updated)
    }

    /// Remove the record. Cascading dependents are removed first, nullable references are
    /// cleared and many-to-many lists drop the id.
    pub async fn purge(&self, entity: &str, id: i64) -> Result<Record, AppError> {
        let entity = self.entity(entity)?;
        let _guard = self.writes.lock().await;
        let removed = self
            .remove_cascading(entity, id)
            .await?
            .ok_or_else(|| not_found(entity, id))?;
        tracing::info!(entity = entity.name, id, "deleted");
        Ok(removed)
    }

    fn remove_cascading<'a>(
        &'a self,
        entity: &'a EntityDescriptor,
        id: i64,
    ) -> BoxFuture<'a, Result<Option<Record>, AppError>> {
        Box::pin(async move {
            if self.store.get(entity, id).await?.is_none() {
                return Ok(None);
            }
            let id_value = Value::from(id);
            for dep in self.catalog.dependents_of(entity.name) {
                match dep.on_delete {
                    Some(OnDelete::Cascade) => {
                        for child in self.store.find_by(dep.entity, dep.field.name, &id_value).await? {
                            let child_id = record_id(&child);
                            self.remove_cascading(dep.entity, child_id).await?;
                            tracing::debug!(entity = dep.entity.name, id = child_id, "cascade delete");
                        }
                    }
                    Some(OnDelete::SetNull) => {
                        for mut child in self.store.find_by(dep.entity, dep.field.name, &id_value).await? {
                            let child_id = record_id(&child);
                            child.insert(dep.field.name.to_string(), Value::Null);
                            child.remove(ID_FIELD);
                            self.store.update(dep.entity, child_id, child).await?;
                            tracing::debug!(entity = dep.entity.name, id = child_id, field = dep.field.name, "set null");
                        }
                    }
                    None => {
                        for mut child in self.store.list(dep.entity, &ListQuery::all()).await? {
                            let Some(Value::Array(ids)) = child.get_mut(dep.field.name) else {
                                continue;
                            };
                            let before = ids.len();
                            ids.retain(|v| v.as_i64() != Some(id));
                            if ids.len() != before {
                                let child_id = record_id(&child);
                                child.remove(ID_FIELD);
                                self.store.update(dep.entity, child_id, child).await?;
                            }
                        }
                    }
                }
            }
            self.store.delete(entity, id).await
        })
    }

    /// Field rules, relationship targets and uniqueness. `exclude` is the id being updated.
    async fn check(&self, entity: &EntityDescriptor, record: &Record, exclude: Option<i64>) -> Result<(), AppError> {
        let mut errors: FieldErrors = RecordValidator::validate(entity, record);
        for spec in &entity.fields {
            if errors.contains(spec.name) {
                continue;
            }
            let Some(value) = record.get(spec.name).filter(|v| !v.is_null()) else {
                continue;
            };
            match &spec.kind {
                FieldKind::ForeignKey { target, .. } => {
                    let target = self.entity(target)?;
                    if let Some(pk) = value.as_i64() {
                        if self.store.get(target, pk).await?.is_none() {
                            errors.add(spec.name, format!("Invalid pk \"{}\" - object does not exist.", pk));
                        }
                    }
                }
                FieldKind::ManyToMany { target } => {
                    let target = self.entity(target)?;
                    for pk in value.as_array().into_iter().flatten().filter_map(Value::as_i64) {
                        if self.store.get(target, pk).await?.is_none() {
                            errors.add(spec.name, format!("Invalid pk \"{}\" - object does not exist.", pk));
                        }
                    }
                }
                _ => {}
            }
            if spec.unique {
                let clash = self
                    .store
                    .find_by(entity, spec.name, value)
                    .await?
                    .iter()
                    .any(|r| Some(record_id(r)) != exclude);
                if clash {
                    errors.add(
                        spec.name,
                        format!("{} with this {} already exists.", entity.name, spec.name.replace('_', " ")),
                    );
                }
            }
        }
        errors.into_result()
    }
}
