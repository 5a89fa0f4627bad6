//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity descriptor.

use crate::config::{EntityDescriptor, FieldKind, Record, ID_FIELD};
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from descriptors).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// PostgreSQL column type for a field kind.
pub fn pg_type(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Integer | FieldKind::PositiveInteger | FieldKind::ForeignKey { .. } => "bigint",
        FieldKind::Text | FieldKind::Choice(_) | FieldKind::File { .. } | FieldKind::Password => "text",
        FieldKind::Bool => "boolean",
        FieldKind::DateTime => "timestamptz",
        FieldKind::Date => "date",
        FieldKind::ManyToMany { .. } => "jsonb",
    }
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a parameter and return its cast placeholder (`$n::type`).
    fn push_param(&mut self, v: Value, pg_type: &str) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), pg_type)
    }
}

/// SELECT list: id then every declared field, in declaration order.
fn select_column_list(entity: &EntityDescriptor) -> String {
    std::iter::once(quoted(ID_FIELD))
        .chain(entity.fields.iter().map(|f| quoted(f.name)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_pg_type(entity: &EntityDescriptor, name: &str) -> &'static str {
    entity.field(name).map(|f| pg_type(&f.kind)).unwrap_or("bigint")
}

/// SELECT by primary key.
pub fn select_by_id(entity: &EntityDescriptor, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(Value::from(id), "bigint");
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(entity),
        quoted(entity.table),
        quoted(ID_FIELD),
        ph
    );
    q
}

/// SELECT list with optional filters (exact match per column), ORDER BY id, optional LIMIT/OFFSET.
/// Filters on unknown columns are skipped.
pub fn select_list(
    entity: &EntityDescriptor,
    filters: &[(String, Value)],
    limit: Option<u32>,
    offset: Option<u32>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in filters {
        if col != ID_FIELD && entity.field(col).is_none() {
            continue;
        }
        if val.is_null() {
            where_parts.push(format!("{} IS NULL", quoted(col)));
            continue;
        }
        let ph = q.push_param(val.clone(), field_pg_type(entity, col));
        where_parts.push(format!("{} = {}", quoted(col), ph));
    }

    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let limit_clause = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    let offset_clause = offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}{}{}",
        select_column_list(entity),
        quoted(entity.table),
        where_clause,
        quoted(ID_FIELD),
        limit_clause,
        offset_clause
    );
    q
}

/// INSERT every declared field; missing values bind as NULL. The id comes from the sequence.
pub fn insert(entity: &EntityDescriptor, record: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for f in &entity.fields {
        let val = record.get(f.name).cloned().unwrap_or(Value::Null);
        placeholders.push(q.push_param(val, pg_type(&f.kind)));
        cols.push(quoted(f.name));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(entity)
    );
    q
}

/// UPDATE by id: SET every declared field from `record`.
pub fn update(entity: &EntityDescriptor, id: i64, record: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for f in &entity.fields {
        let val = record.get(f.name).cloned().unwrap_or(Value::Null);
        let ph = q.push_param(val, pg_type(&f.kind));
        sets.push(format!("{} = {}", quoted(f.name), ph));
    }
    if sets.is_empty() {
        return select_by_id(entity, id);
    }
    let id_ph = q.push_param(Value::from(id), "bigint");
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(entity.table),
        sets.join(", "),
        quoted(ID_FIELD),
        id_ph,
        select_column_list(entity)
    );
    q
}

/// DELETE by id.
pub fn delete(entity: &EntityDescriptor, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(Value::from(id), "bigint");
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {} RETURNING {}",
        quoted(entity.table),
        quoted(ID_FIELD),
        ph,
        select_column_list(entity)
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldSpec;
    use serde_json::json;

    fn classroom() -> EntityDescriptor {
        EntityDescriptor::new(
            "classroom",
            "classroom_classroom",
            vec![
                FieldSpec::new("name", FieldKind::Text).required(),
                FieldSpec::created_at("created_at"),
            ],
        )
    }

    #[test]
    fn insert_casts_every_placeholder() {
        let mut r = Record::new();
        r.insert("name".into(), json!("A"));
        r.insert("created_at".into(), json!("2024-01-01T00:00:00Z"));
        let q = insert(&classroom(), &r);
        assert_eq!(
            q.sql,
            "INSERT INTO \"classroom_classroom\" (\"name\", \"created_at\") VALUES ($1::text, $2::timestamptz) \
             RETURNING \"id\", \"name\", \"created_at\""
        );
        assert_eq!(q.params, vec![json!("A"), json!("2024-01-01T00:00:00Z")]);
    }

    #[test]
    fn select_list_skips_unknown_filters() {
        let q = select_list(
            &classroom(),
            &[("name".into(), json!("A")), ("nope".into(), json!(1))],
            Some(10),
            None,
        );
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"created_at\" FROM \"classroom_classroom\" WHERE \"name\" = $1::text ORDER BY \"id\" LIMIT 10"
        );
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn update_binds_id_last() {
        let q = update(&classroom(), 4, &Record::new());
        assert!(q.sql.ends_with("WHERE \"id\" = $3::bigint RETURNING \"id\", \"name\", \"created_at\""));
        assert_eq!(q.params.last(), Some(&json!(4)));
    }
}
