//! DDL for the PostgreSQL store: one table per catalog entity, created in declaration order.

use crate::config::{Catalog, EntityDescriptor, FieldKind, OnDelete};
use crate::error::AppError;
use crate::sql::{pg_type, quoted};
use sqlx::PgPool;

/// CREATE TABLE IF NOT EXISTS for one entity, with unique and foreign-key constraints.
pub fn create_table_sql(catalog: &Catalog, entity: &EntityDescriptor) -> String {
    let mut col_defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted("id"))];
    for f in &entity.fields {
        let mut def = format!("{} {}", quoted(f.name), pg_type(&f.kind).to_uppercase());
        if !f.nullable {
            def.push_str(" NOT NULL");
        }
        if f.unique {
            def.push_str(" UNIQUE");
        }
        if let FieldKind::ForeignKey { target, on_delete } = &f.kind {
            if let Some(target) = catalog.entity(target) {
                let action = match on_delete {
                    OnDelete::Cascade => "CASCADE",
                    OnDelete::SetNull => "SET NULL",
                };
                def.push_str(&format!(
                    " REFERENCES {} ({}) ON DELETE {}",
                    quoted(target.table),
                    quoted("id"),
                    action
                ));
            }
        }
        if let Some(min) = f.rules.minimum {
            def.push_str(&format!(" CHECK ({} >= {})", quoted(f.name), min));
        }
        col_defs.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quoted(entity.table),
        col_defs.join(",\n    ")
    )
}

/// Create every table of the catalog. Idempotent.
pub async fn apply_migrations(pool: &PgPool, catalog: &Catalog) -> Result<(), AppError> {
    for entity in catalog.entities() {
        let ddl = create_table_sql(catalog, entity);
        tracing::debug!(table = entity.table, "ensure table");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(tables = catalog.entities().len(), "migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_table_has_set_null_owner_and_likes_check() {
        let catalog = crate::models::catalog().unwrap();
        let post = catalog.entity("post").unwrap();
        let ddl = create_table_sql(&catalog, post);
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS \"blog_post\""));
        assert!(ddl.contains("\"title\" TEXT NOT NULL"));
        assert!(ddl.contains("\"user\" BIGINT REFERENCES \"auth_user\" (\"id\") ON DELETE SET NULL"));
        assert!(ddl.contains("CHECK (\"number_of_likes\" >= 0)"));
    }

    #[test]
    fn classroom_name_is_unique() {
        let catalog = crate::models::catalog().unwrap();
        let ddl = create_table_sql(&catalog, catalog.entity("classroom").unwrap());
        assert!(ddl.contains("\"name\" TEXT NOT NULL UNIQUE"));
    }
}
