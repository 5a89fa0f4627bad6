//! Catalog validation: referential integrity and API consistency.

use crate::config::{EntityDescriptor, ID_FIELD};
use crate::error::ConfigError;
use std::collections::HashSet;

/// Checks a descriptor list before it is resolved into a catalog.
/// Relationship targets must be declared earlier in the list so tables can be created in order.
pub fn validate(entities: &[EntityDescriptor]) -> Result<(), ConfigError> {
    let mut declared: HashSet<&str> = HashSet::new();
    let mut tables: HashSet<&str> = HashSet::new();
    let mut path_segments: HashSet<&str> = HashSet::new();
    let all_names: HashSet<&str> = entities.iter().map(|e| e.name).collect();

    for e in entities {
        if !declared.insert(e.name) || !tables.insert(e.table) {
            return Err(ConfigError::DuplicateEntity(e.name.to_string()));
        }
        if let Some(seg) = e.path_segment {
            if !path_segments.insert(seg) {
                return Err(ConfigError::DuplicatePathSegment(seg.to_string()));
            }
        }

        let mut field_names: HashSet<&str> = HashSet::new();
        field_names.insert(ID_FIELD);
        for f in &e.fields {
            if !field_names.insert(f.name) {
                return Err(ConfigError::DuplicateField {
                    entity: e.name.to_string(),
                    field: f.name.to_string(),
                });
            }
            if let Some(target) = f.kind.target() {
                if !all_names.contains(target) {
                    return Err(ConfigError::MissingReference {
                        kind: "entity",
                        id: target.to_string(),
                    });
                }
                if target != e.name && !declared.contains(target) {
                    return Err(ConfigError::OutOfOrder {
                        entity: e.name.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }

        for api_field in &e.api_fields {
            if !field_names.contains(api_field) {
                return Err(ConfigError::MissingReference {
                    kind: "field",
                    id: format!("{}.{}", e.name, api_field),
                });
            }
        }
        if e.soft_delete && e.field("is_deleted").is_none() {
            return Err(ConfigError::MissingReference {
                kind: "field",
                id: format!("{}.is_deleted", e.name),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldKind, FieldSpec, OnDelete};

    fn classroom() -> EntityDescriptor {
        EntityDescriptor::new(
            "classroom",
            "classroom",
            vec![FieldSpec::new("name", FieldKind::Text).required()],
        )
        .exposed_at("classrooms")
    }

    fn course() -> EntityDescriptor {
        EntityDescriptor::new(
            "course",
            "course",
            vec![FieldSpec::new(
                "classroom",
                FieldKind::ForeignKey { target: "classroom", on_delete: OnDelete::SetNull },
            )],
        )
    }

    #[test]
    fn accepts_ordered_catalog() {
        assert!(validate(&[classroom(), course()]).is_ok());
    }

    #[test]
    fn rejects_forward_reference() {
        let err = validate(&[course(), classroom()]).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfOrder { .. }));
    }

    #[test]
    fn rejects_unknown_target() {
        let err = validate(&[course()]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingReference { kind: "entity", .. }));
    }

    #[test]
    fn rejects_duplicate_path_segment() {
        let other = EntityDescriptor::new("room", "room", vec![]).exposed_at("classrooms");
        let err = validate(&[classroom(), other]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePathSegment(_)));
    }

    #[test]
    fn rejects_unknown_api_field() {
        let mut e = classroom();
        e.api_fields.push("title");
        assert!(validate(&[e]).is_err());
    }
}
