//! Resolved catalog: descriptors validated and indexed for runtime lookup.

use crate::config::{validate, EntityDescriptor, FieldSpec, FieldKind, OnDelete};
use crate::error::ConfigError;
use std::collections::HashMap;

/// A foreign key on `entity` pointing at some other entity.
#[derive(Clone, Copy, Debug)]
pub struct Dependent<'a> {
    pub entity: &'a EntityDescriptor,
    pub field: &'a FieldSpec,
    /// `None` for many-to-many references.
    pub on_delete: Option<OnDelete>,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    entities: Vec<EntityDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl Catalog {
    /// Entities in declaration order (referenced entities first).
    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.by_name.get(name).map(|&i| &self.entities[i])
    }

    /// Entities exposed on the API, in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.iter().filter(|e| e.path_segment.is_some())
    }

    /// Every field in the catalog that references `target`.
    pub fn dependents_of(&self, target: &str) -> Vec<Dependent<'_>> {
        let mut out = Vec::new();
        for entity in &self.entities {
            for field in &entity.fields {
                match &field.kind {
                    FieldKind::ForeignKey { target: t, on_delete } if *t == target => out.push(Dependent {
                        entity,
                        field,
                        on_delete: Some(*on_delete),
                    }),
                    FieldKind::ManyToMany { target: t } if *t == target => out.push(Dependent {
                        entity,
                        field,
                        on_delete: None,
                    }),
                    _ => {}
                }
            }
        }
        out
    }
}

/// Validate descriptors and build the catalog.
pub fn resolve(entities: Vec<EntityDescriptor>) -> Result<Catalog, ConfigError> {
    validate(&entities)?;
    let mut by_name = HashMap::new();
    for (i, e) in entities.iter().enumerate() {
        by_name.insert(e.name, i);
    }
    Ok(Catalog { entities, by_name })
}
