//! Entity descriptor types: field list, constraints and relationships of one entity.

use crate::error::FieldErrors;
use serde_json::Value;

/// A stored entity instance: field name to primitive value, `id` included.
pub type Record = serde_json::Map<String, Value>;

/// Primary key column present on every entity.
pub const ID_FIELD: &str = "id";

/// What happens to a referencing record when its target is hard-deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
}

/// One allowed value of a choice field: stored code and display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Choice {
    pub code: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Integer,
    PositiveInteger,
    /// Bounded or unbounded string; bounds live in [`ValidationRule`].
    Text,
    Bool,
    DateTime,
    Date,
    Choice(&'static [Choice]),
    /// Reference to a stored file, relative to the media root, under `upload_to`.
    File { upload_to: &'static str },
    ForeignKey { target: &'static str, on_delete: OnDelete },
    /// List of ids of the target entity.
    ManyToMany { target: &'static str },
    /// Write-only secret, stored hashed.
    Password,
}

impl FieldKind {
    pub fn target(&self) -> Option<&'static str> {
        match self {
            FieldKind::ForeignKey { target, .. } | FieldKind::ManyToMany { target } => Some(target),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Emitted in responses, ignored on input.
    ReadOnly,
    /// Accepted on input, never emitted.
    WriteOnly,
}

/// Extra per-field constraints checked on create and update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationRule {
    pub max_length: Option<u32>,
    pub pattern: Option<&'static str>,
    pub format: Option<&'static str>,
    pub minimum: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    pub unique: bool,
    /// Value applied on create when the input omits the field.
    pub default: Option<Value>,
    pub access: Access,
    /// Set to the current time when the record is inserted.
    pub auto_now_add: bool,
    pub rules: ValidationRule,
}

impl FieldSpec {
    /// Optional, nullable, read-write field with no constraints.
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        let rules = match kind {
            FieldKind::PositiveInteger => ValidationRule {
                minimum: Some(0),
                ..ValidationRule::default()
            },
            _ => ValidationRule::default(),
        };
        FieldSpec {
            name,
            kind,
            required: false,
            nullable: true,
            unique: false,
            default: None,
            access: Access::ReadWrite,
            auto_now_add: false,
            rules,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.nullable = false;
        self
    }

    pub fn max_length(mut self, n: u32) -> Self {
        self.rules.max_length = Some(n);
        self
    }

    pub fn pattern(mut self, pattern: &'static str) -> Self {
        self.rules.pattern = Some(pattern);
        self
    }

    pub fn format(mut self, format: &'static str) -> Self {
        self.rules.format = Some(format);
        self
    }

    pub fn write_only(mut self) -> Self {
        self.access = Access::WriteOnly;
        self
    }

    /// Creation timestamp: read-only, set on insert.
    pub fn created_at(name: &'static str) -> Self {
        FieldSpec {
            access: Access::ReadOnly,
            auto_now_add: true,
            nullable: false,
            ..FieldSpec::new(name, FieldKind::DateTime)
        }
    }

    pub fn is_readable(&self) -> bool {
        self.access != Access::WriteOnly
    }

    pub fn is_writable(&self) -> bool {
        self.access != Access::ReadOnly
    }
}

/// Entity-specific check run after the generic field rules.
pub type RecordHook = fn(&Record, &mut FieldErrors);

#[derive(Clone, Debug)]
pub struct EntityDescriptor {
    /// Internal name, used by foreign keys (`post`, `classroom`).
    pub name: &'static str,
    pub table: &'static str,
    /// API collection segment (`posts`); `None` keeps the entity off the API.
    pub path_segment: Option<&'static str>,
    pub fields: Vec<FieldSpec>,
    /// Serialization allow-list, in output order.
    pub api_fields: Vec<&'static str>,
    /// `delete` flags `is_deleted` instead of removing the record.
    pub soft_delete: bool,
    pub validate: Option<RecordHook>,
}

impl EntityDescriptor {
    pub fn new(name: &'static str, table: &'static str, fields: Vec<FieldSpec>) -> Self {
        let mut api_fields = vec![ID_FIELD];
        api_fields.extend(fields.iter().filter(|f| f.is_readable()).map(|f| f.name));
        EntityDescriptor {
            name,
            table,
            path_segment: None,
            fields,
            api_fields,
            soft_delete: false,
            validate: None,
        }
    }

    pub fn exposed_at(mut self, path_segment: &'static str) -> Self {
        self.path_segment = Some(path_segment);
        self
    }

    pub fn with_validator(mut self, validate: RecordHook) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn soft_deleting(mut self) -> Self {
        self.soft_delete = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
