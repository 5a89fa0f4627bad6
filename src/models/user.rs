use crate::config::{EntityDescriptor, FieldKind, FieldSpec};
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const NAME: &str = "user";

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "auth_user",
        vec![
            FieldSpec::new("username", FieldKind::Text)
                .required()
                .unique()
                .max_length(150)
                .pattern(r"^[\w.@+-]+$"),
            FieldSpec::new("password", FieldKind::Password).required().write_only(),
            FieldSpec::new("first_name", FieldKind::Text).default_value("").max_length(150),
            FieldSpec::new("last_name", FieldKind::Text).default_value("").max_length(150),
            FieldSpec::new("email", FieldKind::Text).max_length(254).format("email"),
            FieldSpec::new("is_staff", FieldKind::Bool).default_value(false),
            FieldSpec::new("is_active", FieldKind::Bool).default_value(true),
            FieldSpec::created_at("date_joined"),
        ],
    )
    .exposed_at("users")
}

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// "First Last" when either is set, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}
