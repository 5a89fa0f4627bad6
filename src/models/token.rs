use crate::config::{EntityDescriptor, FieldKind, FieldSpec, OnDelete};
use serde::Deserialize;

pub const NAME: &str = "token";

/// API auth tokens. Not exposed as a resource; issued by the token exchange.
pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "authtoken_token",
        vec![
            FieldSpec::new("key", FieldKind::Text).required().unique().max_length(40),
            FieldSpec::new(
                "user",
                FieldKind::ForeignKey { target: super::user::NAME, on_delete: OnDelete::Cascade },
            )
            .required()
            .unique(),
            FieldSpec::created_at("created_at"),
        ],
    )
}

#[derive(Clone, Debug, Deserialize)]
pub struct Token {
    pub key: String,
    pub user: i64,
}
