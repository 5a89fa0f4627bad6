use crate::config::{EntityDescriptor, FieldKind, FieldSpec, OnDelete};
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const NAME: &str = "post";

/// Fields the post creation form accepts.
pub const FORM_FIELDS: &[&str] = &["title", "body", "image"];

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "blog_post",
        vec![
            FieldSpec::new("title", FieldKind::Text).required().max_length(200),
            FieldSpec::new("body", FieldKind::Text).required(),
            FieldSpec::new("image", FieldKind::File { upload_to: "posts/" }),
            FieldSpec::new("media", FieldKind::File { upload_to: "posts_media/" }),
            FieldSpec::new("number_of_likes", FieldKind::PositiveInteger).default_value(0),
            FieldSpec::new("number_of_shares", FieldKind::Integer).default_value(0),
            FieldSpec::created_at("created_at"),
            FieldSpec::new("is_active", FieldKind::Bool).default_value(true),
            FieldSpec::new("is_deleted", FieldKind::Bool).default_value(false),
            FieldSpec::new(
                "user",
                FieldKind::ForeignKey { target: super::user::NAME, on_delete: OnDelete::SetNull },
            ),
        ],
    )
    .exposed_at("posts")
    .soft_deleting()
}

#[derive(Clone, Debug, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub media: Option<String>,
    pub number_of_likes: i64,
    pub number_of_shares: i64,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub user: Option<i64>,
}

impl Post {
    pub fn is_visible(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}
