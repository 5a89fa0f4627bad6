use crate::config::{EntityDescriptor, FieldKind, FieldSpec};

pub const NAME: &str = "reply";

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "blog_reply",
        vec![
            FieldSpec::new("message", FieldKind::Text).required(),
            FieldSpec::created_at("created_at"),
        ],
    )
    .exposed_at("replies")
}
