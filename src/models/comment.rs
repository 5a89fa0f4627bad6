use crate::config::{EntityDescriptor, FieldKind, FieldSpec, OnDelete};

pub const NAME: &str = "comment";

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "blog_comment",
        vec![
            FieldSpec::new(
                "post",
                FieldKind::ForeignKey { target: super::post::NAME, on_delete: OnDelete::Cascade },
            )
            .required(),
            FieldSpec::new("message", FieldKind::Text).required(),
            FieldSpec::created_at("created_at"),
            FieldSpec::new("replies", FieldKind::ManyToMany { target: super::reply::NAME })
                .default_value(serde_json::json!([])),
        ],
    )
    .exposed_at("comments")
}
