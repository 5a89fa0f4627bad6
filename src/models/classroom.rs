use crate::config::{EntityDescriptor, FieldKind, FieldSpec};

pub const NAME: &str = "classroom";

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "classroom_classroom",
        vec![
            FieldSpec::new("name", FieldKind::Text).required().unique().max_length(250),
            FieldSpec::created_at("created_at"),
        ],
    )
    .exposed_at("classrooms")
}
