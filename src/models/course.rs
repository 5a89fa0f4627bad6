use crate::config::{EntityDescriptor, FieldKind, FieldSpec, OnDelete};
use serde::Deserialize;

pub const NAME: &str = "course";

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "course_course",
        vec![
            FieldSpec::new("name", FieldKind::Text).required().max_length(250),
            FieldSpec::new("description", FieldKind::Text),
            FieldSpec::new(
                "classroom",
                FieldKind::ForeignKey { target: super::classroom::NAME, on_delete: OnDelete::SetNull },
            ),
            FieldSpec::created_at("created_at"),
        ],
    )
    .exposed_at("courses")
}

#[derive(Clone, Debug, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
}
