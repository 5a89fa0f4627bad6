use crate::config::{Choice, EntityDescriptor, FieldKind, FieldSpec, OnDelete};

pub const NAME: &str = "profile";

pub const GENDER_CHOICES: &[Choice] = &[
    Choice { code: "M", label: "Male" },
    Choice { code: "F", label: "Female" },
];

pub const ROLE_CHOICES: &[Choice] = &[
    Choice { code: "Admin", label: "ADMIN" },
    Choice { code: "Teacher", label: "TEACHER" },
];

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "user_profile",
        vec![
            FieldSpec::new(
                "user",
                FieldKind::ForeignKey { target: super::user::NAME, on_delete: OnDelete::Cascade },
            )
            .required()
            .unique(),
            FieldSpec::new("gender", FieldKind::Choice(GENDER_CHOICES)).required().max_length(200),
            FieldSpec::new("role", FieldKind::Choice(ROLE_CHOICES)).required().max_length(200),
        ],
    )
    .exposed_at("profiles")
}
