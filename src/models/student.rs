use crate::config::{EntityDescriptor, FieldKind, FieldSpec, OnDelete, Record};
use crate::error::FieldErrors;
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

pub const NAME: &str = "student";

/// Students strictly older than this are listed by the top-students action.
pub const TOP_STUDENT_MIN_AGE: u32 = 20;

pub fn descriptor() -> EntityDescriptor {
    EntityDescriptor::new(
        NAME,
        "user_student",
        vec![
            FieldSpec::new(
                "user",
                FieldKind::ForeignKey { target: super::user::NAME, on_delete: OnDelete::Cascade },
            )
            .required()
            .unique(),
            FieldSpec::new("address", FieldKind::Text).max_length(250),
            FieldSpec::new("date_of_birth", FieldKind::Date),
            FieldSpec::new("profile_image", FieldKind::File { upload_to: "profile/" }),
            FieldSpec::new(
                "course",
                FieldKind::ForeignKey { target: super::course::NAME, on_delete: OnDelete::SetNull },
            ),
            FieldSpec::created_at("created_at"),
        ],
    )
    .exposed_at("students")
    .with_validator(validate)
}

fn validate(record: &Record, errors: &mut FieldErrors) {
    let dob = record
        .get("date_of_birth")
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
    if let Some(dob) = dob {
        if dob > Utc::now().date_naive() {
            errors.add("date_of_birth", "Date of birth cannot be in the future.");
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Student {
    pub id: i64,
    pub user: i64,
    pub date_of_birth: Option<NaiveDate>,
    pub course: Option<i64>,
}

impl Student {
    /// Age in whole years on `today`; `None` without a date of birth.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.date_of_birth?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}
