//! Student actions beyond plain CRUD.

use super::parse_id;
use crate::error::AppError;
use crate::models::{self, student::TOP_STUDENT_MIN_AGE, Course, Student, User};
use crate::response::{success_many, success_one_ok};
use crate::serializer;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
pub struct StudentProfile {
    pub name: String,
    pub course: Option<String>,
}

/// GET /api/students/:id/profile/
pub async fn profile(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let student: Student = models::from_record(&state.gateway.get(models::student::NAME, id).await?)?;
    let user: User = models::from_record(&state.gateway.get(models::user::NAME, student.user).await?)?;
    let course = match student.course {
        Some(course_id) => {
            let course: Course = models::from_record(&state.gateway.get(models::course::NAME, course_id).await?)?;
            Some(course.name)
        }
        None => None,
    };
    Ok(success_one_ok(StudentProfile {
        name: user.display_name(),
        course,
    }))
}

/// GET /api/students/top_students/: students older than 20 today.
pub async fn top_students(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entity = state.gateway.entity(models::student::NAME)?;
    let today = Utc::now().date_naive();
    let rows = state
        .gateway
        .filter(models::student::NAME, |r| {
            models::from_record::<Student>(r)
                .ok()
                .and_then(|s| s.age_on(today))
                .map(|age| age > TOP_STUDENT_MIN_AGE)
                .unwrap_or(false)
        })
        .await?;
    let data = rows
        .iter()
        .map(|r| serializer::serialize_default(entity, r, state.media_url()))
        .collect();
    Ok(success_many(data))
}
