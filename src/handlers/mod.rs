//! HTTP handlers: generic resource CRUD, site pages and forms, custom API actions.

pub mod auth;
pub mod forms;
pub mod pages;
pub mod posts;
pub mod resource;
pub mod students;

use crate::error::AppError;

/// Path ids arrive as strings; anything but an integer is a 400.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", raw)))
}
