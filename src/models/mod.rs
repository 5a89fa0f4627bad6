//! Entity definitions: one module per entity, each a descriptor plus the typed view handlers read.

pub mod classroom;
pub mod comment;
pub mod course;
pub mod post;
pub mod profile;
pub mod reply;
pub mod student;
pub mod token;
pub mod user;

pub use course::Course;
pub use post::Post;
pub use student::Student;
pub use token::Token;
pub use user::User;

use crate::config::{resolve, Catalog, Record};
use crate::error::{AppError, ConfigError};
use serde::de::DeserializeOwned;

/// All entities, referenced entities first.
pub fn catalog() -> Result<Catalog, ConfigError> {
    resolve(vec![
        user::descriptor(),
        token::descriptor(),
        post::descriptor(),
        reply::descriptor(),
        comment::descriptor(),
        profile::descriptor(),
        classroom::descriptor(),
        course::descriptor(),
        student::descriptor(),
    ])
}

/// Decode a stored record into its typed view.
pub fn from_record<T: DeserializeOwned>(record: &Record) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::Object(record.clone()))
        .map_err(|e| AppError::Store(format!("malformed record: {}", e)))
}
