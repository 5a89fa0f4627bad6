//! HTML form handlers: post creation and login.

use crate::auth::authenticate;
use crate::config::{FieldKind, Record};
use crate::error::{AppError, FieldErrors, NON_FIELD_ERRORS};
use crate::extractors::{CurrentUser, FormPayload};
use crate::models::post::{self, FORM_FIELDS};
use crate::routes::url_for;
use crate::serializer::{self, Mode, REQUIRED};
use crate::state::AppState;
use crate::templates;
use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::collections::HashMap;

pub const LOGIN_FAILED: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

pub async fn post_form_page() -> impl IntoResponse {
    templates::post_form(&HashMap::new(), &FieldErrors::new())
}

fn redirect(name: &str) -> Result<Response, AppError> {
    let location = url_for(name, &[]).ok_or_else(|| AppError::NotFound(format!("route {}", name)))?;
    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}

fn rerender(values: &HashMap<String, String>, errors: &FieldErrors) -> Response {
    templates::post_form(values, errors).into_response()
}

/// Valid submissions create a post and redirect home; invalid ones re-render the form (200)
/// with per-field errors.
pub async fn post_form_submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: FormPayload,
) -> Result<Response, AppError> {
    let entity = state.gateway.entity(post::NAME)?;
    let text_field = |name: &str| {
        FORM_FIELDS.contains(&name)
            && !matches!(entity.field(name).map(|f| &f.kind), Some(FieldKind::File { .. }))
    };
    let input = serializer::form_to_input(payload.fields.iter().filter(|(k, _)| text_field(k)));
    let mut fields = match serializer::deserialize(entity, &input, Mode::Create, state.media_url()) {
        Ok(f) => f,
        Err(errors) => return Ok(rerender(&payload.fields, &errors)),
    };

    if let Some(user) = user {
        fields.insert("user".into(), Value::from(user.id));
    }

    let mut stored_files = Vec::new();
    match create_with_uploads(&state, &payload, fields, &mut stored_files).await {
        Ok(()) => redirect("home"),
        Err(e) => {
            for path in &stored_files {
                if let Err(err) = state.media.remove(path).await {
                    tracing::warn!(path = %path, error = %err, "could not remove orphaned upload");
                }
            }
            match e {
                AppError::Validation(errors) => Ok(rerender(&payload.fields, &errors)),
                e => Err(e),
            }
        }
    }
}

/// Save the form's files, then insert the post. Every saved path is pushed to `stored_files`
/// as soon as it exists on disk.
async fn create_with_uploads(
    state: &AppState,
    payload: &FormPayload,
    mut fields: Record,
    stored_files: &mut Vec<String>,
) -> Result<(), AppError> {
    let entity = state.gateway.entity(post::NAME)?;
    for upload in &payload.files {
        let Some(spec) = entity.field(&upload.field).filter(|f| FORM_FIELDS.contains(&f.name)) else {
            continue;
        };
        if let FieldKind::File { upload_to } = spec.kind {
            let path = state.media.save(upload_to, &upload.file_name, &upload.bytes).await?;
            stored_files.push(path.clone());
            fields.insert(spec.name.to_string(), Value::String(path));
        }
    }
    state.gateway.create(post::NAME, fields).await?;
    Ok(())
}

pub async fn login_page() -> impl IntoResponse {
    templates::login("", &FieldErrors::new(), None)
}

/// Checks presence, then credentials. Either way the page is re-rendered.
pub async fn login_submit(State(state): State<AppState>, payload: FormPayload) -> Result<Response, AppError> {
    let username = payload.text("username").trim();
    let password = payload.text("password");
    let mut errors = FieldErrors::new();
    if username.is_empty() {
        errors.add("username", REQUIRED);
    }
    if password.is_empty() {
        errors.add("password", REQUIRED);
    }
    if errors.is_empty() {
        match authenticate(&state.gateway, username, password).await? {
            Some(user) => {
                tracing::info!(user = user.id, "login");
                return Ok(templates::login(username, &errors, Some(&user.display_name())).into_response());
            }
            None => errors.add(NON_FIELD_ERRORS, LOGIN_FAILED),
        }
    }
    Ok(templates::login(username, &errors, None).into_response())
}
