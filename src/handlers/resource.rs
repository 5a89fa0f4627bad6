//! Resource CRUD handlers, generic over the entity descriptor: list, create, read, replace,
//! update, delete. The router attaches the entity as a [`Resource`] extension.

use super::parse_id;
use crate::config::EntityDescriptor;
use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::response::{success_one, success_one_ok, success_page};
use crate::serializer::{self, Mode};
use crate::state::AppState;
use crate::store::ListQuery;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Entity name served by a resource router.
#[derive(Clone, Copy, Debug)]
pub struct Resource(pub &'static str);

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// `limit`/`offset` paging plus exact-match filters on readable fields. Unknown keys are ignored.
fn list_query(entity: &EntityDescriptor, params: HashMap<String, String>) -> ListQuery {
    let mut query = ListQuery::all();
    for (k, v) in params {
        match k.as_str() {
            "limit" => query.limit = v.parse().ok(),
            "offset" => query.offset = v.parse().ok(),
            _ => {
                if let Some(value) = serializer::query_value(entity, &k, &v) {
                    query.filters.push((k, value));
                }
            }
        }
    }
    query.filters.sort_by(|a, b| a.0.cmp(&b.0));
    query
}

pub async fn list(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let entity = state.gateway.entity(resource.0)?;
    let query = list_query(entity, params);
    let rows = state.gateway.list(entity.name, &query).await?;
    let data = rows
        .iter()
        .map(|r| serializer::serialize_default(entity, r, state.media_url()))
        .collect();
    Ok(success_page(data, &query))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let entity = state.gateway.entity(resource.0)?;
    let input = body_to_map(body)?;
    let fields = serializer::deserialize(entity, &input, Mode::Create, state.media_url()).map_err(AppError::Validation)?;
    let row = state.gateway.create(entity.name, fields).await?;
    Ok(success_one(serializer::serialize_default(entity, &row, state.media_url())))
}

pub async fn read(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entity = state.gateway.entity(resource.0)?;
    let id = parse_id(&id_str)?;
    let row = state.gateway.get(entity.name, id).await?;
    Ok(success_one_ok(serializer::serialize_default(entity, &row, state.media_url())))
}

async fn write(state: AppState, resource: Resource, id_str: String, body: Value, mode: Mode) -> Result<impl IntoResponse, AppError> {
    let entity = state.gateway.entity(resource.0)?;
    let id = parse_id(&id_str)?;
    // 404 takes precedence over payload errors.
    state.gateway.get(entity.name, id).await?;
    let input = body_to_map(body)?;
    let fields = serializer::deserialize(entity, &input, mode, state.media_url()).map_err(AppError::Validation)?;
    let row = state.gateway.update(entity.name, id, fields).await?;
    Ok(success_one_ok(serializer::serialize_default(entity, &row, state.media_url())))
}

/// PUT: required fields must be present.
pub async fn replace(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    write(state, resource, id_str, body, Mode::Replace).await
}

/// PATCH: only the fields sent are changed.
pub async fn update(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    write(state, resource, id_str, body, Mode::Partial).await
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entity = state.gateway.entity(resource.0)?;
    let id = parse_id(&id_str)?;
    state.gateway.delete(entity.name, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_coerces_filters_and_paging() {
        let catalog = crate::models::catalog().unwrap();
        let post = catalog.entity("post").unwrap();
        let params = HashMap::from([
            ("limit".to_string(), "5".to_string()),
            ("offset".to_string(), "x".to_string()),
            ("is_active".to_string(), "true".to_string()),
            ("user".to_string(), "3".to_string()),
            ("bogus".to_string(), "1".to_string()),
        ]);
        let query = list_query(post, params);
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.offset, None);
        assert_eq!(
            query.filters,
            vec![("is_active".to_string(), Value::Bool(true)), ("user".to_string(), Value::from(3))]
        );
    }
}
