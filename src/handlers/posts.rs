//! Like and share counters.

use super::parse_id;
use crate::error::AppError;
use crate::models;
use crate::response::success_one_ok;
use crate::serializer;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

async fn bump(state: AppState, id_str: String, field: &'static str) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let entity = state.gateway.entity(models::post::NAME)?;
    let row = state.gateway.increment(entity.name, id, field, 1).await?;
    Ok(success_one_ok(serializer::serialize_default(entity, &row, state.media_url())))
}

pub async fn like(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    bump(state, id_str, "number_of_likes").await
}

pub async fn share(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    bump(state, id_str, "number_of_shares").await
}
