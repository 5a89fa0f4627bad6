//! Token exchange.

use crate::auth::obtain_token;
use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenBody {
    pub token: String,
}

/// POST /api-token-auth/. Bad credentials are a 400 carrying `non_field_errors`.
pub async fn obtain_auth_token(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<TokenBody>, AppError> {
    match obtain_token(&state.gateway, credentials.username.trim(), &credentials.password).await {
        Ok(token) => Ok(Json(TokenBody { token })),
        Err(AppError::Validation(errors)) => Err(AppError::Rejected(errors)),
        Err(e) => Err(e),
    }
}
