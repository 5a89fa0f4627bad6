//! Resolve the `Authorization: Token <key>` header to a user.

use crate::auth::user_for_token;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, Method},
    middleware::Next,
    response::Response,
};

/// Scheme word in the Authorization header.
pub const TOKEN_SCHEME: &str = "Token";

/// User behind the request's token, if any. A header carrying an unknown key is rejected with 401.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Option<User>);

fn token_key(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid token header".into()))?;
    let mut words = value.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some(scheme), Some(key), None) if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) => Ok(Some(key.to_string())),
        (Some(scheme), _, _) if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) => {
            Err(AppError::Unauthorized("invalid token header".into()))
        }
        // Other schemes are not ours to judge.
        _ => Ok(None),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }
        let Some(key) = token_key(parts)? else {
            return Ok(CurrentUser(None));
        };
        let user = user_for_token(&state.gateway, &key)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::Unauthorized("invalid token".into()))?;
        let current = CurrentUser(Some(user));
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Middleware for API routes: with `require_api_auth` on, unsafe methods need a valid token.
pub async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &state).await?;
    let safe = matches!(parts.method, Method::GET | Method::HEAD | Method::OPTIONS);
    if state.settings.require_api_auth && !safe && user.is_none() {
        return Err(AppError::Unauthorized("Authentication credentials were not provided.".into()));
    }
    Ok(next.run(Request::from_parts(parts, body)).await)
}
