//! Read-only site pages.

use super::parse_id;
use crate::error::AppError;
use crate::models::{self, Post};
use crate::state::AppState;
use crate::templates;
use axum::{
    extract::{Path, State},
    response::Html,
};

/// Name shown on the home page.
pub const HOME_NAME: &str = "James";

pub async fn home() -> Html<String> {
    templates::home(HOME_NAME)
}

/// Active, non-deleted posts in creation order.
pub async fn post_list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let rows = state.gateway.all(models::post::NAME).await?;
    let mut posts = Vec::with_capacity(rows.len());
    for row in &rows {
        let post: Post = models::from_record(row)?;
        if post.is_visible() {
            posts.push(post);
        }
    }
    Ok(templates::post_list(&posts))
}

/// Any stored post, soft-deleted included.
pub async fn post_detail(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<Html<String>, AppError> {
    let id = parse_id(&id_str)?;
    let row = state.gateway.get(models::post::NAME, id).await?;
    let post: Post = models::from_record(&row)?;
    Ok(templates::post_detail(&post, state.media_url()))
}

pub async fn user_text() -> &'static str {
    "Hello from Class Based View in User"
}
