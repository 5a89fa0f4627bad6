//! Router assembly: site pages, API resources, common endpoints and uploaded media.

mod api;
mod common;
mod site;
mod table;

pub use api::api_routes;
pub use common::common_routes;
pub use site::site_routes;
pub use table::{route, url_for, Page, Route, ROUTES};

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};

/// The complete application.
pub fn app(state: AppState) -> Router {
    let media_path = state.media_url().trim_end_matches('/').to_string();
    let media = ServeDir::new(state.media.root());
    Router::new()
        .merge(site_routes())
        .merge(api_routes(&state))
        .merge(common_routes())
        .nest_service(&media_path, media)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.settings.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
