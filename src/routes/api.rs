//! API routes: one resource router per exposed entity plus custom actions.
//!
//! Each resource gets explicit `/api/<segment>/` and `/api/<segment>/:id/` routes, so custom
//! actions with static segments (`top_students`) sit beside them without a catch-all.

use crate::extractors::require_token;
use crate::handlers::{posts, resource, students};
use crate::handlers::resource::Resource;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};

fn resource_router(name: &'static str, segment: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("/api/{}/", segment), get(resource::list).post(resource::create))
        .route(
            &format!("/api/{}/:id/", segment),
            get(resource::read)
                .put(resource::replace)
                .patch(resource::update)
                .delete(resource::delete),
        )
        .layer(Extension(Resource(name)))
}

pub fn api_routes(state: &AppState) -> Router<AppState> {
    let catalog = state.gateway.catalog();
    let mut router = Router::new();
    for entity in catalog.resources() {
        if let Some(segment) = entity.path_segment {
            router = router.merge(resource_router(entity.name, segment));
        }
    }
    router
        .route("/api/students/top_students/", get(students::top_students))
        .route("/api/students/:id/profile/", get(students::profile))
        .route("/api/posts/:id/like/", post(posts::like))
        .route("/api/posts/:id/share/", post(posts::share))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
}
