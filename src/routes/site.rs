//! Site routes, registered from the route table.

use super::table::{Page, ROUTES};
use crate::handlers::{auth, forms, pages};
use crate::state::AppState;
use axum::{
    routing::{get, post, MethodRouter},
    Router,
};

fn handler(page: Page) -> MethodRouter<AppState> {
    match page {
        Page::Home => get(pages::home),
        Page::Posts => get(pages::post_list),
        Page::PostForm => get(forms::post_form_page).post(forms::post_form_submit),
        Page::PostDetail => get(pages::post_detail),
        Page::User => get(pages::user_text),
        Page::Login => get(forms::login_page).post(forms::login_submit),
        Page::TokenAuth => post(auth::obtain_auth_token),
    }
}

pub fn site_routes() -> Router<AppState> {
    ROUTES
        .iter()
        .fold(Router::new(), |router, r| router.route(r.path, handler(r.page)))
}
