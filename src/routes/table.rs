//! Named site routes, in registration order. Handlers redirect and link through [`url_for`]
//! rather than hard-coded paths.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Posts,
    PostForm,
    PostDetail,
    User,
    Login,
    TokenAuth,
}

#[derive(Clone, Copy, Debug)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub page: Page,
}

pub const ROUTES: &[Route] = &[
    Route { name: "home", path: "/", page: Page::Home },
    Route { name: "posts", path: "/posts", page: Page::Posts },
    Route { name: "post_form", path: "/post-form", page: Page::PostForm },
    Route { name: "post_detail", path: "/posts/:id/", page: Page::PostDetail },
    Route { name: "user", path: "/user/", page: Page::User },
    Route { name: "login", path: "/login/", page: Page::Login },
    Route { name: "obtain_auth_token", path: "/api-token-auth/", page: Page::TokenAuth },
];

pub fn route(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.name == name)
}

/// Path of the named route with `:param` segments filled from `params` in order.
/// `None` for an unknown name or a parameter count mismatch.
pub fn url_for(name: &str, params: &[&str]) -> Option<String> {
    let route = route(name)?;
    let mut params = params.iter();
    let mut out = String::with_capacity(route.path.len());
    for (i, segment) in route.path.split('/').enumerate() {
        if i > 0 {
            out.push('/');
        }
        if segment.starts_with(':') {
            out.push_str(params.next()?);
        } else {
            out.push_str(segment);
        }
    }
    if params.next().is_some() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        for (i, r) in ROUTES.iter().enumerate() {
            assert!(ROUTES[i + 1..].iter().all(|o| o.name != r.name && o.path != r.path), "{}", r.name);
        }
    }

    #[test]
    fn url_for_fills_parameters() {
        assert_eq!(url_for("home", &[]).as_deref(), Some("/"));
        assert_eq!(url_for("posts", &[]).as_deref(), Some("/posts"));
        assert_eq!(url_for("post_detail", &["12"]).as_deref(), Some("/posts/12/"));
        assert_eq!(url_for("post_detail", &[]), None);
        assert_eq!(url_for("home", &["1"]), None);
        assert_eq!(url_for("nope", &[]), None);
    }
}
