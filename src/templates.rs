//! Server-rendered pages. Each page builds its HTML from a typed context; every
//! interpolated value goes through [`escape`].

use crate::error::{FieldErrors, NON_FIELD_ERRORS};
use crate::models::Post;
use crate::routes::url_for;
use axum::response::Html;
use std::collections::HashMap;
use std::fmt::Write;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn link(name: &str, params: &[&str]) -> String {
    url_for(name, params).unwrap_or_else(|| "#".to_string())
}

fn layout(template: &str, title: &str, content: &str) -> Html<String> {
    tracing::debug!(template, "render");
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n\
         <nav><a href=\"{home}\">Home</a> | <a href=\"{posts}\">Posts</a> | <a href=\"{form}\">New post</a> | <a href=\"{login}\">Login</a></nav>\n\
         <main>\n{content}\n</main>\n</body>\n</html>\n",
        title = escape(title),
        home = link("home", &[]),
        posts = link("posts", &[]),
        form = link("post_form", &[]),
        login = link("login", &[]),
    ))
}

fn error_list(errors: &FieldErrors, field: &str) -> String {
    let Some(messages) = errors.get(field) else {
        return String::new();
    };
    let mut out = String::from("<ul class=\"errorlist\">");
    for m in messages {
        let _ = write!(out, "<li>{}</li>", escape(m));
    }
    out.push_str("</ul>");
    out
}

/// pages/home.html
pub fn home(name: &str) -> Html<String> {
    layout("pages/home.html", "Home", &format!("<h1>Hello {}</h1>", escape(name)))
}

/// pages/posts.html
pub fn post_list(posts: &[Post]) -> Html<String> {
    let mut content = String::from("<h1>Posts</h1>\n");
    if posts.is_empty() {
        content.push_str("<p>No posts yet.</p>");
    } else {
        content.push_str("<ul>\n");
        for post in posts {
            let _ = writeln!(
                content,
                "<li><a href=\"{}\">{}</a></li>",
                link("post_detail", &[&post.id.to_string()]),
                escape(&post.title)
            );
        }
        content.push_str("</ul>");
    }
    layout("pages/posts.html", "Posts", &content)
}

/// pages/post_details.html
pub fn post_detail(post: &Post, media_url: &str) -> Html<String> {
    let mut content = format!(
        "<article>\n<h1>{}</h1>\n<p class=\"meta\">{} &middot; {} likes &middot; {} shares</p>\n",
        escape(&post.title),
        post.created_at.format("%B %-d, %Y"),
        post.number_of_likes,
        post.number_of_shares,
    );
    if let Some(image) = post.image.as_deref().filter(|p| !p.is_empty()) {
        let _ = writeln!(
            content,
            "<img src=\"{}{}\" alt=\"{}\">",
            escape(media_url),
            escape(image),
            escape(&post.title)
        );
    }
    let _ = write!(content, "<div class=\"body\">{}</div>\n</article>", escape(&post.body));
    layout("pages/post_details.html", &post.title, &content)
}

/// pages/post_form.html. `values` refills the inputs after a rejected submission.
pub fn post_form(values: &HashMap<String, String>, errors: &FieldErrors) -> Html<String> {
    let value = |k: &str| escape(values.get(k).map(String::as_str).unwrap_or(""));
    let content = format!(
        "<h1>New post</h1>\n{non_field}\
         <form method=\"post\" action=\"{action}\" enctype=\"multipart/form-data\">\n\
         <p><label for=\"id_title\">Title:</label> <input type=\"text\" name=\"title\" id=\"id_title\" maxlength=\"200\" value=\"{title}\">{title_errors}</p>\n\
         <p><label for=\"id_body\">Body:</label> <textarea name=\"body\" id=\"id_body\">{body}</textarea>{body_errors}</p>\n\
         <p><label for=\"id_image\">Image:</label> <input type=\"file\" name=\"image\" id=\"id_image\">{image_errors}</p>\n\
         <button type=\"submit\">Save</button>\n</form>",
        non_field = error_list(errors, NON_FIELD_ERRORS),
        action = link("post_form", &[]),
        title = value("title"),
        title_errors = error_list(errors, "title"),
        body = value("body"),
        body_errors = error_list(errors, "body"),
        image_errors = error_list(errors, "image"),
    );
    layout("pages/post_form.html", "New post", &content)
}

/// pages/login.html. `welcome` is set after a successful login.
pub fn login(username: &str, errors: &FieldErrors, welcome: Option<&str>) -> Html<String> {
    if let Some(name) = welcome {
        return layout("pages/login.html", "Login", &format!("<p>Welcome back, {}.</p>", escape(name)));
    }
    let content = format!(
        "<h1>Login</h1>\n{non_field}\
         <form method=\"post\" action=\"{action}\">\n\
         <p><label for=\"id_username\">Username:</label> <input type=\"text\" name=\"username\" id=\"id_username\" maxlength=\"200\" value=\"{username}\">{username_errors}</p>\n\
         <p><label for=\"id_password\">Password:</label> <input type=\"password\" name=\"password\" id=\"id_password\">{password_errors}</p>\n\
         <button type=\"submit\">Log in</button>\n</form>",
        non_field = error_list(errors, NON_FIELD_ERRORS),
        action = link("login", &[]),
        username = escape(username),
        username_errors = error_list(errors, "username"),
        password_errors = error_list(errors, "password"),
    );
    layout("pages/login.html", "Login", &content)
}
