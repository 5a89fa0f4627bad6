mod form;
mod json;
mod token;

pub use form::{FormPayload, UploadedFile};
pub use json::ApiJson;
pub use token::{require_token, CurrentUser, TOKEN_SCHEME};
