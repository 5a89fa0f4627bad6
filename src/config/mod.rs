//! Entity descriptors and the catalog they resolve into.

mod resolved;
mod types;
mod validator;

pub use resolved::{resolve, Catalog, Dependent};
pub use types::*;
pub use validator::validate;
