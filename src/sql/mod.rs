//! SQL for the PostgreSQL store. Table and column names come from descriptors; values are
//! always bound.

mod builder;
mod params;

pub use builder::{delete, insert, pg_type, quoted, select_by_id, select_list, update, QueryBuf};
pub use params::PgBindValue;
