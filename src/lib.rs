//! edufinance: a blog and a classroom API served from declarative entity descriptors.
//!
//! Entities are described once ([`models`]), validated into a [`config::Catalog`], persisted
//! through an [`store::EntityStore`] (memory or PostgreSQL) behind the [`service::Gateway`], and
//! exposed as generic REST resources alongside a few server-rendered pages.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod media;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod serializer;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;
pub mod templates;

pub use config::{resolve, Catalog, EntityDescriptor, Record};
pub use error::{AppError, ConfigError, FieldErrors};
pub use migration::apply_migrations;
pub use models::catalog;
pub use response::{success_many, success_one, success_one_ok, success_page};
pub use routes::{app, url_for};
pub use service::Gateway;
pub use settings::Settings;
pub use state::AppState;
pub use store::{EntityStore, ListQuery, MemoryStore, PgStore};
