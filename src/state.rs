//! Shared application state for all routes.

use crate::error::AppError;
use crate::media::MediaStorage;
use crate::migration::apply_migrations;
use crate::service::Gateway;
use crate::settings::Settings;
use crate::store::{EntityStore, MemoryStore, PgStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub media: Arc<MediaStorage>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// State over an existing store, with the standard entity catalog.
    pub fn new(store: Arc<dyn EntityStore>, settings: Settings) -> Result<Self, AppError> {
        let catalog = Arc::new(crate::models::catalog()?);
        let media = MediaStorage::new(settings.media_root.clone(), settings.media_url.clone());
        Ok(AppState {
            gateway: Arc::new(Gateway::new(store, catalog)),
            media: Arc::new(media),
            settings: Arc::new(settings),
        })
    }

    pub fn in_memory(settings: Settings) -> Result<Self, AppError> {
        Self::new(Arc::new(MemoryStore::new()), settings)
    }

    /// PostgreSQL when `DATABASE_URL` is set (tables created on the way), memory otherwise.
    pub async fn connect(settings: Settings) -> Result<Self, AppError> {
        let Some(url) = settings.database_url.clone() else {
            tracing::warn!("DATABASE_URL not set; records are kept in memory");
            return Self::in_memory(settings);
        };
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .connect(&url)
            .await?;
        let catalog = crate::models::catalog()?;
        apply_migrations(&pool, &catalog).await?;
        Self::new(Arc::new(PgStore::new(pool)), settings)
    }

    pub fn media_url(&self) -> &str {
        self.media.url()
    }
}
