use crate::auth::{MemoryUserStore, PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::db;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Build state from config. Returns the pool too, when there is one, so
    /// the caller can close it on shutdown.
    pub async fn init(config: &AppConfig) -> anyhow::Result<(Self, Option<PgPool>)> {
        if config.database.is_memory() {
            tracing::warn!("DATABASE_URL=memory; accounts are not persisted");
            return Ok((Self::in_memory(), None));
        }

        let pool = db::connect(&config.database).await?;
        db::migrate(&pool).await?;
        let users = Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn UserStore>;
        Ok((Self { users }, Some(pool)))
    }

    pub fn from_parts(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
        }
    }
}
