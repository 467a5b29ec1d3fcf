// src/application/state.rs
//
// Composition root: one pool, one store, one repository.
// View states are created on demand and share the repository.

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::application::view_state::WishListViewState;
use crate::config::AppConfig;
use crate::db::{
    create_connection_pool, get_connection, get_database_stats, initialize_database,
    verify_database_integrity, ConnectionPool, DatabaseStats,
};
use crate::error::AppResult;
use crate::repositories::WishRepository;
use crate::store::{SqliteWishStore, WishStore};

/// Application state shared by every screen.
/// All fields are Arc-wrapped for thread-safe sharing.
pub struct AppState {
    pub config: AppConfig,
    pub pool: Arc<ConnectionPool>,
    pub wish_repository: Arc<WishRepository>,
}

impl AppState {
    /// Open (or create) the database described by `config` and wire the layers
    pub fn initialize(config: AppConfig) -> AppResult<Self> {
        // 1. INFRASTRUCTURE
        let pool = Arc::new(create_connection_pool(
            &config.database_path,
            config.pool_max_size,
        )?);

        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
            verify_database_integrity(&conn)?;
        }

        log::info!(
            target: "WishStore",
            "Database ready at {}",
            config.database_path.display()
        );

        // 2. STORE
        let store: Arc<dyn WishStore> = Arc::new(SqliteWishStore::new(Arc::clone(&pool)));

        // 3. REPOSITORY
        let wish_repository = Arc::new(WishRepository::new(store));

        Ok(Self {
            config,
            pool,
            wish_repository,
        })
    }

    /// New view state whose background work runs on `background`
    pub fn view_state(&self, background: Handle) -> WishListViewState {
        WishListViewState::new(Arc::clone(&self.wish_repository), background)
    }

    pub fn database_stats(&self) -> AppResult<DatabaseStats> {
        let conn = get_connection(&self.pool)?;
        get_database_stats(&conn)
    }
}
