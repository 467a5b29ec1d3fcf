// src/repositories/wish_repository.rs

use std::sync::Arc;

use crate::domain::Wish;
use crate::error::{AppError, RepositoryFailure, WishOperation};
use crate::store::{LiveQuery, WishStore};

const LOG_TARGET: &str = "WishRepository";

pub struct WishRepository {
    store: Arc<dyn WishStore>,
}

impl WishRepository {
    pub fn new(store: Arc<dyn WishStore>) -> Self {
        Self { store }
    }

    /// Live list of every wish
    pub fn get_all_wishes(&self) -> LiveQuery<Vec<Wish>> {
        self.store.observe_all()
    }

    /// Live view of a single wish
    pub fn get_wish_by_id(&self, id: i64) -> LiveQuery<Wish> {
        self.store.observe_by_id(id)
    }

    /// Returns the id of the new row, or `None` if the wish's explicit id was
    /// already taken and nothing was written.
    pub async fn add_wish(&self, wish: Wish) -> Result<Option<i64>, RepositoryFailure> {
        let id = self
            .store
            .insert(wish)
            .await
            .map_err(|e| self.failure(WishOperation::Add, e))?;

        if let Some(id) = id {
            log::debug!(target: LOG_TARGET, "Added wish {}", id);
        }
        Ok(id)
    }

    /// Updating a wish that no longer exists is not an error
    pub async fn update_wish(&self, wish: Wish) -> Result<(), RepositoryFailure> {
        let id = wish.id;
        let updated = self
            .store
            .update(wish)
            .await
            .map_err(|e| self.failure(WishOperation::Update, e))?;

        if updated {
            log::debug!(target: LOG_TARGET, "Updated wish {}", id);
        }
        Ok(())
    }

    pub async fn delete_wish(&self, wish: Wish) -> Result<(), RepositoryFailure> {
        let id = wish.id;
        let deleted = self
            .store
            .delete(wish)
            .await
            .map_err(|e| self.failure(WishOperation::Delete, e))?;

        if deleted {
            log::debug!(target: LOG_TARGET, "Deleted wish {}", id);
        }
        Ok(())
    }

    fn failure(&self, operation: WishOperation, cause: AppError) -> RepositoryFailure {
        log::error!(target: LOG_TARGET, "Failed to {} wish: {}", operation, cause);
        RepositoryFailure::new(operation, cause)
    }
}
