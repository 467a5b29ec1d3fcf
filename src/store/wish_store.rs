// src/store/wish_store.rs

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{get_connection, ConnectionPool, InvalidationTracker};
use crate::domain::Wish;
use crate::error::AppResult;

const LOG_TARGET: &str = "WishStore";

/// Unbounded push stream of query results.
///
/// Nothing runs until the stream is first polled. Each poll cycle re-runs the
/// query after the table changed, so dropping the stream is the only way to
/// stop it.
pub type LiveQuery<T> = BoxStream<'static, T>;

/// Persistent table of wishes with live queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WishStore: Send + Sync {
    /// Full snapshot of the table in insertion order, re-emitted on every change
    fn observe_all(&self) -> LiveQuery<Vec<Wish>>;

    /// The wish with `id`, re-emitted whenever its content changes.
    /// Emits nothing while no such row exists; the stream stays open.
    fn observe_by_id(&self, id: i64) -> LiveQuery<Wish>;

    /// Insert a wish. An unsaved wish gets a fresh id; a wish whose explicit id
    /// is already taken is ignored. Returns the id of the written row, or
    /// `None` when the insert was ignored.
    async fn insert(&self, wish: Wish) -> AppResult<Option<i64>>;

    /// Replace title and description of the row with `wish.id`.
    /// Returns false when no such row exists.
    async fn update(&self, wish: Wish) -> AppResult<bool>;

    /// Remove the row with `wish.id`. Returns false when no such row exists.
    async fn delete(&self, wish: Wish) -> AppResult<bool>;
}

/// Run blocking SQLite work on the tokio blocking pool
async fn blocking<F, T>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

#[derive(Clone)]
pub struct SqliteWishStore {
    pool: Arc<ConnectionPool>,
    tracker: InvalidationTracker,
}

impl SqliteWishStore {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            tracker: InvalidationTracker::new(),
        }
    }

    pub fn tracker(&self) -> &InvalidationTracker {
        &self.tracker
    }

    fn row_to_wish(row: &Row) -> Result<Wish, rusqlite::Error> {
        Ok(Wish {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
        })
    }

    fn list_all(&self) -> AppResult<Vec<Wish>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare("SELECT id, title, description FROM wishes ORDER BY id")?;

        let wishes = stmt
            .query_map([], Self::row_to_wish)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(wishes)
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<Wish>> {
        let conn = get_connection(&self.pool)?;

        let wish = conn
            .query_row(
                "SELECT id, title, description FROM wishes WHERE id = ?1",
                params![id],
                Self::row_to_wish,
            )
            .optional()?;

        Ok(wish)
    }

    fn insert_row(&self, wish: &Wish) -> AppResult<Option<i64>> {
        let conn = get_connection(&self.pool)?;

        let changed = if wish.is_persisted() {
            conn.execute(
                "INSERT OR IGNORE INTO wishes (id, title, description) VALUES (?1, ?2, ?3)",
                params![wish.id, wish.title, wish.description],
            )?
        } else {
            conn.execute(
                "INSERT INTO wishes (title, description) VALUES (?1, ?2)",
                params![wish.title, wish.description],
            )?
        };

        if changed == 0 {
            log::debug!(target: LOG_TARGET, "insert of wish {} ignored, id already taken", wish.id);
            return Ok(None);
        }

        let id = conn.last_insert_rowid();
        self.tracker.invalidate();
        Ok(Some(id))
    }

    fn update_row(&self, wish: &Wish) -> AppResult<bool> {
        let conn = get_connection(&self.pool)?;

        let changed = conn.execute(
            "UPDATE wishes SET title = ?2, description = ?3 WHERE id = ?1",
            params![wish.id, wish.title, wish.description],
        )?;

        Ok(self.finish_write("update", wish.id, changed))
    }

    fn delete_row(&self, id: i64) -> AppResult<bool> {
        let conn = get_connection(&self.pool)?;

        let changed = conn.execute("DELETE FROM wishes WHERE id = ?1", params![id])?;

        Ok(self.finish_write("delete", id, changed))
    }

    fn finish_write(&self, action: &str, id: i64, changed: usize) -> bool {
        if changed == 0 {
            log::debug!(target: LOG_TARGET, "{} of wish {} matched no row", action, id);
            return false;
        }
        self.tracker.invalidate();
        true
    }
}

#[async_trait]
impl WishStore for SqliteWishStore {
    fn observe_all(&self) -> LiveQuery<Vec<Wish>> {
        let store = self.clone();
        let mut changes = self.tracker.subscribe();

        Box::pin(async_stream::stream! {
            loop {
                // Anything written from here on triggers another pass
                let _ = changes.borrow_and_update();

                let query = store.clone();
                match blocking(move || query.list_all()).await {
                    Ok(wishes) => {
                        yield wishes;
                    }
                    Err(e) => log::error!(target: LOG_TARGET, "live query for all wishes failed: {}", e),
                }

                if changes.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    fn observe_by_id(&self, id: i64) -> LiveQuery<Wish> {
        let store = self.clone();
        let mut changes = self.tracker.subscribe();

        Box::pin(async_stream::stream! {
            let mut last: Option<Wish> = None;
            loop {
                let _ = changes.borrow_and_update();

                let query = store.clone();
                match blocking(move || query.find_by_id(id)).await {
                    Ok(Some(wish)) => {
                        if last.as_ref() != Some(&wish) {
                            last = Some(wish.clone());
                            yield wish;
                        }
                    }
                    Ok(None) => last = None,
                    Err(e) => log::error!(target: LOG_TARGET, "live query for wish {} failed: {}", id, e),
                }

                if changes.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    async fn insert(&self, wish: Wish) -> AppResult<Option<i64>> {
        let store = self.clone();
        blocking(move || store.insert_row(&wish)).await
    }

    async fn update(&self, wish: Wish) -> AppResult<bool> {
        let store = self.clone();
        blocking(move || store.update_row(&wish)).await
    }

    async fn delete(&self, wish: Wish) -> AppResult<bool> {
        let store = self.clone();
        blocking(move || store.delete_row(wish.id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use futures_util::StreamExt;
    use std::time::Duration;
    use tokio::time::timeout;

    const QUIET: Duration = Duration::from_millis(200);
    const WAIT: Duration = Duration::from_secs(5);

    fn test_store() -> (tempfile::TempDir, SqliteWishStore) {
        let (dir, pool) = create_test_pool();
        (dir, SqliteWishStore::new(Arc::new(pool)))
    }

    async fn next<T>(stream: &mut LiveQuery<T>) -> T {
        timeout(WAIT, stream.next())
            .await
            .expect("live query did not emit in time")
            .expect("live query ended")
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let (_dir, store) = test_store();

        let first = store.insert(Wish::new("Bike", "Red one")).await.unwrap();
        let second = store.insert(Wish::new("Book", "Any")).await.unwrap();

        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
        assert_eq!(
            store.list_all().unwrap(),
            vec![Wish::with_id(1, "Bike", "Red one"), Wish::with_id(2, "Book", "Any")]
        );
    }

    #[tokio::test]
    async fn test_insert_with_taken_id_is_ignored() {
        let (_dir, store) = test_store();
        store.insert(Wish::with_id(5, "Bike", "Red one")).await.unwrap();
        let version = store.tracker().version();

        let result = store.insert(Wish::with_id(5, "Car", "Blue")).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(store.find_by_id(5).unwrap(), Some(Wish::with_id(5, "Bike", "Red one")));
        assert_eq!(store.tracker().version(), version);
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let (_dir, store) = test_store();
        let id = store.insert(Wish::new("Bike", "Red one")).await.unwrap().unwrap();
        store.delete(Wish::with_id(id, "Bike", "Red one")).await.unwrap();

        let next_id = store.insert(Wish::new("Book", "Any")).await.unwrap().unwrap();

        assert_ne!(id, next_id);
    }

    #[tokio::test]
    async fn test_update_targets_only_matching_row() {
        let (_dir, store) = test_store();
        store.insert(Wish::new("Bike", "Red one")).await.unwrap();
        store.insert(Wish::new("Book", "Any")).await.unwrap();

        let updated = store.update(Wish::with_id(2, "Book", "Hardcover")).await.unwrap();

        assert!(updated);
        assert_eq!(
            store.list_all().unwrap(),
            vec![Wish::with_id(1, "Bike", "Red one"), Wish::with_id(2, "Book", "Hardcover")]
        );
    }

    #[tokio::test]
    async fn test_update_missing_row_is_noop() {
        let (_dir, store) = test_store();
        let version = store.tracker().version();

        let updated = store.update(Wish::with_id(42, "Ghost", "None")).await.unwrap();

        assert!(!updated);
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.tracker().version(), version);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let (_dir, store) = test_store();
        store.insert(Wish::new("Bike", "Red one")).await.unwrap();
        store.insert(Wish::new("Book", "Any")).await.unwrap();
        let bike = Wish::with_id(1, "Bike", "Red one");

        assert!(store.delete(bike.clone()).await.unwrap());
        assert!(!store.delete(bike).await.unwrap());

        assert_eq!(store.list_all().unwrap(), vec![Wish::with_id(2, "Book", "Any")]);
    }

    #[tokio::test]
    async fn test_observe_all_reemits_on_change() {
        let (_dir, store) = test_store();
        let mut all = store.observe_all();

        assert!(next(&mut all).await.is_empty());

        store.insert(Wish::new("Bike", "Red one")).await.unwrap();
        assert_eq!(next(&mut all).await, vec![Wish::with_id(1, "Bike", "Red one")]);

        store.delete(Wish::with_id(1, "Bike", "Red one")).await.unwrap();
        assert!(next(&mut all).await.is_empty());
    }

    #[tokio::test]
    async fn test_observe_all_is_restartable() {
        let (_dir, store) = test_store();
        store.insert(Wish::new("Bike", "Red one")).await.unwrap();

        let mut first = store.observe_all();
        assert_eq!(next(&mut first).await.len(), 1);
        drop(first);

        let mut second = store.observe_all();
        assert_eq!(next(&mut second).await.len(), 1);
    }

    #[tokio::test]
    async fn test_observe_all_ignores_noop_writes() {
        let (_dir, store) = test_store();
        store.insert(Wish::with_id(1, "Bike", "Red one")).await.unwrap();
        let mut all = store.observe_all();
        assert_eq!(next(&mut all).await.len(), 1);

        store.insert(Wish::with_id(1, "Car", "Blue")).await.unwrap();
        store.update(Wish::with_id(9, "Ghost", "None")).await.unwrap();

        assert!(timeout(QUIET, all.next()).await.is_err());
    }

    #[tokio::test]
    async fn test_observe_by_id_follows_record() {
        let (_dir, store) = test_store();
        store.insert(Wish::new("Bike", "Red one")).await.unwrap();
        store.insert(Wish::new("Book", "Any")).await.unwrap();

        let mut bike = store.observe_by_id(1);
        assert_eq!(next(&mut bike).await, Wish::with_id(1, "Bike", "Red one"));

        // Changes to other rows do not re-emit the same content
        store.update(Wish::with_id(2, "Book", "Hardcover")).await.unwrap();
        assert!(timeout(QUIET, bike.next()).await.is_err());

        store.update(Wish::with_id(1, "Bike", "Blue one")).await.unwrap();
        assert_eq!(next(&mut bike).await, Wish::with_id(1, "Bike", "Blue one"));
    }

    #[tokio::test]
    async fn test_observe_by_id_goes_quiet_after_delete() {
        let (_dir, store) = test_store();
        store.insert(Wish::new("Bike", "Red one")).await.unwrap();
        let mut bike = store.observe_by_id(1);
        assert_eq!(next(&mut bike).await.title, "Bike");

        store.delete(Wish::with_id(1, "Bike", "Red one")).await.unwrap();

        // Neither an item nor the end of the stream
        assert!(timeout(QUIET, bike.next()).await.is_err());

        store.insert(Wish::with_id(1, "Bike", "Red one")).await.unwrap();
        assert_eq!(next(&mut bike).await, Wish::with_id(1, "Bike", "Red one"));
    }

    #[tokio::test]
    async fn test_observe_by_id_missing_record_emits_nothing() {
        let (_dir, store) = test_store();
        let mut ghost = store.observe_by_id(99);

        assert!(timeout(QUIET, ghost.next()).await.is_err());
    }
}
