use std::sync::Arc;

use axum::async_trait;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

/// Server-side session records keyed by an opaque id.
///
/// The store owns consistency: concurrent readers see a session until the
/// owning logout deletes it or the periodic sweep removes it after expiry.
/// `resolve` does not check expiry itself; an expired-but-unswept session
/// still resolves.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<Uuid>;
    async fn resolve(&self, session_id: Uuid) -> anyhow::Result<Option<Uuid>>;
    /// Deleting an id that no longer exists is not an error.
    async fn delete(&self, session_id: Uuid) -> anyhow::Result<()>;
    async fn purge_expired(&self) -> anyhow::Result<u64>;
}

/// Postgres-backed session store over the `sessions` table.
#[derive(Clone)]
pub struct PgSessionStore {
    db: PgPool,
}

impl PgSessionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        let expires_at = OffsetDateTime::now_utc() + ttl;
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.db)
        .await?;
        Ok(id)
    }

    async fn resolve(&self, session_id: Uuid) -> anyhow::Result<Option<Uuid>> {
        let row = sqlx::query_as::<_, (Option<Uuid>,)>(
            r#"
            SELECT user_id FROM sessions WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.and_then(|r| r.0))
    }

    async fn delete(&self, session_id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM sessions WHERE id = $1"#)
            .bind(session_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn purge_expired(&self) -> anyhow::Result<u64> {
        let result = sqlx::query(r#"DELETE FROM sessions WHERE expires_at <= now()"#)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}

/// In-memory store used by tests and `AppState::fake`.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: std::sync::Mutex<std::collections::HashMap<Uuid, (Option<Uuid>, OffsetDateTime)>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        let expires_at = OffsetDateTime::now_utc() + ttl;
        self.inner
            .lock()
            .unwrap()
            .insert(id, (Some(user_id), expires_at));
        Ok(id)
    }

    async fn resolve(&self, session_id: Uuid) -> anyhow::Result<Option<Uuid>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .get(&session_id)
            .and_then(|(user_id, _)| *user_id))
    }

    async fn delete(&self, session_id: Uuid) -> anyhow::Result<()> {
        self.inner.lock().unwrap().remove(&session_id);
        Ok(())
    }

    async fn purge_expired(&self) -> anyhow::Result<u64> {
        let now = OffsetDateTime::now_utc();
        let mut map = self.inner.lock().unwrap();
        let before = map.len();
        map.retain(|_, (_, expires_at)| *expires_at > now);
        Ok((before - map.len()) as u64)
    }
}

/// Background sweep enforcing passive session expiry on a fixed period.
pub fn spawn_sweeper(
    store: Arc<dyn SessionStore>,
    period: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "expired sessions removed"),
                Err(e) => warn!(error = %e, "session sweep failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_resolve_returns_the_user() {
        let store = MemorySessionStore::default();
        let user_id = Uuid::new_v4();
        let sid = store.create(user_id, Duration::days(7)).await.unwrap();
        assert_eq!(store.resolve(sid).await.unwrap(), Some(user_id));
    }

    #[tokio::test]
    async fn resolve_unknown_session_is_none() {
        let store = MemorySessionStore::default();
        assert_eq!(store.resolve(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemorySessionStore::default();
        let sid = store
            .create(Uuid::new_v4(), Duration::days(1))
            .await
            .unwrap();
        store.delete(sid).await.unwrap();
        // second delete of the same id still succeeds
        store.delete(sid).await.unwrap();
        assert_eq!(store.resolve(sid).await.unwrap(), None);
    }

    #[tokio::test]
    async fn purge_removes_only_expired_sessions() {
        let store = MemorySessionStore::default();
        let live = store
            .create(Uuid::new_v4(), Duration::days(1))
            .await
            .unwrap();
        let dead = store
            .create(Uuid::new_v4(), Duration::seconds(-1))
            .await
            .unwrap();
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.resolve(live).await.unwrap().is_some());
        assert!(store.resolve(dead).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_but_unswept_session_still_resolves() {
        let store = MemorySessionStore::default();
        let user_id = Uuid::new_v4();
        let sid = store
            .create(user_id, Duration::seconds(-1))
            .await
            .unwrap();
        // expiry is enforced by the sweep, never at read time
        assert_eq!(store.resolve(sid).await.unwrap(), Some(user_id));
    }
}
