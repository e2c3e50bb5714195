use std::collections::HashMap;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::session::BookingSession;
use crate::error::{AppError, AppResult};

/// In-memory booking sessions keyed by id.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, BookingSession>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Store a new session, dropping any that have gone idle.
    pub async fn insert(&self, session: BookingSession) -> BookingSession {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Expired sessions removed");
        }

        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> AppResult<BookingSession> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))
    }

    /// Apply `f` to the stored session under the write lock and return the result.
    /// The session is left untouched when `f` fails.
    pub async fn update<F>(&self, id: Uuid, f: F) -> AppResult<BookingSession>
    where
        F: FnOnce(&mut BookingSession) -> AppResult<()>,
    {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

        let mut draft = stored.clone();
        f(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tariff::TariffCatalog;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new(60);
        let session = store.insert(BookingSession::new(&TariffCatalog::default())).await;

        assert_eq!(store.get(session.id).await.unwrap(), session);
        store.remove(session.id).await.unwrap();
        assert!(matches!(store.get(session.id).await, Err(AppError::NotFound(_))));
        assert!(store.remove(session.id).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_update_is_not_persisted() {
        let store = SessionStore::new(60);
        let session = store.insert(BookingSession::new(&TariffCatalog::default())).await;

        let result = store
            .update(session.id, |s| {
                s.pickup_address = "changed".to_string();
                Err(AppError::BadRequest("nope".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.get(session.id).await.unwrap().pickup_address, "");
    }

    #[tokio::test]
    async fn test_expired_sessions_are_purged_on_insert() {
        let store = SessionStore::new(30);
        let catalog = TariffCatalog::default();

        let mut stale = BookingSession::new(&catalog);
        stale.updated_at = Utc::now() - Duration::minutes(45);
        let stale = store.insert(stale).await;
        assert_eq!(store.len().await, 1);

        store.insert(BookingSession::new(&catalog)).await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(stale.id).await.is_err());
    }
}
