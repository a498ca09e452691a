//! Auth service.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{PgPool, Postgres, query_scalar};
use tokio::sync::RwLock;

use crate::auth::{AuthServiceError, ParticipantKey, Session, hash_bearer_token};

const FIND_SESSION_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_session_by_token_hash.sql");

#[derive(Debug, Clone)]
pub struct PgAuthService {
    pool: PgPool,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, token: &str) -> Result<Session, AuthServiceError> {
        let participant = query_scalar::<Postgres, String>(FIND_SESSION_BY_TOKEN_HASH_SQL)
            .bind(hash_bearer_token(token))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        Ok(Session::new(ParticipantKey::new(participant)))
    }
}

/// Session lookup held in process memory, keyed by token hash.
#[derive(Debug, Default)]
pub struct MemoryAuthService {
    sessions: RwLock<HashMap<String, ParticipantKey>>,
}

impl MemoryAuthService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session while building the service.
    #[must_use]
    pub fn with_session(mut self, token: &str, participant: impl Into<ParticipantKey>) -> Self {
        self.sessions
            .get_mut()
            .insert(hash_bearer_token(token), participant.into());

        self
    }

    /// Register a session on a shared service.
    pub async fn insert_session(&self, token: &str, participant: impl Into<ParticipantKey>) {
        self.sessions
            .write()
            .await
            .insert(hash_bearer_token(token), participant.into());
    }
}

#[async_trait]
impl AuthService for MemoryAuthService {
    async fn authenticate_bearer(&self, token: &str) -> Result<Session, AuthServiceError> {
        self.sessions
            .read()
            .await
            .get(&hash_bearer_token(token))
            .cloned()
            .map(Session::new)
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the session it was issued for.
    async fn authenticate_bearer(&self, token: &str) -> Result<Session, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn memory_sessions_resolve_registered_tokens() -> TestResult {
        let auth = MemoryAuthService::new().with_session("secret-token", "alice@example.com");

        let session = auth.authenticate_bearer("secret-token").await?;

        assert_eq!(session.participant.as_str(), "alice@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn memory_sessions_reject_unknown_tokens() {
        let auth = MemoryAuthService::new().with_session("secret-token", "alice@example.com");

        let result = auth.authenticate_bearer("other-token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn sessions_can_be_added_after_construction() -> TestResult {
        let auth = MemoryAuthService::new();

        auth.insert_session("late-token", "bob@example.com").await;

        let session = auth.authenticate_bearer("late-token").await?;

        assert_eq!(session.participant, ParticipantKey::new("bob@example.com"));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for testcontainers"]
    async fn pg_sessions_resolve_stored_token_hashes() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.insert_session("pg-token", "carol@example.com").await;

        let auth = PgAuthService::new(ctx.db.pool().clone());

        let session = auth.authenticate_bearer("pg-token").await?;
        let missing = auth.authenticate_bearer("unknown").await;

        assert_eq!(session.participant.as_str(), "carol@example.com");
        assert!(
            matches!(missing, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {missing:?}"
        );

        Ok(())
    }
}
