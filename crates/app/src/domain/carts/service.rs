//! Cart lines service.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::RwLock;

use crate::{
    database::Db,
    domain::carts::{
        errors::CartLinesServiceError,
        records::{CartLineRecord, CartLineUuid},
        repository::PgCartLinesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartLinesService {
    db: Db,
    repository: PgCartLinesRepository,
}

impl PgCartLinesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartLinesRepository::new(),
        }
    }
}

#[async_trait]
impl CartLinesService for PgCartLinesService {
    async fn get_cart_line(
        &self,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartLinesServiceError> {
        Ok(self.repository.get_cart_line(self.db.pool(), line).await?)
    }
}

/// Cart lines held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCartLinesService {
    lines: RwLock<HashMap<CartLineUuid, CartLineRecord>>,
}

impl MemoryCartLinesService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a cart line.
    pub async fn put_cart_line(&self, line: CartLineRecord) {
        self.lines.write().await.insert(line.uuid, line);
    }
}

#[async_trait]
impl CartLinesService for MemoryCartLinesService {
    async fn get_cart_line(
        &self,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartLinesServiceError> {
        self.lines
            .read()
            .await
            .get(&line)
            .cloned()
            .ok_or(CartLinesServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait CartLinesService: Send + Sync {
    /// Retrieve a single live cart line.
    async fn get_cart_line(
        &self,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartLinesServiceError>;
}
