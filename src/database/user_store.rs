use async_trait::async_trait;
use thiserror::Error;

use crate::models::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("corrupt user row {id:?}: {reason}")]
    Corrupt { id: Option<i32>, reason: String },
    #[error("store lock poisoned")]
    Poisoned,
}

/// Keyed CRUD over the users table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, ascending by id.
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    /// Inserts or overwrites by primary key.
    async fn save(&self, user: User) -> Result<User, StoreError>;

    /// Missing ids are not an error.
    async fn delete_by_id(&self, id: i32) -> Result<(), StoreError>;

    /// Backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
