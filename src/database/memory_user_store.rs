use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{StoreError, UserStore};
use crate::models::User;

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    rows: RwLock<BTreeMap<i32, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        rows.remove(&id);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32, name: &str) -> User {
        User {
            id,
            email: format!("{}@x.com", name.to_lowercase()),
            full_name: name.to_string(),
            password: "p".to_string(),
        }
    }

    #[tokio::test]
    async fn save_is_an_upsert() {
        let store = InMemoryUserStore::new();
        store.save(user(1, "John")).await.unwrap();
        store.save(user(1, "Jane")).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![user(1, "Jane")]);
    }

    #[tokio::test]
    async fn lists_in_id_order() {
        let store = InMemoryUserStore::new();
        for (id, name) in [(3, "C"), (1, "A"), (2, "B")] {
            store.save(user(id, name)).await.unwrap();
        }
        let ids: Vec<i32> = store.find_all().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn find_and_delete() {
        let store = InMemoryUserStore::new();
        store.save(user(5, "Eve")).await.unwrap();

        assert_eq!(store.find_by_id(5).await.unwrap(), Some(user(5, "Eve")));
        store.delete_by_id(5).await.unwrap();
        assert_eq!(store.find_by_id(5).await.unwrap(), None);

        // deleting again is fine
        store.delete_by_id(5).await.unwrap();
    }
}
