// ==================== USER SERVICE ====================
// Orchestrates the users resource on top of a UserStore. Partial updates go
// through the document codec: encode -> apply patch -> decode -> save.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    database::UserStore,
    models::User,
    patch::{apply_patch, Document, DocumentCodec, PatchOperation},
    utils::error::AppError,
};

/// Document member holding the record id
const ID_FIELD: &str = "id";

pub struct UserService {
    store: Arc<dyn UserStore>,
    codec: Arc<dyn DocumentCodec<User>>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, codec: Arc<dyn DocumentCodec<User>>) -> Self {
        Self { store, codec }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = self.store.find_all().await?;
        log::debug!("📋 Listed {} users", users.len());
        Ok(users)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<User, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))
    }

    /// Saves as given. An existing id is overwritten.
    pub async fn create(&self, user: User) -> Result<User, AppError> {
        log::info!("📝 Creating user {}", user.id);
        Ok(self.store.save(user).await?)
    }

    pub async fn replace(&self, id: i32, mut user: User) -> Result<User, AppError> {
        self.get_by_id(id).await?;
        if user.id != id {
            log::debug!("Body id {} overridden by path id {}", user.id, id);
        }
        user.id = id;
        log::info!("✏️  Replacing user {}", id);
        Ok(self.store.save(user).await?)
    }

    /// Applies `operations` to the stored user. Nothing is written unless
    /// every operation succeeds and the result decodes back into a user.
    pub async fn patch_by_id(&self, id: i32, operations: &[PatchOperation]) -> Result<User, AppError> {
        let current = self.get_by_id(id).await?;
        let document = self.codec.encode(&current).map_err(|e| {
            log::error!("❌ Stored user {} could not be encoded: {}", id, e);
            AppError::Encode(e)
        })?;

        let mut patched = apply_patch(&document, operations).map_err(|e| {
            log::warn!("⚠️  Patch rejected for user {}: {}", id, e);
            AppError::from(e)
        })?;
        restore_identity(&mut patched, id);

        let mut user = self.codec.decode(patched).map_err(|e| {
            log::warn!("⚠️  Patched user {} failed to decode: {}", id, e);
            AppError::from(e)
        })?;
        user.id = id;

        log::info!("🩹 Patched user {} ({} operations)", id, operations.len());
        Ok(self.store.save(user).await?)
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<(), AppError> {
        log::info!("🗑️  Deleting user {}", id);
        Ok(self.store.delete_by_id(id).await?)
    }
}

/// The id never changes through a patch, whatever the operations did to it.
fn restore_identity(document: &mut Document, id: i32) {
    if let Value::Object(map) = document {
        map.insert(ID_FIELD.to_string(), Value::from(id));
    }
}
