use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::Collection;

use super::{MongoDB, StoreError, UserStore};
use crate::models::User;

pub(super) const COLLECTION: &str = "users";

// Field-to-column mapping for the users table
const COL_ID: &str = "_id";
const COL_EMAIL: &str = "email";
const COL_FULL_NAME: &str = "full_name";
const COL_PASSWORD: &str = "password";

#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<Document>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<Document>(COLLECTION),
        }
    }
}

fn user_to_row(user: &User) -> Document {
    let mut row = Document::new();
    row.insert(COL_ID, user.id);
    row.insert(COL_EMAIL, user.email.as_str());
    row.insert(COL_FULL_NAME, user.full_name.as_str());
    row.insert(COL_PASSWORD, user.password.as_str());
    row
}

fn user_from_row(row: &Document) -> Result<User, StoreError> {
    let id = match row.get(COL_ID) {
        Some(Bson::Int32(id)) => *id,
        Some(Bson::Int64(id)) => i32::try_from(*id).map_err(|_| StoreError::Corrupt {
            id: None,
            reason: format!("{} {} does not fit in i32", COL_ID, id),
        })?,
        other => {
            return Err(StoreError::Corrupt {
                id: None,
                reason: format!("{} has unexpected value {:?}", COL_ID, other),
            })
        }
    };

    let text = |column: &str| -> Result<String, StoreError> {
        row.get_str(column)
            .map(str::to_string)
            .map_err(|e| StoreError::Corrupt {
                id: Some(id),
                reason: format!("{}: {}", column, e),
            })
    };

    Ok(User {
        id,
        email: text(COL_EMAIL)?,
        full_name: text(COL_FULL_NAME)?,
        password: text(COL_PASSWORD)?,
    })
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await?;
        let rows: Vec<Document> = cursor.try_collect().await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let row = self.collection.find_one(doc! { "_id": id }).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        self.collection
            .replace_one(doc! { "_id": user.id }, user_to_row(&user))
            .upsert(true)
            .await?;
        log::debug!("💾 Saved user {} to {}", user.id, COLLECTION);
        Ok(user)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), StoreError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            log::debug!("ℹ️  Delete of user {} matched no rows", id);
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
