mod memory_user_store;
mod mongo_user_store;
mod user_store;

pub use memory_user_store::InMemoryUserStore;
pub use mongo_user_store::MongoUserStore;
pub use user_store::{StoreError, UserStore};

use mongodb::{Client, Collection, Database};
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Lookup index on users(email). Deliberately not unique: the service
    /// does not enforce email uniqueness.
    async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        use mongodb::bson::{doc, Document};
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(mongo_user_store::COLLECTION);
        let email_index = IndexModel::builder().keys(doc! { "email": 1 }).build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
