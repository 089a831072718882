//! Record persistence for the product and cart collections.
//!
//! Services only see [`Collection`]; the backing strategy (JSON files or a
//! database through sea-orm) is picked at startup from configuration.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

pub mod file;
pub mod orm;

pub use file::FileCollection;
pub use orm::{OrmCartStore, OrmProductStore};

/// A record that lives in a named collection and is addressed by its id.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

pub type Predicate<'a, R> = dyn Fn(&R) -> bool + Send + Sync + 'a;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Orm(#[from] sea_orm::DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Collection<R: Record>: Send + Sync {
    /// All records in store order, optionally narrowed by `predicate`.
    async fn find(&self, predicate: Option<&Predicate<'_, R>>) -> StoreResult<Vec<R>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<R>>;

    /// Stores `record` under the id it already carries.
    async fn insert(&self, record: R) -> StoreResult<R>;

    /// Overwrites the record stored under `id`. `None` when there is none.
    async fn replace(&self, id: Uuid, record: R) -> StoreResult<Option<R>>;

    /// Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}
