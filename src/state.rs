use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::{AppConfig, StoreBackend},
    db::{create_orm_conn, run_migrations},
    models::{Cart, Product},
    realtime::Notifier,
    store::{Collection, FileCollection, OrmCartStore, OrmProductStore},
};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn Collection<Product>>,
    pub carts: Arc<dyn Collection<Cart>>,
    pub notifier: Arc<Notifier>,
    /// Serializes every catalog and cart mutation in this process, so a
    /// validation and the write that follows it see a consistent store.
    pub write_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(products: Arc<dyn Collection<Product>>, carts: Arc<dyn Collection<Cart>>) -> Self {
        let write_gate = Arc::new(Mutex::new(()));
        let notifier = Arc::new(Notifier::new(products.clone(), write_gate.clone()));
        Self {
            products,
            carts,
            notifier,
            write_gate,
        }
    }

    /// JSON files under `dir`.
    pub async fn with_file_store(dir: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let products = FileCollection::<Product>::open(dir).await?;
        let carts = FileCollection::<Cart>::open(dir).await?;
        Ok(Self::new(Arc::new(products), Arc::new(carts)))
    }

    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.store {
            StoreBackend::File => {
                tracing::info!(dir = %config.data_dir.display(), "using file store");
                Self::with_file_store(&config.data_dir).await
            }
            StoreBackend::Database => {
                tracing::info!("using database store");
                let orm = create_orm_conn(config.require_database_url()?).await?;
                run_migrations(&orm, &config.migrations_dir).await?;
                Ok(Self::new(
                    Arc::new(OrmProductStore::new(orm.clone())),
                    Arc::new(OrmCartStore::new(orm)),
                ))
            }
        }
    }
}
