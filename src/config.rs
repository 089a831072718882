use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, bail};

/// Where product and cart records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Database,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "fs" => Ok(StoreBackend::File),
            "database" | "db" | "postgres" => Ok(StoreBackend::Database),
            other => bail!("unknown STORE_BACKEND `{other}`, expected `file` or `database`"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub data_dir: PathBuf,
    pub database_url: Option<String>,
    pub migrations_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let store = match env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StoreBackend::File,
        };
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let database_url = env::var("DATABASE_URL").ok();
        let migrations_dir = env::var("MIGRATIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("migrations"));

        let config = Self {
            host,
            port,
            store,
            data_dir,
            database_url,
            migrations_dir,
        };
        if config.store == StoreBackend::Database {
            config.require_database_url()?;
        }
        Ok(config)
    }

    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set for the database store backend")
    }
}
