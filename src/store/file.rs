use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use uuid::Uuid;

use super::{Collection, Predicate, Record, StoreResult};

/// A collection persisted as one pretty-printed JSON array on disk.
///
/// Every operation rewrites or rereads the whole file. Operations on the same
/// collection are queued behind one mutex, so there is a single writer at a
/// time.
pub struct FileCollection<R> {
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> FileCollection<R> {
    /// Opens `<dir>/<collection>.json`, creating `dir` when needed. The file
    /// itself is created lazily on first access.
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;
        Ok(Self {
            path: dir.join(format!("{}.json", R::COLLECTION)),
            lock: Mutex::new(()),
            _record: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<Vec<R>> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::write(&self.path, "[]").await?;
                tracing::debug!(path = %self.path.display(), "created empty collection file");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write_all(&self, records: &[R]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(records)?;
        // Write next to the target and rename so readers never see a torn file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl<R: Record> Collection<R> for FileCollection<R> {
    async fn find(&self, predicate: Option<&Predicate<'_, R>>) -> StoreResult<Vec<R>> {
        let _guard = self.lock.lock().await;
        let records = self.read_all().await?;
        Ok(match predicate {
            Some(keep) => records.into_iter().filter(|r| keep(r)).collect(),
            None => records,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<R>> {
        let _guard = self.lock.lock().await;
        let records = self.read_all().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn insert(&self, record: R) -> StoreResult<R> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        records.push(record.clone());
        self.write_all(&records).await?;
        Ok(record)
    }

    async fn replace(&self, id: Uuid, record: R) -> StoreResult<Option<R>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        *slot = record.clone();
        self.write_all(&records).await?;
        Ok(Some(record))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_all(&records).await?;
        Ok(true)
    }
}
