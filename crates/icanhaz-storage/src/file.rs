use async_trait::async_trait;
use icanhaz_core::repository::{ReadRepository, Repository, Result};
use icanhaz_core::{LinkRecord, ShortCode, StorageError};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::TryLockError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info};

type Links = BTreeMap<String, LinkRecord>;

/// JSON file implementation of the repository contract.
///
/// The whole store is one JSON object mapping each code to
/// `{"id": <url>, "count": <hits>}`. It is loaded once when the repository is
/// opened and rewritten after every mutation: the snapshot goes to a uniquely
/// named temp file in the same directory which is fsynced and then renamed
/// over the store.
///
/// Opening takes an exclusive lock on a sibling `.lock` file, held until the
/// repository is dropped, so one store file has at most one live handle
/// across processes. Inside the handle all access goes through a single
/// mutex, so a hit-count update is never lost to a concurrent one. If a write
/// fails, the in-memory state is rolled back to match what is on disk.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    links: Mutex<Links>,
    _lock: std::fs::File,
}

impl FileRepository {
    /// Opens the store at `path`, creating an empty one if it does not exist.
    ///
    /// Fails with [`StorageError::Io`] when another handle already holds the
    /// store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lock = lock_store(&path).await?;

        let links = match fs::read(&path).await {
            Ok(bytes) => parse_links(&path, &bytes)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let links = Links::new();
                write_snapshot(&path, &links).await?;
                links
            }
            Err(err) => return Err(map_io_error(&path, err)),
        };

        info!(path = %path.display(), links = links.len(), "opened link store");

        Ok(Self {
            path,
            links: Mutex::new(links),
            _lock: lock,
        })
    }

    /// Returns the location of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.links.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.lock().await.is_empty()
    }
}

fn parse_links(path: &Path, bytes: &[u8]) -> Result<Links> {
    // e.g. a file created by hand with `touch`
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Links::new());
    }

    serde_json::from_slice(bytes).map_err(|e| {
        StorageError::InvalidData(format!("cannot parse '{}': {e}", path.display()))
    })
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn map_io_error(path: &Path, err: io::Error) -> StorageError {
    StorageError::Io(format!("'{}': {err}", path.display()))
}

async fn lock_store(path: &Path) -> Result<std::fs::File> {
    let lock_path = lock_path(path);
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)
        .await
        .map_err(|e| map_io_error(&lock_path, e))?
        .into_std()
        .await;

    match file.try_lock() {
        Ok(()) => Ok(file),
        Err(TryLockError::WouldBlock) => Err(StorageError::Io(format!(
            "'{}' is already opened by another handle",
            path.display()
        ))),
        Err(TryLockError::Error(err)) => Err(map_io_error(&lock_path, err)),
    }
}

async fn write_snapshot(path: &Path, links: &Links) -> Result<()> {
    let bytes =
        serde_json::to_vec(links).map_err(|e| StorageError::Serialization(e.to_string()))?;
    let path = path.to_owned();

    task::spawn_blocking(move || persist_snapshot(&path, &bytes))
        .await
        .map_err(|e| StorageError::Operation(format!("snapshot writer failed: {e}")))?
}

/// Writes `bytes` to a fresh temp file next to `path` and renames it into
/// place. The temp file is removed on every error path.
fn persist_snapshot(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = parent_dir(path);
    let mut tmp = tempfile::Builder::new()
        .prefix(".snapshot-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| map_io_error(dir, e))?;

    tmp.write_all(bytes)
        .map_err(|e| map_io_error(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| map_io_error(tmp.path(), e))?;

    tmp.persist(path)
        .map_err(|e| map_io_error(path, e.error))?;
    Ok(())
}

#[async_trait]
impl ReadRepository for FileRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self.links.lock().await.get(code.as_str()).cloned())
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn put(&self, code: &ShortCode, record: LinkRecord) -> Result<Option<LinkRecord>> {
        let key = code.as_str();
        let mut links = self.links.lock().await;

        let previous = links.insert(key.to_owned(), record);

        if let Err(err) = write_snapshot(&self.path, &links).await {
            match previous {
                Some(previous) => links.insert(key.to_owned(), previous),
                None => links.remove(key),
            };
            return Err(err);
        }

        debug!(code = %code, links = links.len(), "link stored");
        Ok(previous)
    }

    async fn record_hit(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let key = code.as_str();
        let mut links = self.links.lock().await;

        let Some(record) = links.get_mut(key) else {
            return Ok(None);
        };
        let previous_count = record.hit_count;
        record.hit_count = previous_count.saturating_add(1);
        let updated = record.clone();

        if let Err(err) = write_snapshot(&self.path, &links).await {
            if let Some(record) = links.get_mut(key) {
                record.hit_count = previous_count;
            }
            return Err(err);
        }

        Ok(Some(updated))
    }
}
