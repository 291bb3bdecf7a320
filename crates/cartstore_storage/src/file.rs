//! Origin-scoped persistent store using `MessagePack` files.
//!
//! Each origin owns one file under the configured root directory. Every
//! write is synced to disk before `set` returns, so a reopened store sees
//! all writes that succeeded. An open store holds an exclusive lock on its
//! origin; a second `open` of the same origin fails until the first store
//! is dropped.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use cartstore_foundation::{Error, Result, StoreConfig};
use fs2::FileExt;
use im::OrdMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::kv::KeyValueStore;
use crate::memory::MemoryStore;

/// On-disk layout of one origin's entries.
#[derive(Serialize, Deserialize)]
struct StoreFile {
    /// The origin that wrote the file. Sanitized file names can collide,
    /// this cannot.
    origin: String,
    entries: OrdMap<String, String>,
}

/// A write-through store persisted to a per-origin file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    origin: String,
    entries: MemoryStore,
    /// Held open for the store's lifetime; closing it releases the lock.
    _lock: File,
}

impl FileStore {
    /// Opens the store for the configured origin, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the root is not
    /// a usable directory, the origin is already open, the file cannot be
    /// read or decoded, or the file belongs to a different origin.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        if config.root.exists() && !config.root.is_dir() {
            return Err(Error::storage_unavailable(format!(
                "'{}' is not a directory",
                config.root.display()
            )));
        }
        fs::create_dir_all(&config.root).map_err(|e| {
            Error::io(format!(
                "failed to create directory '{}': {e}",
                config.root.display()
            ))
        })?;

        let path = config.path();
        let lock = lock_origin(&path, &config.origin)?;

        let entries = if path.exists() {
            let file = load(&path)?;
            if file.origin != config.origin {
                return Err(Error::storage_unavailable(format!(
                    "'{}' belongs to origin '{}', not '{}'",
                    path.display(),
                    file.origin,
                    config.origin
                )));
            }
            info!(
                origin = %config.origin,
                path = %path.display(),
                entries = file.entries.len(),
                "opened store"
            );
            MemoryStore::from_entries(file.entries, config.quota_bytes)
        } else {
            info!(origin = %config.origin, path = %path.display(), "created store");
            match config.quota_bytes {
                Some(bytes) => MemoryStore::with_quota(bytes),
                None => MemoryStore::new(),
            }
        };

        Ok(Self {
            path,
            origin: config.origin.clone(),
            entries,
            _lock: lock,
        })
    }

    /// Returns the file backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the origin this store belongs to.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the bytes used by keys and values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.used_bytes()
    }

    /// Writes the current entries to disk.
    ///
    /// The file is replaced atomically: a sibling temporary file is written,
    /// synced, and then renamed over it.
    fn flush(&self) -> Result<()> {
        let file = StoreFile {
            origin: self.origin.clone(),
            entries: self.entries.snapshot(),
        };
        let bytes =
            rmp_serde::to_vec_named(&file).map_err(|e| Error::serialization(e.to_string()))?;

        let tmp = self.path.with_extension("msgpack.tmp");
        let handle = File::create(&tmp).map_err(|e| {
            Error::io(format!("failed to create file '{}': {e}", tmp.display()))
        })?;

        let mut writer = BufWriter::new(handle);
        writer.write_all(&bytes).map_err(|e| {
            Error::io(format!("failed to write to file '{}': {e}", tmp.display()))
        })?;
        let handle = writer.into_inner().map_err(|e| {
            Error::io(format!(
                "failed to flush file '{}': {}",
                tmp.display(),
                e.error()
            ))
        })?;
        handle.sync_all().map_err(|e| {
            Error::io(format!("failed to sync file '{}': {e}", tmp.display()))
        })?;
        drop(handle);

        fs::rename(&tmp, &self.path).map_err(|e| {
            Error::io(format!(
                "failed to replace file '{}': {e}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "flushed store");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.entries.get(key)?;
        self.entries.set(key, value)?;

        if let Err(e) = self.flush() {
            self.entries.restore(key, previous);
            return Err(e.during("flush", key));
        }
        Ok(())
    }
}

/// Opens and exclusively locks the lock file beside `path`.
///
/// The data file itself is replaced on every write, so the lock lives on a
/// separate file that is never renamed.
fn lock_origin(path: &Path, origin: &str) -> Result<File> {
    let lock_path = path.with_extension("msgpack.lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| {
            Error::io(format!(
                "failed to open lock file '{}': {e}",
                lock_path.display()
            ))
        })?;

    file.try_lock_exclusive().map_err(|e| {
        if e.kind() == fs2::lock_contended_error().kind() {
            Error::storage_unavailable(format!("origin '{origin}' is already open"))
        } else {
            Error::io(format!(
                "failed to lock file '{}': {e}",
                lock_path.display()
            ))
        }
    })?;
    Ok(file)
}

fn load(path: &Path) -> Result<StoreFile> {
    let bytes = fs::read(path)
        .map_err(|e| Error::io(format!("failed to read file '{}': {e}", path.display())))?;
    rmp_serde::from_slice(&bytes).map_err(|e| Error::serialization(e.to_string()))
}
