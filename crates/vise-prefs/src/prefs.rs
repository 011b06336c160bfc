//! DynamicPrefs: a named, cached, default-aware preference store.
//!
//! Reads go through an in-memory cache in front of a [`Backend`]. Writes go
//! straight to the backend unless a buffering session is open, in which case
//! they wait in a pending list until the session ends and are then committed
//! in one transaction.
//!
//! A row exists for a key only when its value differs from the registered
//! default. Writing the default deletes the row.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use vise_prefs_core::{decode, encode, Value};
use vise_prefs_store::{Backend, SqliteBackend, StoreError, WriteOp};

use crate::config::PrefsConfig;
use crate::error::{PrefsError, Result};

type Opener<B> = Box<dyn Fn() -> std::result::Result<B, StoreError>>;

/// A write that has been validated but not yet applied.
#[derive(Debug, Clone)]
pub(crate) enum PendingWrite {
    /// Store `value`; `text` is its encoding.
    Set { value: Value, text: String },
    /// Remove the row.
    Delete,
}

/// A preference store backed by one file.
///
/// The store is meant to be driven from one thread; every method takes
/// `&mut self` and none of them block on anything but the backend.
///
/// # Design Notes
///
/// - **Lazy open**: the backend is opened on first access. A failed open is
///   returned to the caller and attempted again on the next access.
/// - **Cached misses**: a key with no row and no default is cached as `None`.
/// - **Stale reads while buffering**: reads never consult pending writes.
/// - **No cross-instance coherence**: two stores on one file do not see each
///   other's writes until [`DynamicPrefs::invalidate_cache`].
pub struct DynamicPrefs<B: Backend = SqliteBackend> {
    name: String,
    path: Option<PathBuf>,
    backend: Option<B>,
    opener: Option<Opener<B>>,
    cache: HashMap<String, Option<Value>>,
    defaults: HashMap<String, Value>,
    pending: Vec<(String, PendingWrite)>,
    buffering: bool,
}

impl DynamicPrefs<SqliteBackend> {
    /// A store called `name`, backed by `<config_dir>/<name>.sqlite`.
    ///
    /// Nothing touches the disk until the first read or write.
    pub fn open(name: &str, config: &PrefsConfig) -> Result<Self> {
        let path = config.store_path(name)?;
        let file = path.clone();
        let opener: Opener<SqliteBackend> = Box::new(move || {
            if let Some(dir) = file.parent() {
                std::fs::create_dir_all(dir)?;
            }
            SqliteBackend::open(&file)
        });

        let mut prefs = Self::empty(name);
        prefs.path = Some(path);
        prefs.opener = Some(opener);
        Ok(prefs)
    }
}

impl<B: Backend> DynamicPrefs<B> {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            path: None,
            backend: None,
            opener: None,
            cache: HashMap::new(),
            defaults: HashMap::new(),
            pending: Vec::new(),
            buffering: false,
        }
    }

    /// A store over a backend that is already open.
    pub fn with_backend(name: &str, backend: B) -> Self {
        let mut prefs = Self::empty(name);
        prefs.backend = Some(backend);
        prefs
    }

    /// A store whose backend is produced by `opener` on first access.
    pub fn with_opener<F>(name: &str, opener: F) -> Self
    where
        F: Fn() -> std::result::Result<B, StoreError> + 'static,
    {
        let mut prefs = Self::empty(name);
        prefs.opener = Some(Box::new(opener));
        prefs
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backing file, when the store was built from a [`PrefsConfig`].
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The backend, opening it if needed.
    pub fn backend(&mut self) -> Result<&mut B> {
        let backend = match self.backend.take() {
            Some(backend) => backend,
            None => {
                let opener = self.opener.as_ref().ok_or_else(|| {
                    PrefsError::StorageUnavailable(StoreError::Unavailable(format!(
                        "no backend for store {:?}",
                        self.name
                    )))
                })?;
                opener().map_err(PrefsError::StorageUnavailable)?
            }
        };
        Ok(self.backend.insert(backend))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Defaults
    // ─────────────────────────────────────────────────────────────────────────

    /// Register the default for `name`.
    ///
    /// Defaults live only in memory. A cached resolution of `name` is dropped
    /// so the next read sees the new default.
    pub fn set_default(&mut self, name: &str, value: impl Into<Value>) {
        self.defaults.insert(name.to_owned(), value.into());
        self.cache.remove(name);
    }

    /// Forget the default for `name`.
    pub fn clear_default(&mut self, name: &str) {
        self.defaults.remove(name);
        self.cache.remove(name);
    }

    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.defaults.get(name)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve `name`: the stored value, else its default, else `None`.
    pub fn get(&mut self, name: &str) -> Result<Option<Value>> {
        if let Some(cached) = self.cache.get(name) {
            return Ok(cached.clone());
        }

        tracing::trace!(store = %self.name, name, "preference cache miss");
        let stored = self.backend()?.load(name)?;
        let value = match stored {
            Some(text) => Some(decode(&text).map_err(|source| PrefsError::CorruptValue {
                key: name.to_owned(),
                source,
            })?),
            None => self.defaults.get(name).cloned(),
        };

        self.cache.insert(name.to_owned(), value.clone());
        Ok(value)
    }

    /// Like [`get`](Self::get), with `fallback` standing in for "no value".
    pub fn get_or(&mut self, name: &str, fallback: impl Into<Value>) -> Result<Value> {
        Ok(self.get(name)?.unwrap_or_else(|| fallback.into()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Set `name` to `value`.
    ///
    /// A value equal to the registered default removes the row instead.
    /// Numbers compare by value here, so `100.0` matches a default of `100`.
    ///
    /// The value is encoded immediately, so an unencodable value fails here
    /// even inside a buffering session. Outside a session the write is
    /// durable when this returns; inside one it is held until the session
    /// ends.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let text = encode(&value).map_err(|source| PrefsError::UnencodableValue {
            key: name.to_owned(),
            source,
        })?;
        self.write(name, PendingWrite::Set { value, text })
    }

    /// Remove the row for `name`; reads fall back to the default.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.write(name, PendingWrite::Delete)
    }

    fn write(&mut self, name: &str, write: PendingWrite) -> Result<()> {
        if self.buffering {
            self.stash(name, write);
            return Ok(());
        }

        let (op, cached) = self.resolve(name, write);
        let backend = self.backend()?;
        match &op {
            WriteOp::Put { name, value } => backend.store(name, value)?,
            WriteOp::Delete { name } => backend.remove(name)?,
        }
        // A write left over from a failed flush must not replay over this one.
        self.pending.retain(|(n, _)| n != name);
        self.update_cache(name, cached);
        Ok(())
    }

    /// Turn a write into the backend op and the cache entry it leaves behind
    /// (`None` evicts).
    fn resolve(&self, name: &str, write: PendingWrite) -> (WriteOp, Option<Value>) {
        match write {
            PendingWrite::Set { value, .. } if self.is_default(name, &value) => {
                (WriteOp::delete(name), None)
            }
            PendingWrite::Set { value, text } => (WriteOp::put(name, text), Some(value)),
            PendingWrite::Delete => (WriteOp::delete(name), None),
        }
    }

    fn is_default(&self, name: &str, value: &Value) -> bool {
        self.defaults.get(name).is_some_and(|d| d.same_as(value))
    }

    fn update_cache(&mut self, name: &str, cached: Option<Value>) {
        match cached {
            Some(value) => {
                self.cache.insert(name.to_owned(), Some(value));
            }
            None => {
                self.cache.remove(name);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Buffering
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    /// Number of writes waiting for the end of the buffering session.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Start holding writes back. Sessions do not nest.
    pub fn begin_buffering(&mut self) -> Result<()> {
        if self.buffering {
            return Err(PrefsError::AlreadyBuffering);
        }
        self.buffering = true;
        Ok(())
    }

    /// Stop holding writes back and commit the pending ones.
    ///
    /// Pending writes are replayed in the order their keys were first
    /// written, inside one transaction. If the transaction fails nothing is
    /// persisted, the cache is untouched, and the writes stay pending so a
    /// later call can retry them.
    pub fn end_buffering(&mut self) -> Result<()> {
        self.buffering = false;
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut ops = Vec::with_capacity(self.pending.len());
        let mut updates = Vec::with_capacity(self.pending.len());
        for (name, write) in &self.pending {
            let (op, cached) = self.resolve(name, write.clone());
            ops.push(op);
            updates.push((name.clone(), cached));
        }

        self.backend()?.apply(&ops)?;

        for (name, cached) in updates {
            self.update_cache(&name, cached);
        }
        self.pending.clear();
        tracing::debug!(store = %self.name, writes = ops.len(), "flushed buffered preferences");
        Ok(())
    }

    fn stash(&mut self, name: &str, write: PendingWrite) {
        match self.pending.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = write,
            None => self.pending.push((name.to_owned(), write)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Maintenance
    // ─────────────────────────────────────────────────────────────────────────

    /// Names with a stored row, in write order.
    pub fn keys(&mut self) -> Result<Vec<String>> {
        let entries = self.backend()?.entries()?;
        Ok(entries.into_iter().map(|(name, _)| name).collect())
    }

    /// Drop every cached resolution, so the next reads go to the backend.
    pub fn invalidate_cache(&mut self) {
        self.cache.clear();
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }
}
