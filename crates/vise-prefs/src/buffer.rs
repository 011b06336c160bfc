//! Scoped buffering sessions.
//!
//! A session ends when its guard goes away, however that happens: an explicit
//! [`BufferGuard::commit`], a `?` that returns early, or a panic unwinding
//! through the scope. Pending writes are committed in every case, including
//! when the code inside the scope failed.

use std::ops::{Deref, DerefMut};

use vise_prefs_store::Backend;

use crate::error::{PrefsError, Result};
use crate::prefs::DynamicPrefs;

/// An open buffering session on a [`DynamicPrefs`].
///
/// Dereferences to the store, so `guard.set(..)` and `guard.get(..)` work as
/// usual while the session is open.
///
/// ```rust,no_run
/// use vise_prefs::{DynamicPrefs, PrefsConfig, GUI_DYNAMIC};
///
/// let mut prefs = DynamicPrefs::open(GUI_DYNAMIC, &PrefsConfig::default()).unwrap();
/// let mut session = prefs.buffer().unwrap();
/// session.set("window-width", 1280).unwrap();
/// session.set("window-height", 800).unwrap();
/// session.commit().unwrap();
/// ```
#[must_use = "dropping the guard ends the session immediately"]
pub struct BufferGuard<'a, B: Backend> {
    prefs: &'a mut DynamicPrefs<B>,
    finished: bool,
}

impl<'a, B: Backend> BufferGuard<'a, B> {
    /// End the session and return the result of committing its writes.
    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        self.prefs.end_buffering()
    }
}

impl<B: Backend> Deref for BufferGuard<'_, B> {
    type Target = DynamicPrefs<B>;

    fn deref(&self) -> &Self::Target {
        &*self.prefs
    }
}

impl<B: Backend> DerefMut for BufferGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.prefs
    }
}

impl<B: Backend> Drop for BufferGuard<'_, B> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // A destructor cannot return the error; the writes stay pending.
        if let Err(e) = self.prefs.end_buffering() {
            tracing::warn!(
                store = %self.prefs.name(),
                pending = self.prefs.pending_len(),
                error = %e,
                "failed to flush buffered preferences"
            );
        }
    }
}

impl<B: Backend> DynamicPrefs<B> {
    /// Open a buffering session that ends when the guard is dropped.
    pub fn buffer(&mut self) -> Result<BufferGuard<'_, B>> {
        self.begin_buffering()?;
        Ok(BufferGuard {
            prefs: self,
            finished: false,
        })
    }

    /// Run `f` inside a buffering session.
    ///
    /// The session is committed whether `f` succeeds or fails. An error from
    /// `f` takes precedence over an error from the commit.
    pub fn buffered<T, E, F>(&mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut DynamicPrefs<B>) -> std::result::Result<T, E>,
        E: From<PrefsError>,
    {
        let mut session = self.buffer()?;
        let outcome = f(&mut *session);
        let committed = session.commit();
        let value = outcome?;
        committed?;
        Ok(value)
    }
}
