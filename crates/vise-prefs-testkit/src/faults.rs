//! Fault injection for backends.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use vise_prefs_store::{Backend, Result, StoreError, WriteOp};

const NEVER: usize = usize::MAX;

/// Shared controls for a [`FailingBackend`].
///
/// Clones share state, so a test keeps one handle while the store owns the
/// backend.
#[derive(Debug, Clone)]
pub struct FaultSwitch {
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    fail_apply_at: Arc<AtomicUsize>,
    loads: Arc<AtomicUsize>,
}

impl Default for FaultSwitch {
    fn default() -> Self {
        Self {
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_apply_at: Arc::new(AtomicUsize::new(NEVER)),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl FaultSwitch {
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Make the next batches fail when they reach op `index`.
    pub fn fail_apply_at(&self, index: usize) {
        self.fail_apply_at.store(index, Ordering::SeqCst);
    }

    /// Turn every fault off.
    pub fn heal(&self) {
        self.fail_reads(false);
        self.fail_writes(false);
        self.fail_apply_at.store(NEVER, Ordering::SeqCst);
    }

    /// How many `load` calls reached the backend.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

/// Wraps a backend and fails the operations its [`FaultSwitch`] selects.
///
/// A failing batch is rejected before any op reaches the inner backend.
pub struct FailingBackend<B> {
    inner: B,
    switch: FaultSwitch,
}

impl<B: Backend> FailingBackend<B> {
    pub fn new(inner: B) -> (Self, FaultSwitch) {
        let switch = FaultSwitch::default();
        (
            Self {
                inner,
                switch: switch.clone(),
            },
            switch,
        )
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn check_writes(&self) -> Result<()> {
        if self.switch.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        Ok(())
    }
}

impl<B: Backend> Backend for FailingBackend<B> {
    fn load(&self, name: &str) -> Result<Option<String>> {
        self.switch.loads.fetch_add(1, Ordering::SeqCst);
        if self.switch.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        self.inner.load(name)
    }

    fn store(&mut self, name: &str, value: &str) -> Result<()> {
        self.check_writes()?;
        self.inner.store(name, value)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.check_writes()?;
        self.inner.remove(name)
    }

    fn apply(&mut self, ops: &[WriteOp]) -> Result<()> {
        self.check_writes()?;
        let at = self.switch.fail_apply_at.load(Ordering::SeqCst);
        if at < ops.len() {
            return Err(StoreError::Unavailable(format!(
                "injected failure at op {} ({})",
                at,
                ops[at].name()
            )));
        }
        self.inner.apply(ops)
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        if self.switch.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        self.inner.entries()
    }
}
