//! Mounted flag

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "is this page still showing" flag
///
/// Flipping it does not abort in-flight requests; it only stops their
/// results from being applied.
#[derive(Debug, Clone)]
pub struct Mounted(Arc<AtomicBool>);

impl Mounted {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for Mounted {
    fn default() -> Self {
        Self::new()
    }
}
