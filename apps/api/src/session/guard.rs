//! At most one export in flight per document.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared busy flag for one document's exports.
#[derive(Debug, Clone, Default)]
pub struct ExportSlot(Arc<AtomicBool>);

impl ExportSlot {
    /// Claims the slot, or returns `None` if another export holds it.
    pub fn try_acquire(&self) -> Option<ExportGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard(Arc::clone(&self.0)))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the slot on drop, including when the export fails or panics.
#[derive(Debug)]
pub struct ExportGuard(Arc<AtomicBool>);

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
