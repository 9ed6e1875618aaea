use std::sync::atomic::{AtomicBool, Ordering};

/// Single-slot guard serializing merge runs. A second invocation observed
/// while the slot is taken is a silent no-op for the caller, not queued and
/// not an error.
#[derive(Debug, Default)]
pub struct MergeGuard {
    in_progress: AtomicBool,
}

impl MergeGuard {
    pub fn new() -> Self {
        Self {
            in_progress: AtomicBool::new(false),
        }
    }

    /// Claims the slot. Returns None when a run is already in progress. The
    /// token releases the slot on drop, covering error and panic exits.
    pub fn try_acquire(&self) -> Option<MergeToken<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| MergeToken { guard: self })
    }

    pub fn is_held(&self) -> bool {
        self.in_progress.load(Ordering::Relaxed)
    }
}

pub struct MergeToken<'a> {
    guard: &'a MergeGuard,
}

impl Drop for MergeToken<'_> {
    fn drop(&mut self) {
        self.guard.in_progress.store(false, Ordering::Release);
    }
}
