use std::sync::Mutex;

/// Counters for external measurement runs within one workflow.
pub struct RunMetrics {
    inner: Mutex<Counters>,
}

struct Counters {
    completed: usize,
    failed: usize,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters {
                completed: 0,
                failed: 0,
            }),
        }
    }

    pub fn record_completed(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.completed += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.failed += 1;
        }
    }

    /// Returns `(completed, failed)` run counts.
    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(counters) = self.inner.lock() {
            (counters.completed, counters.failed)
        } else {
            (0, 0)
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}
