use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "a programmatic seek is in progress" flag.
///
/// Cloning yields another handle to the same flag, so an audio thread can
/// observe seeks made by the session.
#[derive(Debug, Clone, Default)]
pub struct SeekFlag {
    seeking: Arc<AtomicBool>,
}

impl SeekFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking.load(Ordering::Acquire)
    }

    /// Raises the flag until the returned guard is dropped.
    pub fn raise(&self) -> SeekGuard {
        self.seeking.store(true, Ordering::Release);
        SeekGuard {
            seeking: Arc::clone(&self.seeking),
        }
    }
}

/// Lowers the seek flag on drop.
#[derive(Debug)]
pub struct SeekGuard {
    seeking: Arc<AtomicBool>,
}

impl Drop for SeekGuard {
    fn drop(&mut self) {
        self.seeking.store(false, Ordering::Release);
    }
}
