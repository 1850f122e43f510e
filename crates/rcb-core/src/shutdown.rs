use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Cooperative "shutdown requested" flag shared between the signal listener and the supervisor.
///
/// Cloning is cheap; all clones observe the same flag. The flag is set at most once and never reset:
/// a process supervises exactly one worker and exits afterwards.
///
/// Besides the plain flag, the shutdown carries a [`CancellationToken`] so blocking reads can be
/// raced against it instead of only polling between reads.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every waiter.
    ///
    /// Returns `true` only for the call that actually flipped the flag.
    pub fn request(&self) -> bool {
        let first = !self.inner.requested.swap(true, Ordering::SeqCst);
        self.inner.token.cancel();
        first
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Completes once shutdown has been requested.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.inner.token.cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.inner.token.clone()
    }
}
