use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Single-slot delayed action: scheduling a new action cancels the pending one.
///
/// The action receives the token of its slot, so work that already started
/// is also cancelled by the next `schedule` or by `cancel`.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Must be called from within a Tokio runtime.
    pub fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.replace(Some(token.clone())) {
            previous.cancel();
        }
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => action(token.clone()).await,
            }
        });
    }

    /// Cancels the pending action, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.replace(None) {
            Some(token) => {
                let was_live = !token.is_cancelled();
                token.cancel();
                was_live
            }
            None => false,
        }
    }

    fn replace(&self, next: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    }
}
