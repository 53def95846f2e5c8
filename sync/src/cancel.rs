//! Cooperative cancellation for backfill loops.
//!
//! A [`CancelController`] is held by whoever owns the sync lifecycle
//! (e.g. the wallet-disconnect path); each backfill gets a [`CancelToken`]
//! and polls it between page fetches. Cancellation never tears a dispatch:
//! the store reflects only fully-completed prior batches.

use tokio::sync::watch;

/// Triggers cancellation for every token handed out.
pub struct CancelController {
    tx: watch::Sender<bool>,
}

impl CancelController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Get a token that observes this controller.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal cancellation to every outstanding token.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for CancelController {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheap, cloneable view of the cancellation state.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// A token that never cancels, for callers without a lifecycle owner.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        // The sender drops here; the receiver keeps reporting the last
        // value, which stays `false` forever.
        Self { rx }
    }
}
