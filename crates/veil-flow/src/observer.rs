//! # Tokens-Ready Observer
//!
//! Zero-argument notification fired when a credential batch reaches its
//! finished state. The flow notifies exactly once per arrival at
//! finished; re-driving an already-finished batch does not re-notify.

/// Observer of batch completion.
pub trait TokensReadyObserver: Send + Sync {
    /// A batch of unblinded tokens is ready to spend.
    fn tokens_ready(&self);
}

/// Observer that ignores notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TokensReadyObserver for NoopObserver {
    fn tokens_ready(&self) {}
}
