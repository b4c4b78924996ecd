//! Cancellable push-based subscription
//!
//! A one-directional event stream handed out by a store's `subscribe_*`
//! methods. Each received item is a full snapshot, so a consumer that falls
//! behind can always skip ahead to the freshest one.

use tokio::sync::broadcast;

/// Receiving half of a live subscription
///
/// Cancellation is idempotent and local to this handle: it drops the
/// receiver, nothing is delivered afterwards, and the store is unaffected.
/// Dropping the subscription cancels it implicitly.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: Option<broadcast::Receiver<T>>,
}

impl<T: Clone> Subscription<T> {
    pub(crate) fn new(receiver: broadcast::Receiver<T>) -> Self {
        Subscription {
            receiver: Some(receiver),
        }
    }

    /// Wait for the next snapshot
    ///
    /// Returns `None` once the subscription is cancelled or the store side
    /// has gone away. A lagged receiver skips the missed snapshots and
    /// resumes with the next one; only the freshest state matters.
    pub async fn recv(&mut self) -> Option<T> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "subscription lagged, skipping to fresh snapshot");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
            }
        }
    }

    /// Non-blocking variant of [`Self::recv`]
    ///
    /// Returns `None` when no snapshot is pending, the subscription is
    /// cancelled, or the store side has gone away.
    pub fn try_recv(&mut self) -> Option<T> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.try_recv() {
                Ok(snapshot) => return Some(snapshot),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
            }
        }
    }

    /// Cancel the subscription
    ///
    /// Idempotent; after the first call nothing is ever delivered again.
    pub fn cancel(&mut self) {
        self.receiver = None;
    }

    /// Whether the subscription has been cancelled (or closed by the store)
    pub fn is_cancelled(&self) -> bool {
        self.receiver.is_none()
    }
}
