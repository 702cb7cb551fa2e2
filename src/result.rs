//! One-shot result channel shared between a popup view-model and its caller
//!
//! A view-model owns a [`ResultChannel`]; the modal settles it when the user finishes
//! interacting and the code that pushed the modal awaits the paired
//! [`PendingResult`]. Resolution is push-driven (no polling) and happens exactly once.

use crate::error::{PopupError, PopupResult};
use log::{debug, warn};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Exactly-once settable value holder
pub struct ResultChannel<T> {
    sender: Mutex<Option<oneshot::Sender<T>>>,
    receiver: Mutex<Option<oneshot::Receiver<T>>>,
}

impl<T: Send + 'static> ResultChannel<T> {
    /// Create a new unsettled channel
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
        }
    }

    /// Store `value` and wake the awaiting caller.
    ///
    /// Fails with [`PopupError::AlreadySettled`] on every call after the first; the
    /// first settlement's value is the one the caller observes.
    pub fn settle(&self, value: T) -> PopupResult<()> {
        let sender = self.sender.lock().take().ok_or(PopupError::AlreadySettled)?;

        if sender.send(value).is_err() {
            // Nobody is listening anymore, the value is simply dropped.
            debug!("Result channel settled after its caller stopped waiting");
        }
        Ok(())
    }

    pub fn is_settled(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Take the future that resolves with the settled value.
    ///
    /// Only one caller may await a channel; later calls resolve immediately with
    /// [`PopupError::AlreadyAwaited`].
    pub fn wait(&self) -> PendingResult<T> {
        PendingResult {
            receiver: self.receiver.lock().take(),
        }
    }

    /// Like [`wait`](Self::wait), but refuses a channel that can no longer deliver a
    /// fresh answer: one already settled fails with [`PopupError::AlreadySettled`],
    /// one already awaited with [`PopupError::AlreadyAwaited`].
    pub fn try_wait(&self) -> PopupResult<PendingResult<T>> {
        if self.is_settled() {
            return Err(PopupError::AlreadySettled);
        }
        let receiver = self.receiver.lock().take().ok_or(PopupError::AlreadyAwaited)?;
        Ok(PendingResult {
            receiver: Some(receiver),
        })
    }
}

impl<T: Send + 'static> Default for ResultChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ResultChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultChannel")
            .field("settled", &self.sender.lock().is_none())
            .field("awaited", &self.receiver.lock().is_none())
            .finish()
    }
}

/// Future half of a [`ResultChannel`]
///
/// Never times out by itself. If the owning channel is dropped without being
/// settled (the modal went away without answering) it resolves with
/// [`PopupError::Unresolved`].
#[must_use = "a pending result does nothing unless awaited"]
pub struct PendingResult<T> {
    receiver: Option<oneshot::Receiver<T>>,
}

impl<T> Future for PendingResult<T> {
    type Output = PopupResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Poll::Ready(Err(PopupError::AlreadyAwaited));
        };

        match Pin::new(receiver).poll(cx) {
            Poll::Ready(Ok(value)) => {
                self.receiver = None;
                Poll::Ready(Ok(value))
            }
            Poll::Ready(Err(_)) => {
                warn!("Popup result channel dropped without being settled");
                self.receiver = None;
                Poll::Ready(Err(PopupError::Unresolved))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_settle_resolves_waiter() {
        let channel = ResultChannel::new();
        let pending = channel.wait();

        channel.settle(42).unwrap();

        assert!(channel.is_settled());
        assert_eq!(pending.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_second_settle_is_rejected_and_first_value_wins() {
        let channel = ResultChannel::new();
        let pending = channel.wait();

        channel.settle("first").unwrap();
        let second = channel.settle("second");

        assert!(matches!(second, Err(PopupError::AlreadySettled)));
        assert_eq!(pending.await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_does_not_resolve_before_settle() {
        let channel = ResultChannel::<u32>::new();
        let mut pending = channel.wait();

        assert!((&mut pending).now_or_never().is_none());

        let timed = tokio::time::timeout(Duration::from_millis(20), &mut pending).await;
        assert!(timed.is_err());

        channel.settle(7).unwrap();
        assert_eq!(pending.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_settle_from_another_task() {
        let channel = std::sync::Arc::new(ResultChannel::new());
        let pending = channel.wait();

        let settler = channel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            settler.settle(String::from("done")).unwrap();
        });

        assert_eq!(pending.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_second_wait_fails() {
        let channel = ResultChannel::<()>::new();
        let _first = channel.wait();

        assert!(matches!(channel.wait().await, Err(PopupError::AlreadyAwaited)));
    }

    #[test]
    fn test_try_wait_rejects_used_channels() {
        let awaited = ResultChannel::<u8>::new();
        let _first = awaited.wait();
        assert!(matches!(awaited.try_wait(), Err(PopupError::AlreadyAwaited)));

        let settled = ResultChannel::<u8>::new();
        settled.settle(1).unwrap();
        assert!(matches!(settled.try_wait(), Err(PopupError::AlreadySettled)));

        let fresh = ResultChannel::<u8>::new();
        assert!(fresh.try_wait().is_ok());
        assert!(matches!(fresh.try_wait(), Err(PopupError::AlreadyAwaited)));
    }

    #[tokio::test]
    async fn test_dropped_channel_reports_unresolved() {
        let channel = ResultChannel::<bool>::new();
        let pending = channel.wait();
        drop(channel);

        assert!(matches!(pending.await, Err(PopupError::Unresolved)));
    }

    #[test]
    fn test_settle_without_waiter_is_ok() {
        let channel = ResultChannel::new();
        drop(channel.wait());

        assert!(channel.settle(1).is_ok());
        assert!(matches!(channel.settle(2), Err(PopupError::AlreadySettled)));
    }
}
