//! In-process popup stack
//!
//! Implements [`PopupNavigation`] without any rendering. Hosts that draw popups
//! themselves (the terminal demo, tests) observe it through listeners. An optional
//! transition delay separates the `Popping` and `Popped` notifications the same way
//! an animated dismissal would.

use super::{
    ListenerId, NavigationEvent, NavigationEventKind, NavigationListener, PopupNavigation,
};
use crate::modal::{ModalHandle, ModalId};
use anyhow::{Result, bail};
use async_trait::async_trait;
use log::{debug, trace};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Push,
    Remove,
}

/// One push or removal request received by the stack
#[derive(Debug, Clone)]
pub struct NavigationRecord {
    pub kind: RecordKind,
    pub modal: ModalId,
    /// Name of the thread the request was made on
    pub thread: Option<String>,
}

pub struct MemoryNavigation {
    stack: Mutex<Vec<ModalHandle>>,
    listeners: Mutex<Vec<(ListenerId, NavigationListener)>>,
    history: Mutex<Vec<NavigationRecord>>,
    next_listener: AtomicU64,
    transition: Duration,
}

impl MemoryNavigation {
    pub fn new() -> Self {
        Self::with_transition(Duration::ZERO)
    }

    /// Stack whose removals take `transition` between `Popping` and `Popped`
    pub fn with_transition(transition: Duration) -> Self {
        Self {
            stack: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            transition,
        }
    }

    /// Every push and removal request received so far, oldest first
    pub fn history(&self) -> Vec<NavigationRecord> {
        self.history.lock().clone()
    }

    pub fn removal_requests(&self) -> Vec<NavigationRecord> {
        self.history
            .lock()
            .iter()
            .filter(|record| record.kind == RecordKind::Remove)
            .cloned()
            .collect()
    }

    pub fn push_requests(&self) -> Vec<NavigationRecord> {
        self.history
            .lock()
            .iter()
            .filter(|record| record.kind == RecordKind::Push)
            .cloned()
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn len(&self) -> usize {
        self.stack.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.lock().is_empty()
    }

    fn record(&self, kind: RecordKind, modal: ModalId) {
        let thread = std::thread::current().name().map(str::to_string);
        self.history.lock().push(NavigationRecord { kind, modal, thread });
    }

    fn contains(&self, modal: &ModalHandle) -> bool {
        self.stack.lock().iter().any(|entry| entry == modal)
    }

    fn emit(&self, kind: NavigationEventKind, modal: &ModalHandle) {
        let event = NavigationEvent {
            kind,
            modal: modal.clone(),
            stack: self.stack(),
        };

        // Listeners may read the stack again, so no lock is held while calling them.
        let listeners: Vec<NavigationListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        trace!(
            "Emitting {:?} for modal {} to {} listeners",
            kind,
            modal.id(),
            listeners.len()
        );
        for listener in listeners {
            listener(&event);
        }
    }
}

impl Default for MemoryNavigation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PopupNavigation for MemoryNavigation {
    async fn push(&self, modal: ModalHandle) -> Result<()> {
        self.record(RecordKind::Push, modal.id());

        {
            let mut stack = self.stack.lock();
            if stack.iter().any(|entry| entry == &modal) {
                bail!("Modal {} is already on the popup stack", modal.id());
            }
            stack.push(modal.clone());
        }

        debug!("Pushed modal {} ({})", modal.id(), modal.name());
        modal.modal().on_appearing(modal.id());
        self.emit(NavigationEventKind::Pushed, &modal);
        Ok(())
    }

    async fn remove(&self, modal: &ModalHandle) -> Result<()> {
        self.record(RecordKind::Remove, modal.id());

        if !self.contains(modal) {
            bail!("Modal {} is not on the popup stack", modal.id());
        }

        self.emit(NavigationEventKind::Popping, modal);

        if !self.transition.is_zero() {
            tokio::time::sleep(self.transition).await;
        }

        {
            let mut stack = self.stack.lock();
            let Some(position) = stack.iter().position(|entry| entry == modal) else {
                bail!("Modal {} left the popup stack during its removal", modal.id());
            };
            stack.remove(position);
        }

        debug!("Removed modal {} ({})", modal.id(), modal.name());
        modal.modal().on_disappearing(modal.id());
        self.emit(NavigationEventKind::Popped, modal);
        Ok(())
    }

    fn stack(&self) -> Vec<ModalHandle> {
        self.stack.lock().clone()
    }

    fn add_listener(&self, listener: NavigationListener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.lock().retain(|(existing, _)| *existing != id);
    }
}
