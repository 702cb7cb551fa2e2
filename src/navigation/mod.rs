//! Navigation primitive contract and the stack-top tracker built on it
//!
//! The host toolkit owns the actual popup stack. This crate only needs to push and
//! remove modals, read the stack, and observe the three mutation notifications.

pub mod memory;
pub mod tracker;

pub use memory::{MemoryNavigation, NavigationRecord, RecordKind};
pub use tracker::NavigationStackTracker;

use crate::modal::ModalHandle;
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::sync::{Arc, Weak};

/// Stack mutation notifications, delivered in the order the primitive applies them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEventKind {
    /// A removal is about to start; the modal is still on the stack
    Popping,
    /// The modal has left the stack
    Popped,
    /// The modal has been added to the stack
    Pushed,
}

#[derive(Debug, Clone)]
pub struct NavigationEvent {
    pub kind: NavigationEventKind,
    /// The modal being pushed or removed
    pub modal: ModalHandle,
    /// Stack snapshot (bottom to top) at the moment the event was raised
    pub stack: Vec<ModalHandle>,
}

pub type NavigationListener = Arc<dyn Fn(&NavigationEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The popup stack provided by the host UI toolkit
#[async_trait]
pub trait PopupNavigation: Send + Sync + 'static {
    /// Push `modal` on top of the stack
    async fn push(&self, modal: ModalHandle) -> Result<()>;

    /// Remove `modal` from the stack, wherever it is
    async fn remove(&self, modal: &ModalHandle) -> Result<()>;

    /// Current stack, bottom to top
    fn stack(&self) -> Vec<ModalHandle>;

    fn add_listener(&self, listener: NavigationListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);
}

/// Scoped listener registration; dropping it unregisters the listener
#[must_use = "dropping a subscription unregisters its listener"]
pub struct NavigationSubscription {
    navigation: Weak<dyn PopupNavigation>,
    id: ListenerId,
}

impl NavigationSubscription {
    pub fn new(navigation: &Arc<dyn PopupNavigation>, listener: NavigationListener) -> Self {
        let id = navigation.add_listener(listener);
        debug!("Registered navigation listener {:?}", id);
        Self {
            navigation: Arc::downgrade(navigation),
            id,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for NavigationSubscription {
    fn drop(&mut self) {
        if let Some(navigation) = self.navigation.upgrade() {
            navigation.remove_listener(self.id);
            debug!("Unregistered navigation listener {:?}", self.id);
        }
    }
}
