//! Cached view of the topmost stable modal
//!
//! The navigation primitive is the source of truth; the tracker only caches its
//! final element. While a removal is in flight the cached top is cleared, so a second
//! pop sees "nothing to pop" instead of targeting a modal that is already leaving.

use super::{
    NavigationEvent, NavigationEventKind, NavigationListener, NavigationSubscription,
    PopupNavigation,
};
use crate::modal::{ModalHandle, ModalId};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Weak};

#[derive(Debug, Default)]
struct TrackerState {
    top: Option<ModalHandle>,
    /// Modals whose removal has started but not yet been confirmed
    in_flight: HashSet<ModalId>,
}

impl TrackerState {
    fn refresh(&mut self, stack: &[ModalHandle]) {
        self.in_flight
            .retain(|id| stack.iter().any(|modal| modal.id() == *id));

        self.top = match stack.last() {
            Some(last) if !self.in_flight.contains(&last.id()) => Some(last.clone()),
            _ => None,
        };
    }

    fn apply(&mut self, event: &NavigationEvent, live_stack: &[ModalHandle]) {
        match event.kind {
            NavigationEventKind::Popping => {
                self.in_flight.insert(event.modal.id());
                self.top = None;
            }
            NavigationEventKind::Popped => {
                self.in_flight.remove(&event.modal.id());
                self.refresh(live_stack);
            }
            NavigationEventKind::Pushed => self.refresh(live_stack),
        }
    }
}

pub struct NavigationStackTracker {
    state: Arc<Mutex<TrackerState>>,
    navigation: Arc<dyn PopupNavigation>,
    _subscription: NavigationSubscription,
}

impl NavigationStackTracker {
    /// Start observing `navigation`. The listener is unregistered when the tracker is
    /// dropped.
    pub fn attach(navigation: Arc<dyn PopupNavigation>) -> Self {
        let state = Arc::new(Mutex::new(TrackerState::default()));

        let listener_state = Arc::downgrade(&state);
        let listener_navigation = Arc::downgrade(&navigation);
        let listener: NavigationListener = Arc::new(move |event: &NavigationEvent| {
            Self::on_event(&listener_state, &listener_navigation, event);
        });
        let subscription = NavigationSubscription::new(&navigation, listener);

        // Anything pushed before the subscription existed.
        state.lock().refresh(&navigation.stack());

        Self {
            state,
            navigation,
            _subscription: subscription,
        }
    }

    fn on_event(
        state: &Weak<Mutex<TrackerState>>,
        navigation: &Weak<dyn PopupNavigation>,
        event: &NavigationEvent,
    ) {
        let Some(state) = state.upgrade() else {
            return;
        };

        let live_stack = match navigation.upgrade() {
            Some(navigation) => navigation.stack(),
            None => event.stack.clone(),
        };

        let mut state = state.lock();
        state.apply(event, &live_stack);
        debug!(
            "Popup stack {:?} for {}: top is now {:?}",
            event.kind,
            event.modal.id(),
            state.top.as_ref().map(ModalHandle::id)
        );
    }

    /// Topmost modal that is not being removed, if any
    pub fn current_top(&self) -> Option<ModalHandle> {
        self.state.lock().top.clone()
    }

    /// Claim the current top for removal.
    ///
    /// Returns `None` when the stack is empty or a removal of the top is already in
    /// flight. The top stays cleared until the primitive confirms the removal.
    pub fn begin_pop(&self) -> Option<ModalHandle> {
        let mut state = self.state.lock();
        let top = state.top.take()?;
        state.in_flight.insert(top.id());
        Some(top)
    }

    /// Claim a specific modal for removal.
    ///
    /// Returns `false` if the modal is not on the stack or is already being removed.
    pub fn begin_removal(&self, modal: &ModalHandle) -> bool {
        let stack = self.navigation.stack();
        let mut state = self.state.lock();

        if state.in_flight.contains(&modal.id()) || !stack.contains(modal) {
            return false;
        }

        state.in_flight.insert(modal.id());
        if state.top.as_ref() == Some(modal) {
            state.top = None;
        }
        true
    }

    /// Forget a removal that did not happen and resynchronise with the primitive
    pub fn abort_removal(&self, modal: &ModalHandle) {
        let stack = self.navigation.stack();
        let mut state = self.state.lock();
        state.in_flight.remove(&modal.id());
        state.refresh(&stack);
    }

    pub fn is_removing(&self, modal: &ModalHandle) -> bool {
        self.state.lock().in_flight.contains(&modal.id())
    }
}
