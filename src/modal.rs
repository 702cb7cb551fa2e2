//! Modal abstractions shared by the launcher, the tracker and concrete popups
//!
//! A concrete popup is a pair of a modal (what the host displays) and a view-model
//! (the state the modal binds to). Result-bearing view-models expose a
//! [`ResultChannel`] through [`PopupViewModel`].

use crate::result::ResultChannel;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MODAL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a pushed modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(u64);

impl ModalId {
    fn next() -> Self {
        Self(NEXT_MODAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A displayable modal page
///
/// Lifecycle hooks are invoked by the navigation primitive on the UI context.
pub trait Modal: Send + Sync + 'static {
    /// Human readable name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once the modal is on the stack, with the identity it was pushed under
    fn on_appearing(&self, _id: ModalId) {}

    fn on_disappearing(&self, _id: ModalId) {}
}

/// Capability of a modal to bind a view-model before it is pushed
pub trait BindableModal<VM>: Modal {
    fn bind(&mut self, view_model: Arc<VM>);
}

/// A view-model that reports a typed result back to the code that pushed its modal
pub trait PopupViewModel: Send + Sync + 'static {
    type Output: Send + 'static;

    fn result_channel(&self) -> &ResultChannel<Self::Output>;
}

/// Non-owning-in-spirit reference to a pushed modal
///
/// The navigation primitive owns the stack; handles are cheap clones compared by
/// [`ModalId`].
#[derive(Clone)]
pub struct ModalHandle {
    id: ModalId,
    modal: Arc<dyn Modal>,
    any: Arc<dyn Any + Send + Sync>,
}

impl ModalHandle {
    pub fn new<M: Modal>(modal: M) -> Self {
        let modal = Arc::new(modal);
        Self {
            id: ModalId::next(),
            modal: modal.clone(),
            any: modal,
        }
    }

    pub fn id(&self) -> ModalId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.modal.name()
    }

    pub fn modal(&self) -> &dyn Modal {
        self.modal.as_ref()
    }

    /// Borrow the concrete modal if it is of type `M`
    pub fn downcast_ref<M: Modal>(&self) -> Option<&M> {
        self.any.downcast_ref::<M>()
    }

    pub fn is<M: Modal>(&self) -> bool {
        self.any.is::<M>()
    }
}

impl PartialEq for ModalHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModalHandle {}

impl fmt::Debug for ModalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalHandle")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
