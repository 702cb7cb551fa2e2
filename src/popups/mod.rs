//! Ready-made result-bearing popups
//!
//! Each view-model settles its result channel before asking the service to close
//! its modal, so the caller is never left waiting on a dismissed popup.

pub mod alert;
pub mod confirm;
pub mod text_input;

pub use alert::{AlertModal, AlertViewModel};
pub use confirm::{ConfirmModal, ConfirmViewModel};
pub use text_input::{TextInputModal, TextInputViewModel};

use crate::modal::ModalId;
use crate::service::{PopupService, WeakPopupService};
use log::debug;
use once_cell::sync::OnceCell;

/// Lets a view-model close the modal it is bound to
#[derive(Default)]
pub struct PopupCloser {
    service: WeakPopupService,
    modal: OnceCell<ModalId>,
}

impl PopupCloser {
    pub fn new(service: &PopupService) -> Self {
        Self {
            service: service.downgrade(),
            modal: OnceCell::new(),
        }
    }

    /// Remember which modal to close; called when the modal appears
    pub fn attach(&self, id: ModalId) {
        if self.modal.set(id).is_err() {
            debug!("Popup closer already attached, ignoring {}", id);
        }
    }

    pub fn modal(&self) -> Option<ModalId> {
        self.modal.get().copied()
    }

    pub fn close(&self) {
        match (self.service.upgrade(), self.modal.get()) {
            (Some(service), Some(id)) => service.close(*id),
            (None, _) => debug!("Popup service gone, nothing to close"),
            (_, None) => debug!("Popup never appeared, nothing to close"),
        }
    }
}
