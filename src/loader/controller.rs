//! Wraps in-flight work in a loader overlay
//!
//! The overlay is only pushed when the work is still pending at call time. Once
//! pushed, it is closed exactly once on the UI context when the work finishes, even
//! if the wrapping future is dropped early.

use super::{LoaderConfig, LoaderModal, LoaderViewModel};
use crate::modal::{BindableModal, ModalHandle};
use crate::service::PopupService;
use log::debug;
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::Poll;

pub struct LoaderOverlayController {
    service: PopupService,
}

impl LoaderOverlayController {
    pub fn new(service: PopupService) -> Self {
        Self { service }
    }

    /// Await `action` behind a loader overlay and hand back its output unchanged
    pub async fn wrap<F>(&self, action: F, config: LoaderConfig) -> F::Output
    where
        F: Future,
    {
        let mut action = pin!(action);

        if let Poll::Ready(output) = futures::poll!(action.as_mut()) {
            debug!("Wrapped action already complete, skipping loader");
            return output;
        }

        let overlay = self.show(config);
        let output = action.await;
        drop(overlay);
        output
    }

    fn show(&self, config: LoaderConfig) -> Option<LoaderOverlay> {
        let view_model = Arc::new(LoaderViewModel::new(config));

        let mut modal = LoaderModal::default();
        modal.bind(view_model.clone());
        let handle = ModalHandle::new(modal);

        if let Err(failure) = self.service.launcher().present(handle.clone()) {
            self.service.reporter().report(&failure);
            return None;
        }

        if let Err(failure) = view_model.start_rotation(self.service.dispatcher().as_ref()) {
            self.service.reporter().report(&failure);
        }
        debug!("Showing loader {}", handle.id());
        Some(LoaderOverlay {
            service: self.service.clone(),
            handle,
            view_model,
        })
    }
}

/// A pushed loader; dropping it schedules the close
struct LoaderOverlay {
    service: PopupService,
    handle: ModalHandle,
    view_model: Arc<LoaderViewModel>,
}

impl Drop for LoaderOverlay {
    fn drop(&mut self) {
        self.view_model.stop_rotation();
        debug!("Closing loader {}", self.handle.id());
        self.service.close(self.handle.id());
    }
}
