use super::PopupCloser;
use crate::error::PopupResult;
use crate::modal::{BindableModal, Modal, ModalId, PopupViewModel};
use crate::result::ResultChannel;
use crate::service::PopupService;
use std::sync::Arc;

/// Two-button question answered with `true` (accept) or `false` (decline)
pub struct ConfirmViewModel {
    pub title: String,
    pub message: String,
    pub accept_label: String,
    pub decline_label: String,
    result: ResultChannel<bool>,
    closer: PopupCloser,
}

impl ConfirmViewModel {
    pub fn new(service: &PopupService, title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            accept_label: "Yes".to_string(),
            decline_label: "No".to_string(),
            result: ResultChannel::new(),
            closer: PopupCloser::new(service),
        }
    }

    pub fn with_labels(mut self, accept: &str, decline: &str) -> Self {
        self.accept_label = accept.to_string();
        self.decline_label = decline.to_string();
        self
    }

    pub fn respond(&self, accepted: bool) -> PopupResult<()> {
        self.result.settle(accepted)?;
        self.closer.close();
        Ok(())
    }
}

impl PopupViewModel for ConfirmViewModel {
    type Output = bool;

    fn result_channel(&self) -> &ResultChannel<bool> {
        &self.result
    }
}

#[derive(Default)]
pub struct ConfirmModal {
    view_model: Option<Arc<ConfirmViewModel>>,
}

impl ConfirmModal {
    pub fn view_model(&self) -> Option<&Arc<ConfirmViewModel>> {
        self.view_model.as_ref()
    }
}

impl Modal for ConfirmModal {
    fn name(&self) -> &str {
        "confirm"
    }

    fn on_appearing(&self, id: ModalId) {
        if let Some(view_model) = &self.view_model {
            view_model.closer.attach(id);
        }
    }
}

impl BindableModal<ConfirmViewModel> for ConfirmModal {
    fn bind(&mut self, view_model: Arc<ConfirmViewModel>) {
        self.view_model = Some(view_model);
    }
}
