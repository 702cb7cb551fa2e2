use super::PopupCloser;
use crate::error::PopupResult;
use crate::modal::{BindableModal, Modal, ModalId, PopupViewModel};
use crate::result::ResultChannel;
use crate::service::PopupService;
use std::sync::Arc;

/// Single-button message
pub struct AlertViewModel {
    pub title: String,
    pub message: String,
    pub button_label: String,
    result: ResultChannel<()>,
    closer: PopupCloser,
}

impl AlertViewModel {
    pub fn new(service: &PopupService, title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            button_label: "OK".to_string(),
            result: ResultChannel::new(),
            closer: PopupCloser::new(service),
        }
    }

    pub fn acknowledge(&self) -> PopupResult<()> {
        self.result.settle(())?;
        self.closer.close();
        Ok(())
    }
}

impl PopupViewModel for AlertViewModel {
    type Output = ();

    fn result_channel(&self) -> &ResultChannel<()> {
        &self.result
    }
}

#[derive(Default)]
pub struct AlertModal {
    view_model: Option<Arc<AlertViewModel>>,
}

impl AlertModal {
    pub fn view_model(&self) -> Option<&Arc<AlertViewModel>> {
        self.view_model.as_ref()
    }
}

impl Modal for AlertModal {
    fn name(&self) -> &str {
        "alert"
    }

    fn on_appearing(&self, id: ModalId) {
        if let Some(view_model) = &self.view_model {
            view_model.closer.attach(id);
        }
    }
}

impl BindableModal<AlertViewModel> for AlertModal {
    fn bind(&mut self, view_model: Arc<AlertViewModel>) {
        self.view_model = Some(view_model);
    }
}
