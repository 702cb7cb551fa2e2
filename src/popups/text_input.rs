use super::PopupCloser;
use crate::error::PopupResult;
use crate::modal::{BindableModal, Modal, ModalId, PopupViewModel};
use crate::result::ResultChannel;
use crate::service::PopupService;
use std::sync::Arc;

/// Free text entry; resolves to `None` when cancelled
pub struct TextInputViewModel {
    pub title: String,
    pub message: String,
    pub placeholder: Option<String>,
    result: ResultChannel<Option<String>>,
    closer: PopupCloser,
}

impl TextInputViewModel {
    pub fn new(service: &PopupService, title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            placeholder: None,
            result: ResultChannel::new(),
            closer: PopupCloser::new(service),
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn submit(&self, text: impl Into<String>) -> PopupResult<()> {
        self.result.settle(Some(text.into()))?;
        self.closer.close();
        Ok(())
    }

    pub fn cancel(&self) -> PopupResult<()> {
        self.result.settle(None)?;
        self.closer.close();
        Ok(())
    }
}

impl PopupViewModel for TextInputViewModel {
    type Output = Option<String>;

    fn result_channel(&self) -> &ResultChannel<Option<String>> {
        &self.result
    }
}

#[derive(Default)]
pub struct TextInputModal {
    view_model: Option<Arc<TextInputViewModel>>,
}

impl TextInputModal {
    pub fn view_model(&self) -> Option<&Arc<TextInputViewModel>> {
        self.view_model.as_ref()
    }
}

impl Modal for TextInputModal {
    fn name(&self) -> &str {
        "text-input"
    }

    fn on_appearing(&self, id: ModalId) {
        if let Some(view_model) = &self.view_model {
            view_model.closer.attach(id);
        }
    }
}

impl BindableModal<TextInputViewModel> for TextInputModal {
    fn bind(&mut self, view_model: Arc<TextInputViewModel>) {
        self.view_model = Some(view_model);
    }
}
