use super::LoaderViewModel;
use crate::modal::{BindableModal, Modal, ModalId};
use std::sync::Arc;

/// The loading overlay page
#[derive(Default)]
pub struct LoaderModal {
    view_model: Option<Arc<LoaderViewModel>>,
}

impl LoaderModal {
    pub fn view_model(&self) -> Option<&Arc<LoaderViewModel>> {
        self.view_model.as_ref()
    }
}

impl Modal for LoaderModal {
    fn name(&self) -> &str {
        "loader"
    }

    fn on_disappearing(&self, _id: ModalId) {
        if let Some(view_model) = &self.view_model {
            view_model.stop_rotation();
        }
    }
}

impl BindableModal<LoaderViewModel> for LoaderModal {
    fn bind(&mut self, view_model: Arc<LoaderViewModel>) {
        self.view_model = Some(view_model);
    }
}
