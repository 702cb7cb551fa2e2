//! Pushes bound modals and hands back their typed results

use crate::dispatch::{FailureReporter, UiDispatcher};
use crate::error::{PopupError, PopupResult};
use crate::modal::{BindableModal, ModalHandle, PopupViewModel};
use crate::navigation::PopupNavigation;
use log::debug;
use std::sync::Arc;
use tokio::sync::oneshot;

#[derive(Clone)]
pub struct ModalLauncher {
    navigation: Arc<dyn PopupNavigation>,
    dispatcher: Arc<dyn UiDispatcher>,
    reporter: FailureReporter,
}

impl ModalLauncher {
    pub fn new(
        navigation: Arc<dyn PopupNavigation>,
        dispatcher: Arc<dyn UiDispatcher>,
        reporter: FailureReporter,
    ) -> Self {
        Self {
            navigation,
            dispatcher,
            reporter,
        }
    }

    /// Build a modal with `factory`, bind `view_model` to it, push it, and wait for
    /// the view-model's result channel to settle.
    ///
    /// The push is dispatched to the UI context and not awaited for its transition,
    /// but a failed push resolves the returned future with
    /// [`PopupError::PushFailure`]. A modal that is dismissed without settling
    /// resolves it with [`PopupError::Unresolved`] once its view-model is dropped.
    ///
    /// A view-model whose channel is already settled or awaited is rejected before
    /// anything is pushed.
    pub async fn push_with<VM, M, F>(
        &self,
        view_model: Arc<VM>,
        factory: F,
    ) -> PopupResult<VM::Output>
    where
        VM: PopupViewModel,
        M: BindableModal<VM>,
        F: FnOnce() -> M,
    {
        let mut pending = view_model.result_channel().try_wait()?;

        let mut modal = factory();
        modal.bind(view_model);
        let handle = ModalHandle::new(modal);
        debug!("Launching modal {} ({})", handle.id(), handle.name());

        let mut pushed = self.present(handle)?;

        tokio::select! {
            biased;
            outcome = &mut pushed => {
                if let Ok(Err(failure)) = outcome {
                    return Err(failure);
                }
            }
            result = &mut pending => return result,
        }

        pending.await
    }

    pub async fn push<VM, M>(&self, view_model: Arc<VM>) -> PopupResult<VM::Output>
    where
        VM: PopupViewModel,
        M: BindableModal<VM> + Default,
    {
        self.push_with(view_model, M::default).await
    }

    /// Dispatch a push of `handle` to the UI context.
    ///
    /// The returned receiver yields the push outcome; failures are also sent to the
    /// failure reporter so they stay observable when nobody reads the receiver.
    pub(crate) fn present(
        &self,
        handle: ModalHandle,
    ) -> PopupResult<oneshot::Receiver<PopupResult<()>>> {
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let navigation = self.navigation.clone();
        let reporter = self.reporter.clone();

        self.dispatcher.dispatch(Box::pin(async move {
            let modal = handle.id();
            let outcome = navigation
                .push(handle.clone())
                .await
                .map_err(|source| PopupError::PushFailure { modal, source });

            if let Err(failure) = &outcome {
                reporter.report(failure);
            }
            // The view-model must outlive the outcome, or a failed push would look
            // like an unanswered popup to the caller.
            let _ = outcome_tx.send(outcome);
            drop(handle);
        }))?;

        Ok(outcome_rx)
    }
}
