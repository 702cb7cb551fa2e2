//! Popup service: the entry point applications talk to
//!
//! A service binds one navigation primitive for its whole lifetime. Applications
//! normally construct it once at startup and pass clones around; [`PopupService::get_instance`]
//! offers a lazily created process-wide instance for hosts that want a global.

use crate::dispatch::{FailureHandler, FailureReporter, UiDispatcher, UiThread, spawn_detached};
use crate::error::{PopupError, PopupResult};
use crate::launcher::ModalLauncher;
use crate::loader::{LoaderConfig, LoaderOverlayController};
use crate::modal::{BindableModal, ModalHandle, ModalId, PopupViewModel};
use crate::navigation::{NavigationStackTracker, PopupNavigation};
use crate::popups::{
    AlertModal, AlertViewModel, ConfirmModal, ConfirmViewModel, TextInputModal,
    TextInputViewModel,
};
use anyhow::Result;
use log::{debug, info};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::{Arc, Weak};

static INSTANCE: OnceCell<PopupService> = OnceCell::new();

#[derive(Clone)]
pub struct PopupService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    navigation: Arc<dyn PopupNavigation>,
    dispatcher: Arc<dyn UiDispatcher>,
    reporter: FailureReporter,
    tracker: NavigationStackTracker,
    launcher: ModalLauncher,
    /// Serialises "check top, claim it, dispatch removal"
    pop_lock: Mutex<()>,
    loader_defaults: LoaderConfig,
}

pub struct PopupServiceBuilder {
    navigation: Arc<dyn PopupNavigation>,
    dispatcher: Option<Arc<dyn UiDispatcher>>,
    reporter: FailureReporter,
    loader_defaults: LoaderConfig,
}

impl PopupServiceBuilder {
    /// Run navigation work on `dispatcher` instead of a dedicated UI thread
    pub fn dispatcher(mut self, dispatcher: Arc<dyn UiDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Observe failures of fire-and-forget operations
    pub fn on_failure(mut self, handler: FailureHandler) -> Self {
        self.reporter = FailureReporter::new(handler);
        self
    }

    pub fn loader_defaults(mut self, config: LoaderConfig) -> Self {
        self.loader_defaults = config;
        self
    }

    pub fn build(self) -> Result<PopupService> {
        let dispatcher = match self.dispatcher {
            Some(dispatcher) => dispatcher,
            None => Arc::new(UiThread::spawn()?),
        };

        let tracker = NavigationStackTracker::attach(self.navigation.clone());
        let launcher = ModalLauncher::new(
            self.navigation.clone(),
            dispatcher.clone(),
            self.reporter.clone(),
        );

        Ok(PopupService {
            inner: Arc::new(ServiceInner {
                navigation: self.navigation,
                dispatcher,
                reporter: self.reporter,
                tracker,
                launcher,
                pop_lock: Mutex::new(()),
                loader_defaults: self.loader_defaults,
            }),
        })
    }
}

impl PopupService {
    pub fn builder(navigation: Arc<dyn PopupNavigation>) -> PopupServiceBuilder {
        PopupServiceBuilder {
            navigation,
            dispatcher: None,
            reporter: FailureReporter::default(),
            loader_defaults: LoaderConfig::default(),
        }
    }

    pub fn new(navigation: Arc<dyn PopupNavigation>) -> Result<Self> {
        Self::builder(navigation).build()
    }

    /// Process-wide service. The first call that supplies a navigation binds it;
    /// bindings passed afterwards are ignored.
    ///
    /// Construction is serialised by the cell's own initialisation lock. Pops are
    /// serialised separately by the instance's pop lock; the two never nest, so
    /// keeping them apart cannot change ordering.
    pub fn get_instance(navigation: Option<Arc<dyn PopupNavigation>>) -> Result<Self> {
        if let Some(service) = INSTANCE.get() {
            if navigation.is_some() {
                debug!("Popup service already bound, ignoring new navigation");
            }
            return Ok(service.clone());
        }

        let service = INSTANCE.get_or_try_init(|| match navigation {
            Some(navigation) => {
                info!("Creating global popup service");
                Self::new(navigation)
            }
            None => Err(PopupError::NotBound.into()),
        })?;
        Ok(service.clone())
    }

    pub fn downgrade(&self) -> WeakPopupService {
        WeakPopupService {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn navigation(&self) -> &Arc<dyn PopupNavigation> {
        &self.inner.navigation
    }

    pub fn reporter(&self) -> &FailureReporter {
        &self.inner.reporter
    }

    pub(crate) fn dispatcher(&self) -> &Arc<dyn UiDispatcher> {
        &self.inner.dispatcher
    }

    pub(crate) fn launcher(&self) -> &ModalLauncher {
        &self.inner.launcher
    }

    pub fn loader_defaults(&self) -> &LoaderConfig {
        &self.inner.loader_defaults
    }

    /// Topmost modal that is not already being removed
    pub fn current_top(&self) -> Option<ModalHandle> {
        self.inner.tracker.current_top()
    }

    /// Remove the current top modal, if any.
    ///
    /// Fire-and-forget: the removal runs on the UI context and its failure goes to the
    /// failure reporter. Calling this while a pop is already in flight, or with an
    /// empty stack, does nothing.
    pub fn pop(&self) {
        let _guard = self.inner.pop_lock.lock();

        let Some(top) = self.inner.tracker.begin_pop() else {
            debug!("Nothing to pop");
            return;
        };

        debug!("Popping modal {} ({})", top.id(), top.name());
        self.dispatch_removal(top);
    }

    /// Remove a specific modal. Returns `false` if it is not on the stack or already
    /// being removed.
    pub fn dismiss(&self, modal: &ModalHandle) -> bool {
        let _guard = self.inner.pop_lock.lock();

        if !self.inner.tracker.begin_removal(modal) {
            debug!("Modal {} is not dismissable", modal.id());
            return false;
        }

        self.dispatch_removal(modal.clone());
        true
    }

    /// Close the modal pushed under `id`, deciding on the UI context.
    ///
    /// Work queued to the UI context earlier (such as the push of that very modal)
    /// completes first.
    pub fn close(&self, id: ModalId) {
        let inner = self.inner.clone();

        spawn_detached(
            self.inner.dispatcher.as_ref(),
            &self.inner.reporter,
            async move {
                let modal = inner
                    .navigation
                    .stack()
                    .into_iter()
                    .find(|modal| modal.id() == id);

                let Some(modal) = modal else {
                    debug!("Modal {} already gone, nothing to close", id);
                    return Ok(());
                };

                let claimed = {
                    let _guard = inner.pop_lock.lock();
                    inner.tracker.begin_removal(&modal)
                };
                if !claimed {
                    debug!("Modal {} is already being removed", id);
                    return Ok(());
                }

                remove_claimed(inner, modal).await
            },
        );
    }

    fn dispatch_removal(&self, modal: ModalHandle) {
        let inner = self.inner.clone();
        spawn_detached(
            self.inner.dispatcher.as_ref(),
            &self.inner.reporter,
            remove_claimed(inner, modal),
        );
    }

    /// Push a `Default`-constructed `M` bound to `view_model` and wait for its result
    pub async fn push<VM, M>(&self, view_model: Arc<VM>) -> PopupResult<VM::Output>
    where
        VM: PopupViewModel,
        M: BindableModal<VM> + Default,
    {
        self.inner.launcher.push::<VM, M>(view_model).await
    }

    /// Push the modal built by `factory` bound to `view_model` and wait for its result
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
        self.inner.launcher.push_with(view_model, factory).await
    }

    /// Show a loader while `action` runs. Closing the loader is scheduled on the UI
    /// context before the action's outcome, success or failure, is handed back.
    pub async fn wrap_in_loader<F, E>(&self, action: F, config: LoaderConfig) -> Result<(), E>
    where
        F: Future<Output = Result<(), E>>,
    {
        self.wrap_returnable_in_loader(action, config).await
    }

    pub async fn wrap_returnable_in_loader<F, T>(&self, action: F, config: LoaderConfig) -> T
    where
        F: Future<Output = T>,
    {
        LoaderOverlayController::new(self.clone())
            .wrap(action, config)
            .await
    }

    /// Ask a yes/no question
    pub async fn confirm(&self, title: &str, message: &str) -> PopupResult<bool> {
        let view_model = Arc::new(ConfirmViewModel::new(self, title, message));
        self.push::<_, ConfirmModal>(view_model).await
    }

    /// Show a message and wait until it is acknowledged
    pub async fn alert(&self, title: &str, message: &str) -> PopupResult<()> {
        let view_model = Arc::new(AlertViewModel::new(self, title, message));
        self.push::<_, AlertModal>(view_model).await
    }

    /// Ask for a line of text; `None` if the user cancelled
    pub async fn prompt_text(&self, title: &str, message: &str) -> PopupResult<Option<String>> {
        let view_model = Arc::new(TextInputViewModel::new(self, title, message));
        self.push::<_, TextInputModal>(view_model).await
    }
}

/// Remove a modal already claimed in the tracker.
///
/// A failed removal is only swallowed when the tracker ends up with no top at all;
/// otherwise it surfaces as [`PopupError::RemovalFailure`].
async fn remove_claimed(inner: Arc<ServiceInner>, modal: ModalHandle) -> PopupResult<()> {
    match inner.navigation.remove(&modal).await {
        Ok(()) => Ok(()),
        Err(source) => {
            inner.tracker.abort_removal(&modal);
            if inner.tracker.current_top().is_none() {
                debug!("Removal of {} failed with nothing left to pop: {:#}", modal.id(), source);
                return Ok(());
            }
            Err(PopupError::RemovalFailure {
                modal: modal.id(),
                source,
            })
        }
    }
}

/// Non-owning reference held by view-models that close their own modal
#[derive(Clone, Default)]
pub struct WeakPopupService {
    inner: Weak<ServiceInner>,
}

impl WeakPopupService {
    pub fn upgrade(&self) -> Option<PopupService> {
        self.inner.upgrade().map(|inner| PopupService { inner })
    }
}
