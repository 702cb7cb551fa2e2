//! Awaitable modal popups over a host navigation stack
//!
//! Push a popup and `.await` its typed result, pop without racing concurrent pops,
//! and show a rotating-status loader around in-flight work.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod launcher;
pub mod loader;
pub mod modal;
pub mod navigation;
pub mod popups;
pub mod result;
pub mod service;

pub use config::{Colour, PopupConfig};
pub use dispatch::{FailureReporter, UiDispatcher, UiThread};
pub use error::{PopupError, PopupResult};
pub use launcher::ModalLauncher;
pub use loader::{LoaderConfig, LoaderModal, LoaderOverlayController, LoaderViewModel};
pub use modal::{BindableModal, Modal, ModalHandle, ModalId, PopupViewModel};
pub use navigation::{
    MemoryNavigation, NavigationEvent, NavigationEventKind, NavigationStackTracker,
    NavigationSubscription, PopupNavigation,
};
pub use result::{PendingResult, ResultChannel};
pub use service::{PopupService, PopupServiceBuilder, WeakPopupService};
