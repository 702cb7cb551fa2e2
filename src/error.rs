//! Error types for popup coordination
//!
//! Synchronization mistakes (double settle, awaiting a result twice) are programming
//! errors and are always surfaced to the caller. Navigation primitive failures carry
//! the underlying `anyhow::Error` as their source.

use crate::modal::ModalId;
use thiserror::Error;

pub type PopupResult<T> = std::result::Result<T, PopupError>;

#[derive(Debug, Error)]
pub enum PopupError {
    /// A result channel was settled a second time
    #[error("result channel has already been settled")]
    AlreadySettled,

    /// The pending result of a channel was requested more than once
    #[error("result channel is already being awaited")]
    AlreadyAwaited,

    /// The channel was dropped (modal dismissed) without ever being settled
    #[error("popup was dismissed without producing a result")]
    Unresolved,

    #[error("failed to remove modal {modal} from the popup stack")]
    RemovalFailure {
        modal: ModalId,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to push modal {modal} onto the popup stack")]
    PushFailure {
        modal: ModalId,
        #[source]
        source: anyhow::Error,
    },

    /// The global popup service was requested before any navigation was bound
    #[error("no popup navigation has been bound to the popup service")]
    NotBound,

    /// The UI execution context has shut down and no longer accepts work
    #[error("UI dispatcher is closed")]
    DispatcherClosed,

    #[error("invalid loader configuration: {0}")]
    InvalidConfig(String),
}
