//! Terminal host for the popup stack
//!
//! Listens to navigation events, prints pushed popups, and answers result-bearing
//! popups through blocking dialoguer prompts.

use super::prompts;
use awaitable_popups::loader::LoaderModal;
use awaitable_popups::navigation::{NavigationEvent, NavigationListener};
use awaitable_popups::popups::{AlertModal, ConfirmModal, TextInputModal};
use awaitable_popups::{
    Colour, ModalHandle, NavigationEventKind, NavigationSubscription, PopupNavigation,
};
use colored::{ColoredString, Colorize};
use log::{error, warn};
use std::sync::Arc;
use tokio::runtime::Handle;

pub struct TerminalPresenter {
    _subscription: NavigationSubscription,
}

impl TerminalPresenter {
    pub fn attach(navigation: &Arc<dyn PopupNavigation>, runtime: Handle) -> Self {
        let listener: NavigationListener =
            Arc::new(move |event: &NavigationEvent| match event.kind {
                NavigationEventKind::Pushed => present(&event.modal, &runtime),
                NavigationEventKind::Popped => {
                    println!("{}", format!("[closed {}]", event.modal.name()).dimmed());
                }
                NavigationEventKind::Popping => {}
            });

        Self {
            _subscription: NavigationSubscription::new(navigation, listener),
        }
    }
}

fn paint(text: &str, colour: Colour) -> ColoredString {
    text.truecolor(colour.r, colour.g, colour.b)
}

fn present(modal: &ModalHandle, runtime: &Handle) {
    if let Some(loader) = modal.downcast_ref::<LoaderModal>() {
        let Some(view_model) = loader.view_model() else {
            return;
        };
        let colours = view_model.colours();
        let mut reasons = view_model.subscribe();

        println!("{} {}", paint("⠿", colours.loader).bold(), view_model.current_reason());
        runtime.spawn(async move {
            while reasons.changed().await.is_ok() {
                let reason = reasons.borrow_and_update().clone();
                println!("{} {}", paint("⠿", colours.loader).bold(), reason);
            }
        });
        return;
    }

    if let Some(confirm) = modal.downcast_ref::<ConfirmModal>() {
        let Some(view_model) = confirm.view_model().cloned() else {
            return;
        };
        println!("{}", view_model.title.bold());
        runtime.spawn_blocking(move || {
            let answer = prompts::prompt_confirmation(
                &view_model.message,
                &view_model.accept_label,
                &view_model.decline_label,
            )
            .unwrap_or_else(|e| {
                warn!("Confirmation prompt failed, declining: {}", e);
                false
            });
            if let Err(e) = view_model.respond(answer) {
                error!("Failed to answer confirmation: {}", e);
            }
        });
        return;
    }

    if let Some(alert) = modal.downcast_ref::<AlertModal>() {
        let Some(view_model) = alert.view_model().cloned() else {
            return;
        };
        println!("{}", view_model.title.bold());
        runtime.spawn_blocking(move || {
            let acknowledged =
                prompts::prompt_acknowledge(&view_model.message, &view_model.button_label);
            if let Err(e) = acknowledged {
                warn!("Alert prompt failed: {}", e);
            }
            if let Err(e) = view_model.acknowledge() {
                error!("Failed to acknowledge alert: {}", e);
            }
        });
        return;
    }

    if let Some(input) = modal.downcast_ref::<TextInputModal>() {
        let Some(view_model) = input.view_model().cloned() else {
            return;
        };
        println!("{}", view_model.title.bold());
        runtime.spawn_blocking(move || {
            let answer =
                prompts::prompt_text(&view_model.message, view_model.placeholder.as_deref());
            let outcome = match answer {
                Ok(Some(text)) => view_model.submit(text),
                Ok(None) => view_model.cancel(),
                Err(e) => {
                    warn!("Text prompt failed, cancelling: {}", e);
                    view_model.cancel()
                }
            };
            if let Err(e) = outcome {
                error!("Failed to answer text prompt: {}", e);
            }
        });
        return;
    }

    println!("{}", format!("[{}]", modal.name()).cyan());
}
