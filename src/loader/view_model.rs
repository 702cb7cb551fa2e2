//! Loader view-model with rotating status reasons
//!
//! Rotation is display-only: it never influences when the overlay closes. The
//! rotation task lives on the UI context, like every other view update.

use super::LoaderConfig;
use crate::config::Colour;
use crate::dispatch::UiDispatcher;
use crate::error::PopupResult;
use log::{debug, trace};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderColours {
    pub loader: Colour,
    pub backdrop: Colour,
    pub text: Colour,
}

#[derive(Debug, Clone)]
pub struct LoaderState {
    pub reasons: Vec<String>,
    pub current_index: usize,
    pub switch_interval: Duration,
    pub colours: LoaderColours,
}

impl LoaderState {
    fn current_reason(&self) -> &str {
        &self.reasons[self.current_index]
    }
}

enum Rotation {
    Idle,
    Running(JoinHandle<()>),
    Stopped,
}

pub struct LoaderViewModel {
    state: Mutex<LoaderState>,
    reason_tx: watch::Sender<String>,
    rotation: Mutex<Rotation>,
}

impl LoaderViewModel {
    pub fn new(config: LoaderConfig) -> Self {
        let state = LoaderState {
            reasons: config.reasons().to_vec(),
            current_index: 0,
            switch_interval: config.switch_interval(),
            colours: LoaderColours {
                loader: config.loader_colour(),
                backdrop: config.backdrop_colour(),
                text: config.text_colour(),
            },
        };
        let (reason_tx, _) = watch::channel(state.current_reason().to_string());

        Self {
            state: Mutex::new(state),
            reason_tx,
            rotation: Mutex::new(Rotation::Idle),
        }
    }

    /// Reason currently on display
    pub fn current_reason(&self) -> String {
        self.state.lock().current_reason().to_string()
    }

    pub fn current_index(&self) -> usize {
        self.state.lock().current_index
    }

    pub fn state(&self) -> LoaderState {
        self.state.lock().clone()
    }

    pub fn colours(&self) -> LoaderColours {
        self.state.lock().colours
    }

    /// Receiver that observes every reason change
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.reason_tx.subscribe()
    }

    /// Start cycling reasons every switch interval on the UI context behind
    /// `dispatcher`. A single reason never rotates, and a stopped loader never
    /// starts again.
    pub fn start_rotation(self: &Arc<Self>, dispatcher: &dyn UiDispatcher) -> PopupResult<()> {
        if self.state.lock().reasons.len() < 2 {
            return Ok(());
        }
        if !matches!(*self.rotation.lock(), Rotation::Idle) {
            return Ok(());
        }

        let view_model = Arc::downgrade(self);
        dispatcher.dispatch(Box::pin(async move {
            if let Some(view_model) = view_model.upgrade() {
                view_model.spawn_rotation();
            }
        }))
    }

    /// Runs on the UI context
    fn spawn_rotation(self: &Arc<Self>) {
        let interval = self.state.lock().switch_interval;
        let mut rotation = self.rotation.lock();
        if !matches!(*rotation, Rotation::Idle) {
            return;
        }

        *rotation = Rotation::Running(tokio::spawn(rotate(Arc::downgrade(self), interval)));
        debug!("Started loader reason rotation every {:?}", interval);
    }

    pub fn stop_rotation(&self) {
        let previous = std::mem::replace(&mut *self.rotation.lock(), Rotation::Stopped);
        if let Rotation::Running(task) = previous {
            task.abort();
            debug!("Stopped loader reason rotation");
        }
    }

    pub fn is_rotating(&self) -> bool {
        match &*self.rotation.lock() {
            Rotation::Running(task) => !task.is_finished(),
            Rotation::Idle | Rotation::Stopped => false,
        }
    }

    fn advance(&self) {
        let reason = {
            let mut state = self.state.lock();
            state.current_index = (state.current_index + 1) % state.reasons.len();
            state.current_reason().to_string()
        };
        trace!("Loader reason switched to '{}'", reason);
        self.reason_tx.send_replace(reason);
    }
}

async fn rotate(view_model: Weak<LoaderViewModel>, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match view_model.upgrade() {
            Some(view_model) => view_model.advance(),
            None => break,
        }
    }
}

impl Drop for LoaderViewModel {
    fn drop(&mut self) {
        if let Rotation::Running(task) = self.rotation.get_mut() {
            task.abort();
        }
    }
}
