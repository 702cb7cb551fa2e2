//! UI execution context and detached task failure reporting
//!
//! Every navigation stack mutation runs on a single UI context. [`UiThread`] is the
//! default one: a named OS thread driving a current-thread tokio runtime that runs
//! jobs strictly in submission order.

use crate::error::{PopupError, PopupResult};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use log::{debug, error};
use std::error::Error as _;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc as std_mpsc;
use std::thread::{self, ThreadId};
use tokio::sync::mpsc;

pub const UI_THREAD_NAME: &str = "popup-ui";

pub type UiJob = BoxFuture<'static, ()>;

/// The execution context that owns all visible popup state
pub trait UiDispatcher: Send + Sync + 'static {
    /// Queue `job` to run on the UI context. Never runs it inline.
    fn dispatch(&self, job: UiJob) -> PopupResult<()>;

    /// Whether the calling code is already running on the UI context
    fn is_ui_context(&self) -> bool;
}

pub struct UiThread {
    sender: mpsc::UnboundedSender<UiJob>,
    thread_id: ThreadId,
}

impl UiThread {
    pub fn spawn() -> Result<Self> {
        Self::spawn_named(UI_THREAD_NAME)
    }

    pub fn spawn_named(name: &str) -> Result<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<UiJob>();
        let (ready_tx, ready_rx) = std_mpsc::channel::<std::io::Result<()>>();

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => {
                        let _ = ready_tx.send(Ok(()));
                        runtime
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                runtime.block_on(async move {
                    while let Some(job) = receiver.recv().await {
                        job.await;
                    }
                });
                debug!("UI dispatcher loop finished");
            })
            .with_context(|| format!("Failed to spawn UI thread '{}'", name))?;

        ready_rx
            .recv()
            .context("UI thread exited before starting")?
            .context("Failed to build UI runtime")?;

        debug!("Started UI thread '{}'", name);
        Ok(Self {
            sender,
            thread_id: handle.thread().id(),
        })
    }
}

impl UiDispatcher for UiThread {
    fn dispatch(&self, job: UiJob) -> PopupResult<()> {
        self.sender
            .send(job)
            .map_err(|_| PopupError::DispatcherClosed)
    }

    fn is_ui_context(&self) -> bool {
        thread::current().id() == self.thread_id
    }
}

pub type FailureHandler = Arc<dyn Fn(&PopupError) + Send + Sync>;

/// Unhandled-failure sink for fire-and-forget work
///
/// Failures are always logged; an optional handler lets the application observe
/// them as well.
#[derive(Clone, Default)]
pub struct FailureReporter {
    handler: Option<FailureHandler>,
}

impl FailureReporter {
    pub fn new(handler: FailureHandler) -> Self {
        Self {
            handler: Some(handler),
        }
    }

    pub fn report(&self, failure: &PopupError) {
        error!("Detached popup operation failed: {}", failure);
        let mut cause = failure.source();
        while let Some(source) = cause {
            error!("  caused by: {}", source);
            cause = source.source();
        }
        if let Some(handler) = &self.handler {
            handler(failure);
        }
    }
}

impl fmt::Debug for FailureReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureReporter")
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Run `task` on the UI context without awaiting it. Its failure, or the failure to
/// schedule it at all, goes to `reporter`.
pub fn spawn_detached<F>(dispatcher: &dyn UiDispatcher, reporter: &FailureReporter, task: F)
where
    F: Future<Output = PopupResult<()>> + Send + 'static,
{
    let task_reporter = reporter.clone();
    let job: UiJob = Box::pin(async move {
        if let Err(failure) = task.await {
            task_reporter.report(&failure);
        }
    });

    if let Err(failure) = dispatcher.dispatch(job) {
        reporter.report(&failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_jobs_run_in_order_on_ui_thread() {
        let ui = UiThread::spawn().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = oneshot::channel();

        for index in 0..5 {
            let seen = seen.clone();
            ui.dispatch(Box::pin(async move {
                seen.lock()
                    .push((index, thread::current().name().map(str::to_string)));
            }))
            .unwrap();
        }
        ui.dispatch(Box::pin(async move {
            let _ = done_tx.send(());
        }))
        .unwrap();

        done_rx.await.unwrap();
        let seen = seen.lock();
        assert_eq!(seen.iter().map(|(index, _)| *index).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(seen.iter().all(|(_, name)| name.as_deref() == Some(UI_THREAD_NAME)));
        assert!(!ui.is_ui_context());
    }

    #[tokio::test]
    async fn test_detached_failures_are_reported() {
        let ui = UiThread::spawn().unwrap();
        let (failed_tx, failed_rx) = oneshot::channel();
        let failed_tx = Mutex::new(Some(failed_tx));

        let reporter = FailureReporter::new(Arc::new(move |failure: &PopupError| {
            if let Some(sender) = failed_tx.lock().take() {
                let _ = sender.send(failure.to_string());
            }
        }));

        spawn_detached(&ui, &reporter, async { Err(PopupError::Unresolved) });

        let message = failed_rx.await.unwrap();
        assert_eq!(message, PopupError::Unresolved.to_string());
    }

    #[tokio::test]
    async fn test_is_ui_context_inside_job() {
        let ui = Arc::new(UiThread::spawn().unwrap());
        let (tx, rx) = oneshot::channel();

        let inner = ui.clone();
        ui.dispatch(Box::pin(async move {
            let _ = tx.send(inner.is_ui_context());
        }))
        .unwrap();

        assert!(rx.await.unwrap());
    }
}
