//! Integration tests for pushing, popping and awaiting popups through the service

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use awaitable_popups::navigation::{ListenerId, NavigationListener};
use awaitable_popups::popups::{AlertModal, ConfirmModal, TextInputModal};
use awaitable_popups::{
    BindableModal, MemoryNavigation, Modal, ModalHandle, PopupError, PopupNavigation,
    PopupService, PopupViewModel, ResultChannel,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct Page;
impl Modal for Page {}

#[derive(Default)]
struct AnswerViewModel {
    result: ResultChannel<i32>,
}

impl PopupViewModel for AnswerViewModel {
    type Output = i32;

    fn result_channel(&self) -> &ResultChannel<i32> {
        &self.result
    }
}

#[derive(Default)]
struct AnswerModal {
    view_model: Option<Arc<AnswerViewModel>>,
}

impl AnswerModal {
    /// What a button press in the real page would do
    fn user_answers(&self, value: i32) -> Result<(), PopupError> {
        match &self.view_model {
            Some(view_model) => view_model.result_channel().settle(value),
            None => Err(PopupError::Unresolved),
        }
    }
}

impl Modal for AnswerModal {}

impl BindableModal<AnswerViewModel> for AnswerModal {
    fn bind(&mut self, view_model: Arc<AnswerViewModel>) {
        self.view_model = Some(view_model);
    }
}

/// Stack whose removals always fail (optionally after really removing the modal)
/// and which can refuse pushes
struct FailingNavigation {
    inner: MemoryNavigation,
    remove_anyway: bool,
    reject_push: bool,
}

#[async_trait]
impl PopupNavigation for FailingNavigation {
    async fn push(&self, modal: ModalHandle) -> Result<()> {
        if self.reject_push {
            return Err(anyhow!("host refused to show modal {}", modal.id()));
        }
        self.inner.push(modal).await
    }

    async fn remove(&self, modal: &ModalHandle) -> Result<()> {
        if self.remove_anyway {
            self.inner.remove(modal).await?;
        }
        Err(anyhow!("host refused to remove modal {}", modal.id()))
    }

    fn stack(&self) -> Vec<ModalHandle> {
        self.inner.stack()
    }

    fn add_listener(&self, listener: NavigationListener) -> ListenerId {
        self.inner.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner.remove_listener(id)
    }
}

async fn wait_for_ui() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

fn recording_service(
    navigation: Arc<dyn PopupNavigation>,
) -> (PopupService, Arc<Mutex<Vec<String>>>) {
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = failures.clone();
    let service = PopupService::builder(navigation)
        .on_failure(Arc::new(move |failure: &PopupError| {
            sink.lock().push(failure.to_string());
        }))
        .build()
        .unwrap();
    (service, failures)
}

#[tokio::test]
async fn test_push_returns_settled_value() {
    let navigation = Arc::new(MemoryNavigation::new());
    let service = PopupService::new(navigation.clone()).unwrap();

    let task = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .push::<AnswerViewModel, AnswerModal>(Arc::new(AnswerViewModel::default()))
                .await
        })
    };

    wait_for_ui().await;
    assert!(!task.is_finished());

    let top = service.current_top().expect("modal should be on top");
    top.downcast_ref::<AnswerModal>().unwrap().user_answers(42).unwrap();

    assert_eq!(task.await.unwrap().unwrap(), 42);
}

#[tokio::test]
async fn test_second_settle_fails_and_first_value_wins() {
    let navigation = Arc::new(MemoryNavigation::new());
    let service = PopupService::new(navigation.clone()).unwrap();
    let view_model = Arc::new(AnswerViewModel::default());

    let task = {
        let service = service.clone();
        let view_model = view_model.clone();
        tokio::spawn(async move { service.push::<_, AnswerModal>(view_model).await })
    };
    wait_for_ui().await;

    view_model.result_channel().settle(1).unwrap();
    assert!(matches!(
        view_model.result_channel().settle(2),
        Err(PopupError::AlreadySettled)
    ));
    assert_eq!(task.await.unwrap().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pops_remove_once() {
    let navigation = Arc::new(MemoryNavigation::with_transition(Duration::from_millis(100)));
    let service = PopupService::new(navigation.clone()).unwrap();
    navigation.push(ModalHandle::new(Page)).await.unwrap();

    let poppers: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            std::thread::spawn(move || service.pop())
        })
        .collect();
    for popper in poppers {
        popper.join().unwrap();
    }

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(navigation.removal_requests().len(), 1);
    assert!(navigation.is_empty());
    assert!(service.current_top().is_none());
}

#[tokio::test]
async fn test_pop_during_transition_is_noop() {
    let navigation = Arc::new(MemoryNavigation::with_transition(Duration::from_millis(100)));
    let service = PopupService::new(navigation.clone()).unwrap();
    let below = ModalHandle::new(Page);
    navigation.push(below.clone()).await.unwrap();
    navigation.push(ModalHandle::new(Page)).await.unwrap();

    service.pop();
    wait_for_ui().await;
    // The first removal is still animating, so the second pop must not target `below`.
    service.pop();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(navigation.removal_requests().len(), 1);
    assert_eq!(navigation.stack(), vec![below.clone()]);
    assert_eq!(service.current_top(), Some(below));
}

#[tokio::test]
async fn test_removal_failure_is_reported() {
    let navigation = Arc::new(FailingNavigation {
        inner: MemoryNavigation::new(),
        remove_anyway: false,
        reject_push: false,
    });
    let (service, failures) = recording_service(navigation.clone());
    navigation.push(ModalHandle::new(Page)).await.unwrap();
    let top = ModalHandle::new(Page);
    navigation.push(top.clone()).await.unwrap();

    service.pop();
    wait_for_ui().await;

    let failures = failures.lock();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains(&top.id().to_string()));
    // The tracker recovers and offers the modal again.
    assert_eq!(service.current_top(), Some(top));
}

#[tokio::test]
async fn test_removal_failure_with_empty_stack_is_swallowed() {
    let navigation = Arc::new(FailingNavigation {
        inner: MemoryNavigation::new(),
        remove_anyway: true,
        reject_push: false,
    });
    let (service, failures) = recording_service(navigation.clone());
    navigation.push(ModalHandle::new(Page)).await.unwrap();

    service.pop();
    wait_for_ui().await;

    assert!(failures.lock().is_empty());
    assert!(service.current_top().is_none());
}

#[tokio::test]
async fn test_confirm_popup_closes_itself() {
    let navigation = Arc::new(MemoryNavigation::new());
    let service = PopupService::new(navigation.clone()).unwrap();

    let task = {
        let service = service.clone();
        tokio::spawn(async move { service.confirm("Delete", "Delete everything?").await })
    };
    wait_for_ui().await;

    let top = service.current_top().unwrap();
    let view_model = top
        .downcast_ref::<ConfirmModal>()
        .and_then(ConfirmModal::view_model)
        .cloned()
        .unwrap();
    assert_eq!(view_model.message, "Delete everything?");
    drop(top);

    view_model.respond(true).unwrap();
    assert!(matches!(view_model.respond(false), Err(PopupError::AlreadySettled)));
    assert!(task.await.unwrap().unwrap());

    wait_for_ui().await;
    assert!(navigation.is_empty());
}

#[tokio::test]
async fn test_text_input_cancel_and_alert() {
    let navigation = Arc::new(MemoryNavigation::new());
    let service = PopupService::new(navigation.clone()).unwrap();

    let input = {
        let service = service.clone();
        tokio::spawn(async move { service.prompt_text("Name", "Who are you?").await })
    };
    wait_for_ui().await;
    let top = service.current_top().unwrap();
    top.downcast_ref::<TextInputModal>()
        .and_then(TextInputModal::view_model)
        .unwrap()
        .cancel()
        .unwrap();
    drop(top);
    assert_eq!(input.await.unwrap().unwrap(), None);

    let alert = {
        let service = service.clone();
        tokio::spawn(async move { service.alert("Done", "All finished").await })
    };
    wait_for_ui().await;
    let top = service.current_top().unwrap();
    assert!(top.is::<AlertModal>());
    top.downcast_ref::<AlertModal>()
        .and_then(AlertModal::view_model)
        .unwrap()
        .acknowledge()
        .unwrap();
    drop(top);
    alert.await.unwrap().unwrap();

    wait_for_ui().await;
    assert!(navigation.is_empty());
}

#[tokio::test]
async fn test_push_failure_resolves_caller() {
    let navigation = Arc::new(FailingNavigation {
        inner: MemoryNavigation::new(),
        remove_anyway: false,
        reject_push: true,
    });
    let (service, failures) = recording_service(navigation.clone());

    let result = service
        .push_with(Arc::new(AnswerViewModel::default()), AnswerModal::default)
        .await;

    assert!(matches!(result, Err(PopupError::PushFailure { .. })));
    assert_eq!(failures.lock().len(), 1);
    assert!(navigation.stack().is_empty());
}

#[tokio::test]
async fn test_used_view_model_is_rejected_without_push() {
    let navigation = Arc::new(MemoryNavigation::new());
    let service = PopupService::new(navigation.clone()).unwrap();

    let awaited = Arc::new(AnswerViewModel::default());
    let _elsewhere = awaited.result_channel().wait();
    let result = service.push::<_, AnswerModal>(awaited).await;
    assert!(matches!(result, Err(PopupError::AlreadyAwaited)));

    let answered = Arc::new(AnswerViewModel::default());
    answered.result_channel().settle(3).unwrap();
    let result = service.push::<_, AnswerModal>(answered).await;
    assert!(matches!(result, Err(PopupError::AlreadySettled)));

    wait_for_ui().await;
    assert!(navigation.push_requests().is_empty());
    assert!(navigation.is_empty());
}
