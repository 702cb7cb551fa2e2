//! The process-wide service lives in its own test binary so no other test can
//! bind it first.

use awaitable_popups::{MemoryNavigation, PopupError, PopupNavigation, PopupService};
use std::sync::Arc;

fn same_navigation(service: &PopupService, navigation: &Arc<MemoryNavigation>) -> bool {
    Arc::as_ptr(service.navigation()) as *const () == Arc::as_ptr(navigation) as *const ()
}

#[tokio::test]
async fn test_first_binding_wins() {
    let unbound = PopupService::get_instance(None);
    let error = unbound.err().expect("nothing is bound yet");
    assert!(matches!(
        error.downcast_ref::<PopupError>(),
        Some(PopupError::NotBound)
    ));

    let first = Arc::new(MemoryNavigation::new());
    let second = Arc::new(MemoryNavigation::new());

    let service =
        PopupService::get_instance(Some(first.clone() as Arc<dyn PopupNavigation>)).unwrap();
    assert!(same_navigation(&service, &first));

    let again =
        PopupService::get_instance(Some(second.clone() as Arc<dyn PopupNavigation>)).unwrap();
    assert!(same_navigation(&again, &first));
    assert!(!same_navigation(&again, &second));

    let plain = PopupService::get_instance(None).unwrap();
    assert!(same_navigation(&plain, &first));
    assert_eq!(second.listener_count(), 0);
}
