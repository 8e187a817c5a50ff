use super::*;
use crate::model::BoatType;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

// =========================================================================
// MockTypes
// =========================================================================

struct MockTypes {
    result: Mutex<Result<Vec<BoatType>, ServiceError>>,
    calls: AtomicUsize,
}

impl MockTypes {
    fn ok(types: Vec<BoatType>) -> Self {
        Self { result: Mutex::new(Ok(types)), calls: AtomicUsize::new(0) }
    }

    fn failing(err: ServiceError) -> Self {
        Self { result: Mutex::new(Err(err)), calls: AtomicUsize::new(0) }
    }
}

#[async_trait::async_trait]
impl BoatTypeService for MockTypes {
    async fn get_boat_types(&self) -> Result<Vec<BoatType>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}

fn sailboat() -> BoatType {
    BoatType { id: "t1".into(), name: "Sailboat".into() }
}

// =========================================================================
// mount
// =========================================================================

#[tokio::test]
async fn mount_loads_types_once_with_all_types_first() {
    let types = MockTypes::ok(vec![sailboat()]);
    let form = TypeFilterForm::mount(&types, Arc::new(crate::events::NullSink)).await;

    assert_eq!(types.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        form.search_options(),
        [
            CategoryOption { label: "All Types".into(), value: String::new() },
            CategoryOption { label: "Sailboat".into(), value: "t1".into() },
        ]
    );
    assert!(form.error().is_none());
    assert_eq!(form.selected_boat_type_id(), "");
}

#[tokio::test]
async fn failed_lookup_leaves_options_empty_and_records_error() {
    let failing = MockTypes::failing(ServiceError::rejected(500, "down"));
    let form = TypeFilterForm::mount(&failing, Arc::new(crate::events::NullSink)).await;

    assert!(form.search_options().is_empty());
    assert!(matches!(form.error(), Some(ServiceError::Rejected { status: 500, .. })));
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn remount_after_failure_fetches_again() {
    let failing = MockTypes::failing(ServiceError::Transport("reset".into()));
    let form = TypeFilterForm::mount(&failing, Arc::new(crate::events::NullSink)).await;
    assert!(form.error().is_some());

    let types = MockTypes::ok(vec![sailboat()]);
    let form = TypeFilterForm::mount(&types, Arc::new(crate::events::NullSink)).await;

    assert_eq!(form.search_options().len(), 2);
    assert!(form.error().is_none());
}

// =========================================================================
// handle_search_option_change
// =========================================================================

#[tokio::test]
async fn selection_change_stores_value_and_emits_search() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let types = MockTypes::ok(vec![sailboat()]);
    let mut form = TypeFilterForm::mount(&types, Arc::new(tx)).await;

    form.handle_search_option_change("t1");

    assert_eq!(form.selected_boat_type_id(), "t1");
    assert_eq!(rx.try_recv().unwrap(), ComponentEvent::Search { boat_type_id: "t1".into() });
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn selecting_all_types_emits_empty_filter() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut form = TypeFilterForm::new(Arc::new(tx));

    form.handle_search_option_change("t1");
    form.handle_search_option_change("");

    assert_eq!(rx.try_recv().unwrap(), ComponentEvent::Search { boat_type_id: "t1".into() });
    assert_eq!(rx.try_recv().unwrap(), ComponentEvent::Search { boat_type_id: String::new() });
    assert_eq!(form.selected_boat_type_id(), "");
}
