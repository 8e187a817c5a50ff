use super::*;
use serde_json::json;

#[test]
fn event_names_match_listener_names() {
    assert_eq!(ComponentEvent::Search { boat_type_id: "t1".into() }.name(), "search");
    assert_eq!(ComponentEvent::Loading.name(), "loading");
    assert_eq!(ComponentEvent::DoneLoading.name(), "doneloading");
    assert_eq!(ComponentEvent::ShowToast(Toast::success("a", "b")).name(), "showtoast");
}

#[test]
fn for_loading_picks_matching_event() {
    assert_eq!(ComponentEvent::for_loading(true), ComponentEvent::Loading);
    assert_eq!(ComponentEvent::for_loading(false), ComponentEvent::DoneLoading);
}

#[test]
fn search_event_serializes_detail_as_boat_type_id() {
    let value = serde_json::to_value(ComponentEvent::Search { boat_type_id: "t1".into() }).unwrap();
    assert_eq!(value, json!({"type": "search", "boatTypeId": "t1"}));
}

#[test]
fn toast_constructors_set_variant() {
    let ok = Toast::success(SUCCESS_TITLE, MESSAGE_SHIP_IT);
    assert_eq!(ok.variant, ToastVariant::Success);
    assert_eq!(ok.title, "Success");
    assert_eq!(ok.message, "Ship it!");

    let err = Toast::error(ERROR_TITLE, MESSAGE_CONTACT_ADMIN);
    assert_eq!(err.variant, ToastVariant::Error);
    assert_eq!(err.message, "Contact System Admin!");
}

#[test]
fn unbounded_sender_delivers_in_dispatch_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.dispatch(ComponentEvent::Loading);
    tx.dispatch(ComponentEvent::DoneLoading);
    assert_eq!(rx.try_recv().unwrap(), ComponentEvent::Loading);
    assert_eq!(rx.try_recv().unwrap(), ComponentEvent::DoneLoading);
}

#[test]
fn dispatch_to_closed_sink_does_not_panic() {
    let (tx, rx) = mpsc::unbounded_channel::<ComponentEvent>();
    drop(rx);
    tx.dispatch(ComponentEvent::Loading);
}
