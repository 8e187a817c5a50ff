use super::*;
use serde_json::json;
use tokio::time::{Duration, timeout};

async fn assert_receives(rx: &mut mpsc::Receiver<Value>) -> Value {
    timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("payload receive timed out")
        .expect("channel closed")
}

#[tokio::test]
async fn publish_reaches_every_subscriber_of_the_channel() {
    let bus = InProcessBus::default();
    let mut a = bus.subscribe(BOAT_MESSAGE_CHANNEL);
    let mut b = bus.subscribe(BOAT_MESSAGE_CHANNEL);

    bus.publish(BOAT_MESSAGE_CHANNEL, json!({"recordId": "b1"}));

    assert_eq!(assert_receives(&mut a.receiver).await, json!({"recordId": "b1"}));
    assert_eq!(assert_receives(&mut b.receiver).await, json!({"recordId": "b1"}));
}

#[tokio::test]
async fn publish_does_not_cross_channels() {
    let bus = InProcessBus::default();
    let mut other = bus.subscribe("OtherChannel");

    bus.publish(BOAT_MESSAGE_CHANNEL, json!({"recordId": "b1"}));

    assert!(other.receiver.try_recv().is_err());
}

#[test]
fn publish_without_subscribers_is_a_no_op() {
    let bus = InProcessBus::default();
    bus.publish(BOAT_MESSAGE_CHANNEL, json!({"recordId": "b1"}));
    assert_eq!(bus.subscriber_count(BOAT_MESSAGE_CHANNEL), 0);
}

#[test]
fn full_subscriber_drops_without_blocking_others() {
    let bus = InProcessBus::new(1);
    let mut slow = bus.subscribe(BOAT_MESSAGE_CHANNEL);
    let mut fast = bus.subscribe(BOAT_MESSAGE_CHANNEL);

    bus.publish(BOAT_MESSAGE_CHANNEL, json!(1));
    assert_eq!(fast.receiver.try_recv().unwrap(), json!(1));
    bus.publish(BOAT_MESSAGE_CHANNEL, json!(2));

    assert_eq!(slow.receiver.try_recv().unwrap(), json!(1));
    assert!(slow.receiver.try_recv().is_err());
    assert_eq!(fast.receiver.try_recv().unwrap(), json!(2));
    assert_eq!(bus.subscriber_count(BOAT_MESSAGE_CHANNEL), 2);
}

#[test]
fn unsubscribe_stops_delivery() {
    let bus = InProcessBus::default();
    let mut sub = bus.subscribe(BOAT_MESSAGE_CHANNEL);

    assert!(bus.unsubscribe(sub.token));
    assert!(!bus.unsubscribe(sub.token));
    bus.publish(BOAT_MESSAGE_CHANNEL, json!({"recordId": "b1"}));

    assert!(sub.receiver.try_recv().is_err());
    assert_eq!(bus.subscriber_count(BOAT_MESSAGE_CHANNEL), 0);
}

#[test]
fn dropped_receiver_is_pruned_on_publish() {
    let bus = InProcessBus::default();
    let sub = bus.subscribe(BOAT_MESSAGE_CHANNEL);
    let _keep = bus.subscribe(BOAT_MESSAGE_CHANNEL);
    drop(sub);

    bus.publish(BOAT_MESSAGE_CHANNEL, json!({"recordId": "b1"}));

    assert_eq!(bus.subscriber_count(BOAT_MESSAGE_CHANNEL), 1);
}

#[test]
fn boat_selected_payload_uses_record_id_key() {
    let msg = BoatSelected { record_id: "b7".into() };
    assert_eq!(msg.to_payload(), json!({"recordId": "b7"}));
    assert_eq!(BoatSelected::from_payload(&json!({"recordId": "b7"})), Some(msg));
    assert_eq!(BoatSelected::from_payload(&json!({"other": 1})), None);
}
