use super::*;
use crate::config::Timeouts;
use crate::services::error_display_message;
use serde_json::json;

fn test_config() -> AppConfig {
    AppConfig {
        api_base_url: "http://127.0.0.1:9".into(),
        api_token: Some("tok".into()),
        timeouts: Timeouts::default(),
        message_channel: "BoatMessageChannel".into(),
        subscriber_capacity: 4,
    }
}

#[test]
fn endpoints_are_built_from_base_url() {
    assert_eq!(boat_types_url("https://h/api"), "https://h/api/boat-types");
    assert_eq!(boats_url("https://h/api"), "https://h/api/boats");
    assert_eq!(boat_record_url("https://h/api", "b1"), "https://h/api/boats/b1");
}

#[test]
fn update_body_wraps_fields() {
    let mut fields = Map::new();
    fields.insert("Price__c".into(), json!(10));
    assert_eq!(update_body(fields), json!({"fields": {"Price__c": 10}}));
}

#[test]
fn parse_list_decodes_success_body() {
    let types: Vec<BoatType> = parse_list(StatusCode::OK, r#"[{"Id":"t1","Name":"Sailboat"}]"#).unwrap();
    assert_eq!(types, vec![BoatType { id: "t1".into(), name: "Sailboat".into() }]);
}

#[test]
fn parse_list_reports_malformed_success_body_as_decode_error() {
    let err = parse_list::<BoatRecord>(StatusCode::OK, "not json").unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)));
}

#[test]
fn parse_list_turns_error_status_into_rejection() {
    let err = parse_list::<BoatRecord>(StatusCode::BAD_REQUEST, r#"[{"message":"bad filter"}]"#).unwrap_err();
    assert!(matches!(err, ServiceError::Rejected { status: 400, .. }));
    assert_eq!(error_display_message(&err), "bad filter");
}

#[test]
fn unrecognized_rejection_body_has_no_message() {
    let err = parse_rejection(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
    assert_eq!(error_display_message(&err), "Unknown error");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let mut config = test_config();
    config.timeouts = Timeouts { request_secs: 1, connect_secs: 1 };
    let service = HttpBoatDataService::new(&config).unwrap();
    let err = service.get_boat_types().await.unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)));
}
