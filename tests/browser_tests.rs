use serde_json::json;

use scenario_scaffold::browser::session::{BrowserRequest, BrowserResponse, NodeSnapshot};
use scenario_scaffold::discovery::inspector::ElementHandle;

// ============================================================================
// Wire format
// ============================================================================

#[test]
fn requests_serialize_as_flat_commands() {
    assert_eq!(
        serde_json::to_value(BrowserRequest::navigate("http://shop.test")).ok(),
        Some(json!({ "cmd": "navigate", "url": "http://shop.test" }))
    );
    assert_eq!(
        serde_json::to_value(BrowserRequest::query_elements("a[href]")).ok(),
        Some(json!({ "cmd": "query_elements", "selector": "a[href]" }))
    );
    assert_eq!(
        serde_json::to_value(BrowserRequest::quit()).ok(),
        Some(json!({ "cmd": "quit" }))
    );
}

#[test]
fn ready_and_error_responses_parse() {
    let ready: BrowserResponse = serde_json::from_str(r#"{"ok":true,"ready":true}"#).expect("ready");
    assert!(ready.ok);
    assert_eq!(ready.ready, Some(true));

    let failed: BrowserResponse =
        serde_json::from_str(r#"{"ok":false,"error":"net::ERR_CONNECTION_REFUSED"}"#).expect("error");
    assert!(!failed.ok);
    assert_eq!(failed.error.as_deref(), Some("net::ERR_CONNECTION_REFUSED"));
}

// ============================================================================
// Node snapshots
// ============================================================================

#[test]
fn snapshot_answers_attribute_reads() {
    let node: NodeSnapshot = serde_json::from_value(json!({
        "tag": "INPUT",
        "text": "",
        "visible": true,
        "attributes": { "id": "email", "type": "text" }
    }))
    .expect("snapshot");

    assert_eq!(node.tag_name().ok().as_deref(), Some("INPUT"));
    assert_eq!(node.is_displayed().ok(), Some(true));
    assert_eq!(node.attribute("id").ok().flatten().as_deref(), Some("email"));
    assert_eq!(node.attribute("placeholder").ok().flatten(), None);
}

#[test]
fn stale_snapshot_fails_every_read() {
    let node: NodeSnapshot = serde_json::from_value(json!({
        "tag": "A",
        "stale": "element is not attached to the DOM"
    }))
    .expect("snapshot");

    assert!(node.is_displayed().is_err());
    assert!(node.text().is_err());
    assert!(node.attribute("href").is_err());
}

#[test]
fn missing_fields_default_to_hidden() {
    let node: NodeSnapshot = serde_json::from_value(json!({})).expect("snapshot");
    assert_eq!(node.is_displayed().ok(), Some(false));
}
