// tests/integration/fixtures.rs

//! Event names, endpoints and payloads shared by the integration tests

use serde_json::{Value, json};

/// The base URI used by `TestContext::new`
pub const TEST_URI: &str = "wss://example";

/// A second endpoint for re-initialization tests
pub const OTHER_URI: &str = "wss://other.example";

/// Common event names
pub const EVENT_MSG: &str = "msg";
pub const EVENT_PING: &str = "ping";
pub const EVENT_HELLO: &str = "hello";

/// Builds a chat-style payload
pub fn chat_payload(room: &str, text: &str) -> Vec<Value> {
    vec![json!({ "room": room, "text": text })]
}
