// tests/integration/scenarios_test.rs

//! End-to-end scenarios across initializer, bindings and emitters

use super::fixtures::{EVENT_HELLO, EVENT_MSG, EVENT_PING, TEST_URI};
use super::test_helpers::{Recorder, TestContext};
use serde_json::json;
use socket_hooks::core::transport::EmittedEvent;
use socket_hooks::{HooksError, InitParams};

#[test]
fn test_emit_before_activation_is_delivered_after() {
    let ctx = TestContext::with_base_uri(None);
    let emitter = ctx.hooks.emitter();

    emitter.emit(EVENT_PING, vec![]);
    assert_eq!(ctx.transport.connect_count(), 0);

    let _init = ctx
        .hooks
        .init_socket(InitParams::new().uri(TEST_URI))
        .unwrap();

    assert_eq!(
        ctx.socket().emitted(),
        vec![EmittedEvent {
            event: EVENT_PING.to_string(),
            args: vec![]
        }]
    );
}

#[test]
fn test_disabled_activation_skips_uri_validation() {
    let ctx = TestContext::with_base_uri(None);

    let result = ctx.hooks.init_socket(InitParams::new().enabled(false));

    assert!(result.is_ok());
    assert_eq!(ctx.transport.connect_count(), 0);
}

#[test]
fn test_enabled_activation_without_uri_is_a_configuration_error() {
    let ctx = TestContext::with_base_uri(None);

    let result = ctx.hooks.init_socket(InitParams::new());

    assert!(matches!(result, Err(HooksError::MissingUri)));
    assert_eq!(ctx.transport.connect_count(), 0);
}

#[test]
fn test_bound_listener_stops_after_teardown() {
    let ctx = TestContext::new();
    let recorder = Recorder::new();
    let binding = ctx.hooks.on(EVENT_MSG, recorder.listener());

    let _init = ctx.connect();
    let socket = ctx.socket();
    socket.dispatch(EVENT_MSG, vec![json!("first"), json!(1)]);
    assert_eq!(recorder.calls(), vec![vec![json!("first"), json!(1)]]);

    drop(binding);
    socket.dispatch(EVENT_MSG, vec![json!("second")]);
    assert_eq!(recorder.count(), 1);
}

#[test]
fn test_immediate_emit_survives_rerenders() {
    let ctx = TestContext::new();
    let _init = ctx.connect();

    let mut hello = ctx.hooks.immediate_emit(EVENT_HELLO, vec![json!(1)]);
    for _ in 0..3 {
        hello.rerun();
    }

    assert_eq!(
        ctx.socket().emitted(),
        vec![EmittedEvent {
            event: EVENT_HELLO.to_string(),
            args: vec![json!(1)]
        }]
    );
}
