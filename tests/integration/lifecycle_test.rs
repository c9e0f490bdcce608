// tests/integration/lifecycle_test.rs

//! Multi-component lifecycles: many consumers sharing one connection

use super::fixtures::{EVENT_MSG, OTHER_URI, chat_payload};
use super::test_helpers::{Recorder, TestContext};
use socket_hooks::InitParams;
use socket_hooks::core::transport::same_handle;

#[test]
fn test_many_consumers_share_one_connection() {
    let ctx = TestContext::new();
    let observers: Vec<_> = (0..5).map(|_| ctx.hooks.observe()).collect();
    let recorders: Vec<Recorder> = (0..5).map(|_| Recorder::new()).collect();
    let _bindings: Vec<_> = recorders
        .iter()
        .map(|r| ctx.hooks.on(EVENT_MSG, r.listener()))
        .collect();

    let _init = ctx.connect();
    ctx.socket().dispatch(EVENT_MSG, chat_payload("lobby", "hi"));

    assert_eq!(ctx.transport.connect_count(), 1);
    let current = ctx.hooks.socket();
    for observer in &observers {
        assert!(same_handle(observer.current().as_ref(), current.as_ref()));
    }
    for recorder in &recorders {
        assert_eq!(recorder.calls(), vec![chat_payload("lobby", "hi")]);
    }
}

#[test]
fn test_unmounting_everything_leaves_no_listeners() {
    let ctx = TestContext::new();
    let baseline = ctx.hooks.broadcaster().listener_count();

    let init = ctx.connect();
    let socket = ctx.socket();
    {
        let recorder = Recorder::new();
        let _on = ctx.hooks.on(EVENT_MSG, recorder.listener());
        let _once = ctx.hooks.once(EVENT_MSG, recorder.listener());
        let _observer = ctx.hooks.observe();
        let _emitter = ctx.hooks.emitter();
        assert_eq!(socket.listener_count(EVENT_MSG), 2);
    }

    assert_eq!(socket.listener_count(EVENT_MSG), 0);
    assert_eq!(ctx.hooks.broadcaster().listener_count(), baseline);

    init.unmount();
    assert_eq!(ctx.transport.live_count(), 0);
}

#[test]
fn test_reinitialization_moves_consumers_to_new_connection() {
    let ctx = TestContext::new();
    let recorder = Recorder::new();
    let _binding = ctx.hooks.on(EVENT_MSG, recorder.listener());
    let emitter = ctx.hooks.emitter();

    let mut init = ctx.connect();
    emitter.emit("before", vec![]);
    init.update(InitParams::new().uri(OTHER_URI)).unwrap();
    emitter.emit("after", vec![]);

    let sockets = ctx.transport.sockets();
    assert_eq!(sockets.len(), 2);
    assert_eq!(sockets[0].emitted().len(), 1);
    assert_eq!(ctx.emitted_names(), vec!["after"]);

    sockets[1].dispatch(EVENT_MSG, vec![]);
    assert_eq!(recorder.count(), 1);
}

#[test]
fn test_consumers_mounted_while_disconnected_catch_up() {
    let ctx = TestContext::new();
    let init = ctx.connect();
    drop(init);

    let recorder = Recorder::new();
    let _binding = ctx.hooks.on(EVENT_MSG, recorder.listener());
    let observer = ctx.hooks.observe();
    assert!(!observer.is_resolved());

    let _init = ctx.connect();
    ctx.socket().dispatch(EVENT_MSG, vec![]);

    assert!(observer.is_resolved());
    assert_eq!(recorder.count(), 1);
}

#[test]
fn test_cloned_hooks_share_the_connection() {
    let ctx = TestContext::new();
    let clone = ctx.hooks.clone();
    let _init = ctx.connect();

    assert!(same_handle(clone.socket().as_ref(), ctx.hooks.socket().as_ref()));
}
