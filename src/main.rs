// src/main.rs

//! A demo driver for the socket hooks.
//!
//! It wires the hooks to the in-memory transport, mounts a few consumers the
//! way UI components would, and plays server traffic at them.

use anyhow::Result;
use serde_json::json;
use socket_hooks::config::HooksConfig;
use socket_hooks::core::transport::MemoryTransport;
use socket_hooks::{InitParams, Listener, ReservedEvent, SocketHooks};
use std::env;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;

/// Number of server messages the demo pushes before unmounting.
const DEMO_MESSAGES: usize = 5;

/// Delay between pushed server messages.
const DEMO_INTERVAL: Duration = Duration::from_millis(200);

const VERSION_TAG: &str = concat!("socket-hooks/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const PROFILE: &str = env!("SOCKET_HOOKS_BUILD_PROFILE");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("socket-hooks version {VERSION} ({PROFILE} build)");
        return Ok(());
    }

    // Without --config the demo runs on defaults pointed at a local endpoint.
    let config = match args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
    {
        Some(path) => match HooksConfig::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load configuration from \"{path}\": {e:#}");
                std::process::exit(1);
            }
        },
        None => HooksConfig {
            uri: Some("ws://127.0.0.1:3000".to_string()),
            ..HooksConfig::default()
        },
    };

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    if let Err(e) = run_demo(config).await {
        error!("Demo runtime error: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run_demo(config: HooksConfig) -> Result<()> {
    let transport = MemoryTransport::new();
    let hooks = SocketHooks::from_config(&config, transport.clone());

    // A component that announces itself before the connection exists.
    let _greeting = hooks.immediate_emit("hello", vec![json!(VERSION_TAG)]);

    let _on_connect = hooks.on(
        ReservedEvent::Connect,
        Listener::new(|_| info!("Socket connected")),
    );
    let _on_message = hooks.on("msg", Listener::new(|args| info!("Received msg: {:?}", args)));

    let initializer = hooks.init_socket(InitParams::new())?;
    let socket = transport
        .last_socket()
        .ok_or_else(|| anyhow::anyhow!("initializer did not open a socket"))?;
    socket.simulate_connect();

    for emitted in socket.emitted() {
        info!("Flushed to server: {} {:?}", emitted.event, emitted.args);
    }

    let server = {
        let socket = socket.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(DEMO_INTERVAL);
            for seq in 0..DEMO_MESSAGES {
                interval.tick().await;
                socket.dispatch("msg", vec![json!({ "seq": seq })]);
            }
        })
    };

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server simulation task failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted; unmounting.");
        }
    }

    initializer.unmount();
    info!(
        "Demo finished: {} connection(s) opened, {} still live.",
        transport.connect_count(),
        transport.live_count()
    );
    Ok(())
}
