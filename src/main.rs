//! Bridges one behavior-tree log topic to newline-delimited JSON on stdout.
//!
//! Logging goes to stderr; stdout carries nothing but the JSON stream. The
//! process runs until Ctrl-C or until the endpoint closes the stream, and
//! exits 1 only when the transport cannot be acquired at startup.

use std::process::ExitCode;

use tracing::info;

use btbridge::bridge::{Bridge, StdoutSink};
use btbridge::config::{self, BridgeConfig};
use btbridge::errors::TransportError;
use btbridge::transport::SocketTransport;

fn report_fatal(error: &TransportError) {
    eprintln!("fatal: {error}");
    eprintln!("{}", error.diagnostics());
}

#[tokio::main]
async fn main() -> ExitCode {
    btbridge::telemetry::init();

    let config = BridgeConfig::from_env();
    let endpoint = config::resolve_endpoint();

    let transport = match SocketTransport::connect(endpoint).await {
        Ok(transport) => transport,
        Err(error) => {
            report_fatal(&error);
            return ExitCode::FAILURE;
        }
    };

    let subscribed = transport.subscribe(&config.topic, config.queue_depth).await;
    let (subscription, handle) = match subscribed {
        Ok(pair) => pair,
        Err(error) => {
            report_fatal(&error);
            return ExitCode::FAILURE;
        }
    };

    info!(topic = %config.topic, queue_depth = config.queue_depth, "bridge started, listening");

    let mut bridge = Bridge::new(subscription, StdoutSink::new());
    let emitted = bridge
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    // Teardown runs on this path and, via Drop, on any early return.
    handle.shutdown().await;
    info!(emitted, "bridge stopped");
    ExitCode::SUCCESS
}
