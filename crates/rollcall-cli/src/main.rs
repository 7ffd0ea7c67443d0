//! Rollcall attendance tracker.
//!
//! Runs the tracker against a console-driven mock reader. Each line read
//! from stdin changes what the reader sees:
//!
//! - a card identifier (decimal or `0x` hex) places that card on the reader
//! - an empty line removes the card
//! - `quit` stops the tracker
//!
//! Ctrl-C, SIGTERM and end of input stop it as well. Configuration comes
//! from the `ROLLCALL_*` environment variables, logging from `RUST_LOG`.

use anyhow::Context;
use rollcall_core::CardId;
use rollcall_hardware::mock::{MockReader, MockReaderHandle};
use rollcall_tracker::{StopHandle, TrackerConfig, TrackerService};
use std::io::BufRead;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TrackerConfig::from_env().context("invalid configuration")?;
    info!(
        version = rollcall_core::VERSION,
        log = %config.log_path.display(),
        "Starting rollcall"
    );

    let (reader, card) = MockReader::with_name("Console Card Reader");
    let service = TrackerService::new(config);
    let stop = service.stop_handle();
    let running = service.start(reader.into());

    // Blocking stdin reads cannot be cancelled, so they get a plain thread
    // that dies with the process.
    std::thread::spawn({
        let stop = stop.clone();
        move || console_input(card, stop)
    });
    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(()) => {
                info!("Shutdown signal received");
                stop.stop();
            }
            Err(e) => warn!("Signal handling unavailable: {}", e),
        }
    });

    let summary = running.wait().await.context("attendance tracker failed")?;
    info!(
        presentations = summary.poll.emitted,
        dropped = summary.poll.dropped,
        processed = summary.worker.processed,
        "Rollcall stopped"
    );
    Ok(())
}

fn console_input(card: MockReaderHandle, stop: StopHandle) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match line.trim() {
            "quit" => break,
            "" => card.remove_card(),
            input => match input.parse::<CardId>() {
                Ok(id) => {
                    if let Err(e) = card.present_card(id) {
                        warn!("Ignoring input {:?}: {}", input, e);
                    }
                }
                Err(e) => warn!("Ignoring input {:?}: {}", input, e),
            },
        }
        if stop.is_stopped() {
            return;
        }
    }
    stop.stop();
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = sigterm.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
