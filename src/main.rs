//! shake-daemon: shake gesture detection with a reactive console view
//!
//! Wires the components together:
//! - Motion listener feeding platform motion callbacks (console stand-in)
//! - Explicit state machine with a held Shaking state
//! - Console renderer showing the headline, animation and haptic cues

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shake_daemon::config::Config;
use shake_daemon::events::ShakeEvent;
use shake_daemon::lifecycle::ShutdownSignal;
use shake_daemon::motion::{MotionEventSource, MotionListener};
use shake_daemon::render::ConsoleRenderer;
use shake_daemon::state::StateMachine;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "shake-daemon starting"
    );

    let config = Config::load().context("failed to load configuration")?;
    info!(?config, "configuration loaded");

    let shutdown = ShutdownSignal::new();

    // Motion source -> State machine
    let (signal_tx, signal_rx) = mpsc::channel(config.signal_buffer);
    // State machine -> Renderer
    let (event_tx, _event_rx) = broadcast::channel::<ShakeEvent>(config.event_buffer);

    let mut state_machine = StateMachine::new(config.hold, event_tx.clone());
    let state_rx = state_machine.subscribe();

    let mut source = MotionEventSource::new();
    source.register(signal_tx);
    let mut motion_listener = MotionListener::new(source);

    match motion_listener.start() {
        Ok(()) => {
            info!("motion listener started");
        }
        Err(e) => {
            error!(?e, "failed to start motion listener");
            warn!("continuing without motion input");
        }
    }

    let mut renderer = ConsoleRenderer::new(std::io::stdout(), config.output, config.frame_interval);
    let renderer_events = event_tx.subscribe();
    // Renderer exits once the machine is gone and this sender is dropped
    drop(event_tx);

    info!("daemon initialized, entering main loop");

    // Ends when motion input closes and any hold has played out
    let machine = tokio::spawn(async move {
        state_machine.run(signal_rx).await;
    });

    tokio::select! {
        // Draws the final state once the machine is gone
        result = renderer.run(state_rx, renderer_events) => {
            if let Err(e) = result {
                error!(?e, "renderer error");
            }
            info!("renderer exited");
        }

        _ = async {
            if let Err(e) = shutdown.wait().await {
                error!(?e, "failed to install signal handlers");
                std::future::pending::<()>().await;
            }
        } => {
            info!("shutdown signal received");
        }
    }

    info!("shutting down...");

    motion_listener.stop();
    machine.abort();

    info!("shake-daemon stopped");

    Ok(())
}
