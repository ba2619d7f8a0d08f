//! Agent Console - voice agent session console
//!
//! Main entry point for the desktop application.

use agent_console::audio;
use agent_console::transport::{OfflineTransport, RealtimeTransport, TransportOptions};
use agent_console::ui::ConsoleApp;
use agent_console::{
    ConsoleSettings, ConsoleState, HttpBackend, SessionController, SharedConsoleState,
    TransportBinder,
};
use anyhow::{Context, Result};
use eframe::egui;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_console=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting agent console");

    let settings = ConsoleSettings::load().context("Failed to load settings")?;
    info!("Backend: {}", settings.backend_url);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("agent-console-io")
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let backend = HttpBackend::new(&settings.backend_url, settings.request_timeout())?;

    let mut state = ConsoleState::new(settings.agent.clone());
    state.backend_url = settings.backend_url.clone();
    let shared = SharedConsoleState::new(state);

    let controller = SessionController::new(
        shared,
        Arc::new(backend),
        runtime.handle().clone(),
        settings.poll_interval(),
    );

    let binder = TransportBinder::new(
        Box::new(|options: &TransportOptions| -> Box<dyn RealtimeTransport> {
            Box::new(OfflineTransport::new(options))
        }),
        audio::default_sink(settings.audio_output),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([600.0, 480.0])
            .with_title("Agent Console"),
        ..Default::default()
    };

    eframe::run_native(
        "Agent Console",
        options,
        Box::new(move |cc| Ok(Box::new(ConsoleApp::new(cc, controller, binder)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}
