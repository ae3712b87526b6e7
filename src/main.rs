//! node-console - A terminal console for a federated-learning node
//!
//! This is the main entry point for the node-console application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod api;
mod app;
mod cli;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod store;
mod tui;
mod wizard;

use crate::action::Action;
use crate::app::App;
use crate::cli::Cli;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = cli
        .config_dir()
        .context("cannot locate a config directory; set HOME or pass --config-dir")?;
    // Logging first, so a malformed config file is reported
    let _log_guard = logging::init(&config_dir, cli.log_level.as_deref())?;
    let config = cli.apply(Config::load_from(&config_dir).unwrap_or_default());
    tracing::info!(server = %config.server_url, "starting node-console");

    // Create app state before touching the terminal so startup errors print normally
    let mut app = App::new(config, config_dir)?;
    app.init()?;

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!(error = ?err, "node-console stopped");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("bye");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(err) = app.draw(frame, frame.area()) {
                tracing::error!(error = %err, "draw failed");
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - drain finished API calls
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
