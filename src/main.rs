//! user-admin-tui - A terminal admin client for a REST users collection
//!
//! Lists users page by page, adds new users through a form, and lets the
//! operator add form fields at runtime. Uses the Component Architecture
//! pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::services::{HttpUserApi, UserApi};
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use std::sync::Arc;

fn main() -> Result<()> {
    let log_dir = Config::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("logs");
    let (log_guard, log_path) = logging::init(&log_dir)?;

    let config = Config::load()?;
    let page_size = config.page_size()?;
    tracing::info!(
        api = %config.api_base_url,
        page_size = page_size.get(),
        log = %log_path.display(),
        "starting user-admin-tui"
    );

    let api: Arc<dyn UserApi> = Arc::new(HttpUserApi::new(&config.api_base_url));
    let mut app = App::new(&config.api_base_url, api, page_size);

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(config.tick_rate());
    tui.enter()?;

    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exiting on error");
        eprintln!("Error: {:?}", err);
        // exit() skips destructors; flush the log writer first
        drop(log_guard);
        std::process::exit(1);
    }

    tracing::info!("bye");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    if let Some(action) = app.init()? {
        app.dispatch(action)?;
    }

    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };
            if let Some(action) = action {
                app.dispatch(action)?;
            }
        }

        // Apply finished requests even while keys keep arriving
        app.dispatch(Action::Tick)?;
    }

    Ok(())
}
