use depsweep::cli::{AppConfig, Args};
use depsweep::config::UserConfig;
use depsweep::deleter::spawn_batch;
use depsweep::domain::AppState;
use depsweep::event::AppEvent;
use depsweep::logging;
use depsweep::scanner::{spawn_scan, ScanOptions};
use depsweep::tui::{
    format_file_size, handle_confirm_input, handle_key_event, render,
    render_confirm_delete_overlay, render_help_overlay, KeyAction, ViewState,
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let config = match AppConfig::resolve(args, &user_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guard =
        logging::init_logger(config.log_file.as_deref(), config.log_level.as_deref());

    run_app_with_config(&config)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> io::Result<()> {
    let runtime = Runtime::new()?;
    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();

    // Start scanning before the terminal is set up so discovery overlaps startup
    let scan = {
        let _enter = runtime.enter();
        spawn_scan(
            ScanOptions {
                root: config.directory.clone(),
                target: config.target.clone(),
                min_size: config.min_size,
            },
            events_tx.clone(),
        )
    };

    let mut state = AppState::new(config.directory.clone(), config.target.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(
        &mut terminal,
        &mut state,
        &runtime,
        &mut events_rx,
        &events_tx,
        config,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    scan.cancel();

    // Let an in-flight deletion batch finish instead of cutting it off
    if state.deleting {
        println!("Waiting for deletions to finish...");
        while let Some(event) = events_rx.blocking_recv() {
            let batch_done = matches!(event, AppEvent::DeletionComplete(_));
            state.handle_event(event);
            if batch_done {
                break;
            }
        }
    }

    if state.freed > 0 {
        println!(
            "Freed {} of {} directories",
            format_file_size(state.freed),
            config.target
        );
    }
    info!(freed = state.freed, "exiting");

    // Walk and size tasks may still be running on the blocking pool
    runtime.shutdown_background();

    result
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    runtime: &Runtime,
    events_rx: &mut UnboundedReceiver<AppEvent>,
    events_tx: &UnboundedSender<AppEvent>,
    config: &AppConfig,
) -> io::Result<()> {
    let mut view_state = ViewState::Browsing;

    loop {
        // Apply background events in arrival order
        while let Ok(event) = events_rx.try_recv() {
            state.handle_event(event);
        }

        terminal.draw(|frame| {
            render(frame, state);

            // Render overlays
            match view_state {
                ViewState::Help => render_help_overlay(frame),
                ViewState::ConfirmDelete => {
                    let pending = state.pending_deletion();
                    let bytes = pending.iter().map(|t| t.size).sum();
                    render_confirm_delete_overlay(frame, pending.len(), bytes, config.dry_run);
                }
                ViewState::Browsing => {}
            }
        })?;

        // Handle input
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Handle overlay-specific input
        match view_state {
            ViewState::Help => {
                let action = handle_key_event(key);
                if matches!(action, KeyAction::Help | KeyAction::Quit | KeyAction::None) {
                    view_state = ViewState::Browsing;
                }
                continue;
            }
            ViewState::ConfirmDelete => {
                match handle_confirm_input(key) {
                    KeyAction::ConfirmDelete => {
                        start_deletion(state, runtime, events_tx, config.dry_run);
                        view_state = ViewState::Browsing;
                    }
                    KeyAction::CancelDelete => view_state = ViewState::Browsing,
                    _ => {}
                }
                continue;
            }
            ViewState::Browsing => {}
        }

        let action = handle_key_event(key);

        // Only quitting and help are available until the scan completes
        if state.scanning && !matches!(action, KeyAction::Quit | KeyAction::Help) {
            continue;
        }

        match action {
            KeyAction::Quit => break,
            KeyAction::Up => state.previous(),
            KeyAction::Down => state.next(),
            KeyAction::ToggleSelect => state.toggle_select_current(),
            KeyAction::ToggleExpand => state.toggle_expand_current(),
            KeyAction::ToggleAll => state.toggle_select_all(),
            KeyAction::Delete => {
                if state.deleting || state.pending_deletion().is_empty() {
                    continue;
                }
                if config.skip_confirm || config.dry_run {
                    start_deletion(state, runtime, events_tx, config.dry_run);
                } else {
                    view_state = ViewState::ConfirmDelete;
                }
            }
            KeyAction::Help => view_state = ViewState::Help,
            KeyAction::ConfirmDelete | KeyAction::CancelDelete | KeyAction::None => {}
        }
    }

    Ok(())
}

/// Hands the current selection to the deleter
fn start_deletion(
    state: &mut AppState,
    runtime: &Runtime,
    events_tx: &UnboundedSender<AppEvent>,
    dry_run: bool,
) {
    match state.begin_deletion() {
        Some(targets) => {
            let _enter = runtime.enter();
            spawn_batch(targets, dry_run, events_tx.clone());
        }
        None => warn!("delete requested with nothing to delete"),
    }
}
