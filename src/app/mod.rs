//! Application state and event handling

pub mod actions;
pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::config::Config;
use crate::kanji::FsDataSource;
use crate::progress::{FileStore, ProgressTracker};
use crate::sync::HttpScoreSync;
use crate::ui;
use input::key_with_modifier_to_action;
use state::AppState;

/// Input poll interval, also the animation frame budget
const FRAME: Duration = Duration::from_millis(16);

/// Open the progress tracker on the platform data directory, with sync if configured
pub fn open_progress(config: &Config) -> Result<ProgressTracker> {
    let store = FileStore::new(Config::data_dir()?);
    let mut progress = ProgressTracker::load(Box::new(store));
    if let Some(endpoint) = &config.sync_endpoint {
        match HttpScoreSync::new(endpoint.clone()) {
            Ok(sync) => {
                info!(endpoint = %endpoint, "Score sync enabled");
                progress = progress.with_sync(Arc::new(sync));
            }
            Err(e) => warn!(error = %e, "Score sync disabled"),
        }
    }
    Ok(progress)
}

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Current application state
    state: AppState,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let data_dir = config.kanji_data_dir()?;
        info!(dir = ?data_dir, "Reading kanji data");
        let source = FsDataSource::new(data_dir);
        let progress = open_progress(&config)?;
        let state = AppState::new(&config, Box::new(source), progress);

        let terminal = Self::setup_terminal().context("Failed to set up terminal")?;

        Ok(Self { config, state, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let theme = self.config.active_theme();
        let mut last_frame = Instant::now();

        loop {
            self.terminal.draw(|frame| {
                ui::draw(frame, &mut self.state, &theme);
            })?;

            if event::poll(FRAME)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = key_with_modifier_to_action(key.code, key.modifiers) {
                            if self.state.handle_action(action) {
                                break;
                            }
                        }
                    }
                }
            }

            let now = Instant::now();
            let elapsed = now.duration_since(last_frame);
            last_frame = now;
            self.state.tick(elapsed.as_secs_f64() * 1000.0);

            // Let spawned score sync tasks make progress
            tokio::task::yield_now().await;
        }

        self.state.progress.save();
        self.restore_terminal()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
