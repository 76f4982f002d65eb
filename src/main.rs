use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use grimoire::config::AppConfig;
use grimoire::core::logging;
use grimoire::core::roster::Roster;
use grimoire::tui::app::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to file only; the TUI owns the terminal
    let _log_guard = logging::init_tui();
    log::info!("{} v{} starting", grimoire::NAME, grimoire::VERSION);

    let config = AppConfig::load();
    let roster = load_roster(&config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut app = AppState::new(event_rx, event_tx, roster, config.dice.seed);
    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    log::info!("{} exiting", grimoire::NAME);
    Ok(())
}

/// The configured roster file, or the built-in demo when unset or broken.
fn load_roster(config: &AppConfig) -> Roster {
    match &config.campaign.roster_path {
        Some(path) => match Roster::load(path) {
            Ok(roster) => {
                log::info!(
                    "Loaded roster from {} ({} players, {} monsters)",
                    path.display(),
                    roster.players.len(),
                    roster.monsters.len()
                );
                roster
            }
            Err(e) => {
                log::warn!("{e} — falling back to the demo roster");
                Roster::demo()
            }
        },
        None => Roster::demo(),
    }
}
