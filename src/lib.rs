/// Grimoire — terminal combat & initiative tracker for game masters.
///
/// Core library providing the combat session state machine, dice rolling,
/// campaign roster loading, and the ratatui front end.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
