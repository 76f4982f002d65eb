//! Central application state and the Elm-architecture event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{AppEvent, Notification, NotificationLevel};
use super::theme;
use super::views::dice::DiceModalState;
use super::views::tracker::{TrackerResult, TrackerViewState};
use crate::core::dice::DiceRoller;
use crate::core::roster::Roster;

/// Ticks a notification stays visible (~3s at the default tick rate).
const NOTIFICATION_TTL_TICKS: u32 = 60;
/// At most this many notifications render at once.
const MAX_VISIBLE_NOTIFICATIONS: usize = 3;

/// Central application state.
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Combat tracker view state (the main surface).
    pub tracker: TrackerViewState,
    /// Dice roller modal state (Some when open).
    pub dice: Option<DiceModalState>,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Active notifications.
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Receiver for app events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for pushing events from within the app.
    #[allow(dead_code)]
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Optional fixed seed; the dice modal derives its roller from it.
    dice_seed: Option<u64>,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        roster: Roster,
        dice_seed: Option<u64>,
    ) -> Self {
        let tracker_roller = match dice_seed {
            Some(seed) => DiceRoller::seeded(seed),
            None => DiceRoller::new(),
        };
        Self {
            running: true,
            tracker: TrackerViewState::new(roster, tracker_roller),
            dice: None,
            show_help: false,
            notifications: Vec::new(),
            notification_counter: 0,
            event_rx,
            event_tx,
            dice_seed,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => self.handle_input(&crossterm_event),
            AppEvent::Notification(notification) => {
                self.notifications.push(notification);
            }
            AppEvent::Tick => self.on_tick(),
            AppEvent::Quit => self.running = false,
        }
    }

    fn handle_input(&mut self, event: &Event) {
        // Priority 1: help modal consumes everything
        if self.show_help {
            if is_key_press(event) {
                self.show_help = false;
            }
            return;
        }

        // Priority 2: dice roller modal
        if let Some(ref mut dice) = self.dice {
            if !dice.handle_input(event) {
                self.dice = None;
            }
            return;
        }

        // Priority 3: tracker view
        match self.tracker.handle_input(event) {
            TrackerResult::Consumed => return,
            TrackerResult::Notify(level, message) => {
                self.notify(level, message);
                return;
            }
            TrackerResult::Ignored => {}
        }

        // Priority 4: global keybindings
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = event
        {
            if *modifiers == KeyModifiers::CONTROL && *code == KeyCode::Char('d') {
                self.open_dice_roller();
                return;
            }
            match code {
                KeyCode::Char('q') => self.running = false,
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            }
        }
    }

    fn open_dice_roller(&mut self) {
        // A fresh roller per open; the seed is offset so the modal does not
        // replay the tracker's monster-initiative stream.
        let roller = match self.dice_seed {
            Some(seed) => DiceRoller::seeded(seed.wrapping_add(1)),
            None => DiceRoller::new(),
        };
        self.dice = Some(DiceModalState::new(roller));
    }

    fn on_tick(&mut self) {
        for notification in &mut self.notifications {
            notification.ttl_ticks = notification.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        if let Some(ref mut dice) = self.dice {
            dice.on_tick();
        }
    }

    fn notify(&mut self, level: NotificationLevel, message: String) {
        log::debug!("notification: {message}");
        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL_TICKS,
        });
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let rows = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.render_header(frame, rows[0]);
        self.tracker.render(frame, rows[1]);
        self.render_status_bar(frame, rows[2]);

        if let Some(ref dice) = self.dice {
            dice.render(frame, rows[1]);
        }
        if self.show_help {
            self.render_help(frame, rows[1]);
        }
        self.render_notifications(frame, rows[1]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let session = self.tracker.session();
        let status = if session.active {
            let name = session.current().map(|c| c.name.as_str()).unwrap_or("—");
            Span::styled(
                format!("⚔ combat — turn: {name}"),
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("no active combat", theme::muted())
        };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(" Grimoire ", theme::title()),
            Span::styled("— encounter tracker  ", theme::muted()),
            status,
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(theme::border_default()));
        frame.render_widget(header, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled(" q", theme::key_hint()),
            Span::styled(":quit ", theme::dim()),
            Span::styled("?", theme::key_hint()),
            Span::styled(":help ", theme::dim()),
            Span::styled("Ctrl+D", theme::key_hint()),
            Span::styled(":dice", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        let visible = self
            .notifications
            .iter()
            .rev()
            .take(MAX_VISIBLE_NOTIFICATIONS);

        for (i, notification) in visible.enumerate() {
            let color = match notification.level {
                NotificationLevel::Info => theme::INFO,
                NotificationLevel::Success => theme::SUCCESS,
                NotificationLevel::Warning => theme::WARNING,
                NotificationLevel::Error => theme::ERROR,
            };
            let width = (notification.message.chars().count() as u16 + 4)
                .min(area.width.saturating_sub(2));
            let x = area.x + area.width.saturating_sub(width + 1);
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let rect = Rect::new(x, y, width, 1);
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {} ", notification.message),
                    Style::default().fg(theme::BG_BASE).bg(color),
                )),
                rect,
            );
        }
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let width = 46.min(area.width.saturating_sub(4));
        let height = 18.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let modal = Rect::new(x, y, width, height);

        frame.render_widget(Clear, modal);
        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_SURFACE));

        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let entries: &[(&str, &str)] = &[
            ("s / Enter", "start combat"),
            ("e", "end combat"),
            ("a", "add combatant to initiative"),
            ("r", "roll initiative for all monsters"),
            ("Space / n", "next turn"),
            ("p", "previous turn"),
            ("j / k", "select combatant"),
            ("+ / -", "quick heal / damage"),
            ("D / h", "typed damage / heal"),
            ("x", "toggle death"),
            ("v", "toggle hidden"),
            ("c / u", "apply / remove status"),
            ("S / L", "short / long rest"),
            ("Ctrl+D", "dice roller"),
            ("q", "quit"),
        ];

        let lines: Vec<Line> = entries
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!(" {key:>10}  "), theme::key_hint()),
                    Span::styled(action.to_string(), Style::default().fg(theme::TEXT)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn is_key_press(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            ..
        })
    )
}

// ============================================================================
// Tests
// ============================================================================
