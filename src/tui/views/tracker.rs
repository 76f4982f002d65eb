//! Master Actions view: combat control, the initiative order, and rests.
//!
//! Owns the backend `CombatSession` plus the campaign `Roster` and a
//! `DiceRoller` for monster initiative. Input works in sub-modes:
//! Normal → AddEntry / Damage / Heal / AddStatus / RemoveStatus overlays.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::combat::{Combatant, CombatantKind, CombatSession, NewCombatant};
use crate::core::dice::DiceRoller;
use crate::core::roster::{Roster, RosterItem};
use crate::tui::events::NotificationLevel;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

/// HP step for the quick +/- keys.
const QUICK_HP_STEP: i32 = 5;

/// Labels offered by the apply-status picker. "Dead" is deliberately
/// absent: the death toggle is its own action.
const STATUS_CHOICES: &[&str] = &[
    "Blessed",
    "Poisoned",
    "Stunned",
    "Frightened",
    "Prone",
    "Restrained",
    "Invisible",
];

/// Input sub-mode of the tracker view.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    AddEntry,
    Damage,
    Heal,
    AddStatus,
    RemoveStatus,
}

/// Outcome of one input event, for the app shell to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerResult {
    /// The event was not for this view.
    Ignored,
    /// The event was handled.
    Consumed,
    /// Handled, and the shell should surface a message.
    Notify(NotificationLevel, String),
}

// ============================================================================
// View state
// ============================================================================

pub struct TrackerViewState {
    session: CombatSession,
    roster: Roster,
    roller: DiceRoller,
    mode: Mode,
    /// Selection in the initiative order.
    selected: usize,
    /// Picker cursor in the roster list (AddEntry mode).
    entity_cursor: usize,
    init_input: InputBuffer,
    amount_input: InputBuffer,
    /// Picker cursor in the status list (AddStatus/RemoveStatus modes).
    status_cursor: usize,
    entry_error: Option<String>,
}

impl TrackerViewState {
    pub fn new(roster: Roster, roller: DiceRoller) -> Self {
        Self {
            session: CombatSession::new(),
            roster,
            roller,
            mode: Mode::Normal,
            selected: 0,
            entity_cursor: 0,
            init_input: InputBuffer::new(),
            amount_input: InputBuffer::new(),
            status_cursor: 0,
            entry_error: None,
        }
    }

    pub fn session(&self) -> &CombatSession {
        &self.session
    }

    fn selected_combatant(&self) -> Option<&Combatant> {
        self.session.combatants.get(self.selected)
    }

    // ────────────────────────────────────────────────────────────────────
    // Input handling
    // ────────────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event) -> TrackerResult {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = event
        else {
            return TrackerResult::Ignored;
        };

        match self.mode {
            Mode::Normal => self.handle_normal(code, modifiers),
            Mode::AddEntry => self.handle_add_entry(code, modifiers),
            Mode::Damage | Mode::Heal => self.handle_amount(code),
            Mode::AddStatus | Mode::RemoveStatus => self.handle_status_picker(code),
        }
    }

    fn handle_normal(&mut self, code: &KeyCode, _modifiers: &KeyModifiers) -> TrackerResult {
        if !self.session.active {
            return match code {
                KeyCode::Enter | KeyCode::Char('s') => {
                    self.session.start();
                    self.selected = 0;
                    TrackerResult::Notify(
                        NotificationLevel::Info,
                        "Combat started — press a to add combatants".to_string(),
                    )
                }
                _ => TrackerResult::Ignored,
            };
        }

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.session.is_empty() {
                    self.selected = (self.selected + 1) % self.session.len();
                }
                TrackerResult::Consumed
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.session.is_empty() {
                    self.selected =
                        (self.selected + self.session.len() - 1) % self.session.len();
                }
                TrackerResult::Consumed
            }
            KeyCode::Char(' ') | KeyCode::Char('n') => match self.session.advance_turn() {
                Ok(turn) => {
                    self.selected = turn;
                    TrackerResult::Consumed
                }
                Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
            },
            KeyCode::Char('p') => match self.session.rewind_turn() {
                Ok(turn) => {
                    self.selected = turn;
                    TrackerResult::Consumed
                }
                Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
            },
            KeyCode::Char('a') => {
                if self.roster.is_empty() {
                    return TrackerResult::Notify(
                        NotificationLevel::Warning,
                        "The campaign roster is empty".to_string(),
                    );
                }
                self.mode = Mode::AddEntry;
                self.entity_cursor = 0;
                self.init_input.clear();
                self.entry_error = None;
                TrackerResult::Consumed
            }
            KeyCode::Char('r') => {
                match self
                    .session
                    .roll_for_monsters(&self.roster.monsters, &mut self.roller)
                {
                    Ok(0) => TrackerResult::Notify(
                        NotificationLevel::Info,
                        "All roster monsters are already in the order".to_string(),
                    ),
                    Ok(added) => TrackerResult::Notify(
                        NotificationLevel::Success,
                        format!("Rolled initiative for {added} monster(s)"),
                    ),
                    Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.quick_adjust(QUICK_HP_STEP),
            KeyCode::Char('-') => self.quick_adjust(-QUICK_HP_STEP),
            KeyCode::Char('D') => self.enter_amount_mode(Mode::Damage),
            KeyCode::Char('h') => self.enter_amount_mode(Mode::Heal),
            KeyCode::Char('x') => {
                let Some(id) = self.selected_combatant().map(|c| c.id.clone()) else {
                    return TrackerResult::Consumed;
                };
                match self.session.toggle_death(&id) {
                    Ok(true) => {
                        let name = self.session.get(&id).map(|c| c.name.clone()).unwrap_or(id);
                        TrackerResult::Notify(
                            NotificationLevel::Warning,
                            format!("{name} is down"),
                        )
                    }
                    Ok(false) => {
                        let name = self.session.get(&id).map(|c| c.name.clone()).unwrap_or(id);
                        TrackerResult::Notify(
                            NotificationLevel::Success,
                            format!("{name} revived with 1 HP"),
                        )
                    }
                    Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
                }
            }
            KeyCode::Char('v') => {
                let Some(id) = self.selected_combatant().map(|c| c.id.clone()) else {
                    return TrackerResult::Consumed;
                };
                match self.session.toggle_hidden(&id) {
                    Ok(_) => TrackerResult::Consumed,
                    Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
                }
            }
            KeyCode::Char('c') => {
                if self.selected_combatant().is_none() {
                    return TrackerResult::Consumed;
                }
                self.mode = Mode::AddStatus;
                self.status_cursor = 0;
                TrackerResult::Consumed
            }
            KeyCode::Char('u') => {
                let Some(combatant) = self.selected_combatant() else {
                    return TrackerResult::Consumed;
                };
                if combatant.status_effects.is_empty() {
                    return TrackerResult::Notify(
                        NotificationLevel::Info,
                        format!("{} has no status effects", combatant.name),
                    );
                }
                self.mode = Mode::RemoveStatus;
                self.status_cursor = 0;
                TrackerResult::Consumed
            }
            KeyCode::Char('S') => match self.session.short_rest() {
                Ok(()) => TrackerResult::Notify(
                    NotificationLevel::Success,
                    "Short rest: everyone recovers a quarter of max HP".to_string(),
                ),
                Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
            },
            KeyCode::Char('L') => match self.session.long_rest() {
                Ok(()) => TrackerResult::Notify(
                    NotificationLevel::Success,
                    "Long rest: full HP, statuses cleared".to_string(),
                ),
                Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
            },
            KeyCode::Char('e') => {
                self.session.end();
                self.selected = 0;
                TrackerResult::Notify(NotificationLevel::Info, "Combat ended".to_string())
            }
            _ => TrackerResult::Ignored,
        }
    }

    /// Quick ±5: skipped for flagged-dead combatants, the way the panel's
    /// buttons gray out. Typed amounts (D/h) still reach them.
    fn quick_adjust(&mut self, delta: i32) -> TrackerResult {
        let Some(combatant) = self.selected_combatant() else {
            return TrackerResult::Consumed;
        };
        if combatant.is_dead() {
            return TrackerResult::Notify(
                NotificationLevel::Info,
                format!("{} is dead — revive with x first", combatant.name),
            );
        }
        let id = combatant.id.clone();
        match self.session.adjust_hp(&id, delta) {
            Ok(_) => TrackerResult::Consumed,
            Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
        }
    }

    fn enter_amount_mode(&mut self, mode: Mode) -> TrackerResult {
        if self.selected_combatant().is_none() {
            return TrackerResult::Consumed;
        }
        self.mode = mode;
        self.amount_input.clear();
        TrackerResult::Consumed
    }

    fn handle_add_entry(&mut self, code: &KeyCode, modifiers: &KeyModifiers) -> TrackerResult {
        // Ctrl+R rolls a d20 into the initiative field
        if *modifiers == KeyModifiers::CONTROL && *code == KeyCode::Char('r') {
            let roll = self.roller.roll(20);
            self.init_input.clear();
            for c in roll.result.to_string().chars() {
                self.init_input.insert_char(c);
            }
            self.entry_error = None;
            return TrackerResult::Consumed;
        }

        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                TrackerResult::Consumed
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let len = self.roster.len();
                self.entity_cursor = (self.entity_cursor + len - 1) % len;
                TrackerResult::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.entity_cursor = (self.entity_cursor + 1) % self.roster.len();
                TrackerResult::Consumed
            }
            KeyCode::Enter => self.submit_entry(),
            KeyCode::Backspace => {
                self.init_input.backspace();
                self.entry_error = None;
                TrackerResult::Consumed
            }
            KeyCode::Left => {
                self.init_input.move_left();
                TrackerResult::Consumed
            }
            KeyCode::Right => {
                self.init_input.move_right();
                TrackerResult::Consumed
            }
            KeyCode::Char(c) if c.is_ascii_digit() || *c == '-' => {
                self.init_input.insert_char(*c);
                self.entry_error = None;
                TrackerResult::Consumed
            }
            _ => TrackerResult::Consumed,
        }
    }

    fn submit_entry(&mut self) -> TrackerResult {
        let items = self.roster.items();
        let Some(item) = items.get(self.entity_cursor) else {
            return TrackerResult::Consumed;
        };

        let request = match NewCombatant::parse(
            &item.id,
            &item.name,
            item.kind,
            self.init_input.text(),
            item.max_hp,
        ) {
            Ok(request) => request,
            Err(e) => {
                self.entry_error = Some(e.to_string());
                return TrackerResult::Consumed;
            }
        };
        let initiative = request.initiative;

        match self.session.add_combatant(request) {
            Ok(()) => {
                self.init_input.clear();
                self.entry_error = None;
                TrackerResult::Notify(
                    NotificationLevel::Success,
                    format!("{} joins at initiative {initiative}", item.name),
                )
            }
            Err(e) => {
                self.entry_error = Some(e.to_string());
                TrackerResult::Consumed
            }
        }
    }

    fn handle_amount(&mut self, code: &KeyCode) -> TrackerResult {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                TrackerResult::Consumed
            }
            KeyCode::Enter => {
                let healing = self.mode == Mode::Heal;
                self.mode = Mode::Normal;
                let text = self.amount_input.take();
                let Ok(amount) = text.trim().parse::<i32>() else {
                    return TrackerResult::Notify(
                        NotificationLevel::Error,
                        "Amount must be a number".to_string(),
                    );
                };
                let Some(combatant) = self.selected_combatant() else {
                    return TrackerResult::Consumed;
                };
                let (id, name) = (combatant.id.clone(), combatant.name.clone());
                let delta = if healing { amount } else { -amount };
                match self.session.adjust_hp(&id, delta) {
                    Ok(hp) => {
                        let max = self.session.get(&id).map(|c| c.max_hp).unwrap_or(hp);
                        let verb = if healing { "healed" } else { "took" };
                        let noun = if healing { "HP" } else { "damage" };
                        TrackerResult::Notify(
                            NotificationLevel::Info,
                            format!("{name} {verb} {amount} {noun} → {hp}/{max}"),
                        )
                    }
                    Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
                }
            }
            KeyCode::Backspace => {
                self.amount_input.backspace();
                TrackerResult::Consumed
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.amount_input.insert_char(*c);
                TrackerResult::Consumed
            }
            _ => TrackerResult::Consumed,
        }
    }

    fn handle_status_picker(&mut self, code: &KeyCode) -> TrackerResult {
        let options = self.status_options();
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                TrackerResult::Consumed
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if !options.is_empty() {
                    self.status_cursor =
                        (self.status_cursor + options.len() - 1) % options.len();
                }
                TrackerResult::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if !options.is_empty() {
                    self.status_cursor = (self.status_cursor + 1) % options.len();
                }
                TrackerResult::Consumed
            }
            KeyCode::Enter => {
                let removing = self.mode == Mode::RemoveStatus;
                self.mode = Mode::Normal;
                let Some(label) = options.get(self.status_cursor).cloned() else {
                    return TrackerResult::Consumed;
                };
                let Some(combatant) = self.selected_combatant() else {
                    return TrackerResult::Consumed;
                };
                let (id, name) = (combatant.id.clone(), combatant.name.clone());
                let result = if removing {
                    self.session.remove_status(&id, &label).map(|removed| {
                        if removed {
                            format!("{name} is no longer {label}")
                        } else {
                            format!("{name} was not {label}")
                        }
                    })
                } else {
                    self.session
                        .add_status(&id, label.clone())
                        .map(|()| format!("{name} is {label}"))
                };
                match result {
                    Ok(message) => TrackerResult::Notify(NotificationLevel::Info, message),
                    Err(e) => TrackerResult::Notify(NotificationLevel::Warning, e.to_string()),
                }
            }
            _ => TrackerResult::Consumed,
        }
    }

    /// The picker's contents: the fixed catalog when applying, the
    /// combatant's current labels when removing.
    fn status_options(&self) -> Vec<String> {
        match self.mode {
            Mode::RemoveStatus => self
                .selected_combatant()
                .map(|c| c.status_effects.clone())
                .unwrap_or_default(),
            _ => STATUS_CHOICES.iter().map(|s| s.to_string()).collect(),
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Rendering
    // ────────────────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.session.active {
            self.render_idle(frame, area);
            return;
        }

        let block = theme::block_focused("Combat Tracker");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(2), // Turn header + hints
            Constraint::Min(3),    // Order + detail
        ])
        .split(inner);

        self.render_turn_header(frame, rows[0]);

        let cols =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(rows[1]);
        self.render_order(frame, cols[0]);
        self.render_detail(frame, cols[1]);

        match self.mode {
            Mode::AddEntry => self.render_add_entry(frame, inner),
            Mode::Damage | Mode::Heal => self.render_amount_modal(frame, inner),
            Mode::AddStatus | Mode::RemoveStatus => self.render_status_picker(frame, inner),
            Mode::Normal => {}
        }
    }

    fn render_idle(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_default("Combat Tracker");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                "⚔ No Active Combat",
                Style::default()
                    .fg(theme::TEXT_MUTED)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("s", theme::key_hint()),
                Span::raw(" or "),
                Span::styled("Enter", theme::key_hint()),
                Span::raw(" to start an encounter"),
            ]),
            Line::raw(""),
            Line::from(Span::styled(
                format!(
                    "Roster: {} player(s), {} monster(s)",
                    self.roster.players.len(),
                    self.roster.monsters.len()
                ),
                theme::muted(),
            )),
            Line::from(vec![
                Span::styled("Ctrl+D", theme::key_hint()),
                Span::styled(" opens the dice roller", theme::dim()),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn render_turn_header(&self, frame: &mut Frame, area: Rect) {
        let current_name = self
            .session
            .current()
            .map(|c| c.name.as_str())
            .unwrap_or("—");

        let line = Line::from(vec![
            Span::styled(" Turn: ", theme::muted()),
            Span::styled(current_name.to_string(), theme::highlight()),
            Span::styled("  │ ", theme::dim()),
            Span::styled(
                format!("{} in the order", self.session.len()),
                theme::muted(),
            ),
        ]);

        let hint = Line::from(vec![
            Span::styled(" Space", theme::key_hint()),
            Span::styled(":next ", theme::dim()),
            Span::styled("p", theme::key_hint()),
            Span::styled(":prev ", theme::dim()),
            Span::styled("a", theme::key_hint()),
            Span::styled(":add ", theme::dim()),
            Span::styled("r", theme::key_hint()),
            Span::styled(":roll-monsters ", theme::dim()),
            Span::styled("D", theme::key_hint()),
            Span::styled(":dmg ", theme::dim()),
            Span::styled("h", theme::key_hint()),
            Span::styled(":heal ", theme::dim()),
            Span::styled("S/L", theme::key_hint()),
            Span::styled(":rest ", theme::dim()),
            Span::styled("e", theme::key_hint()),
            Span::styled(":end", theme::dim()),
        ]);

        frame.render_widget(Paragraph::new(vec![line, hint]), area);
    }

    fn render_order(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Initiative ")
            .borders(Borders::ALL)
            .border_style(theme::border_focused());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.session.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " No combatants — a to add, r to roll monsters",
                    theme::dim(),
                )),
                inner,
            );
            return;
        }

        let lines: Vec<Line> = self
            .session
            .combatants
            .iter()
            .enumerate()
            .map(|(i, c)| self.order_row(i, c, inner.width))
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn order_row(&self, index: usize, combatant: &Combatant, width: u16) -> Line<'static> {
        let is_current = index == self.session.turn;
        let is_selected = index == self.selected;

        let prefix = match (is_current, is_selected) {
            (true, true) => "▸▶",
            (true, false) => " ▶",
            (false, true) => "▸ ",
            (false, false) => "  ",
        };

        let name_style = if combatant.is_dead() {
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::CROSSED_OUT)
        } else if is_current {
            theme::title()
        } else if is_selected {
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT)
        };

        let mut spans = vec![
            Span::styled(prefix.to_string(), Style::default().fg(theme::PRIMARY)),
            Span::styled(
                format!("{:>3} ", combatant.initiative),
                Style::default().fg(theme::PRIMARY_LIGHT),
            ),
            Span::styled(
                format!("{} ", kind_icon(combatant.kind)),
                Style::default().fg(kind_color(combatant.kind)),
            ),
            Span::styled(
                truncate_name(&combatant.name, (width as usize).saturating_sub(18)),
                name_style,
            ),
        ];

        if combatant.hidden {
            spans.push(Span::styled(" (hidden)".to_string(), theme::dim()));
        } else {
            spans.push(Span::styled(
                format!(" {}/{}", combatant.hp, combatant.max_hp),
                Style::default().fg(theme::hp_color(combatant.hp_fraction())),
            ));
            let badges = compact_statuses(combatant);
            if !badges.is_empty() {
                spans.push(Span::styled(
                    format!(" {badges}"),
                    Style::default().fg(theme::STATUS),
                ));
            }
        }

        Line::from(spans)
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Detail ")
            .borders(Borders::ALL)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(c) = self.selected_combatant() else {
            frame.render_widget(
                Paragraph::new(Span::styled(" No combatant selected", theme::dim())),
                inner,
            );
            return;
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("{} ", kind_icon(c.kind)),
                Style::default().fg(kind_color(c.kind)),
            ),
            Span::styled(c.name.clone(), theme::title()),
            Span::styled(format!("  ({})", c.kind.label()), theme::muted()),
        ])];

        // HP bar
        let bar_width = (inner.width as usize).saturating_sub(14).min(30);
        let filled = (c.hp_fraction() * bar_width as f64) as usize;
        let empty = bar_width.saturating_sub(filled);
        let color = theme::hp_color(c.hp_fraction());
        lines.push(Line::from(vec![
            Span::styled(" HP: ", theme::muted()),
            Span::styled(
                format!("{}/{}", c.hp, c.max_hp),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::styled("░".repeat(empty), theme::dim()),
        ]));

        lines.push(Line::from(vec![
            Span::styled(" Init: ", theme::muted()),
            Span::styled(
                c.initiative.to_string(),
                Style::default().fg(theme::PRIMARY_LIGHT),
            ),
        ]));

        if c.hidden {
            lines.push(Line::from(Span::styled(
                " Hidden from players",
                theme::dim(),
            )));
        }
        if c.is_dead() {
            lines.push(Line::from(Span::styled(
                " ☠ Dead",
                Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
            )));
        }

        if !c.status_effects.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(" Status effects:", theme::heading())));
            for label in &c.status_effects {
                lines.push(Line::from(Span::styled(
                    format!("  • {label}"),
                    Style::default().fg(theme::STATUS),
                )));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(" x", theme::key_hint()),
            Span::styled(":death ", theme::dim()),
            Span::styled("v", theme::key_hint()),
            Span::styled(":hide ", theme::dim()),
            Span::styled("c", theme::key_hint()),
            Span::styled(":status ", theme::dim()),
            Span::styled("u", theme::key_hint()),
            Span::styled(":unstatus ", theme::dim()),
            Span::styled("+/-", theme::key_hint()),
            Span::styled(format!(":±{QUICK_HP_STEP}hp"), theme::dim()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_add_entry(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_modal(60, 70, area);
        frame.render_widget(Clear, modal);

        let block = Block::default()
            .title(" Add to Initiative ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_SURFACE));

        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let chunks = Layout::vertical([
            Constraint::Min(4),    // Entity picker
            Constraint::Length(3), // Initiative field
            Constraint::Length(1), // Error
            Constraint::Length(1), // Hints
        ])
        .split(inner);

        self.render_entity_picker(frame, chunks[0]);
        self.render_initiative_field(frame, chunks[1]);

        if let Some(ref err) = self.entry_error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {err}"),
                    Style::default().fg(theme::ERROR),
                )),
                chunks[2],
            );
        }

        let hint = Line::from(vec![
            Span::styled(" Enter", theme::key_hint()),
            Span::styled(":add ", theme::dim()),
            Span::styled("j/k", theme::key_hint()),
            Span::styled(":pick ", theme::dim()),
            Span::styled("Ctrl+R", theme::key_hint()),
            Span::styled(":roll d20 ", theme::dim()),
            Span::styled("Esc", theme::key_hint()),
            Span::styled(":close", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(hint), chunks[3]);
    }

    fn render_entity_picker(&self, frame: &mut Frame, area: Rect) {
        let items = self.roster.items();
        let visible = area.height as usize;
        let scroll = self.entity_cursor.saturating_sub(visible.saturating_sub(1));

        let lines: Vec<Line> = items
            .iter()
            .enumerate()
            .skip(scroll)
            .take(visible)
            .map(|(i, item)| self.picker_row(i, item))
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn picker_row(&self, index: usize, item: &RosterItem) -> Line<'static> {
        let is_sel = index == self.entity_cursor;
        let in_order = self.session.contains(&item.id);

        let prefix = if is_sel { " ▸ " } else { "   " };
        let name_style = if in_order {
            theme::dim()
        } else if is_sel {
            theme::highlight()
        } else {
            Style::default().fg(theme::TEXT)
        };

        let mut spans = vec![
            Span::styled(prefix.to_string(), Style::default().fg(theme::PRIMARY)),
            Span::styled(
                format!("{} ", kind_icon(item.kind)),
                Style::default().fg(kind_color(item.kind)),
            ),
            Span::styled(item.name.clone(), name_style),
            Span::styled(format!("  {}", item.detail), theme::muted()),
        ];
        if in_order {
            spans.push(Span::styled(" ✓ in order".to_string(), theme::dim()));
        }
        Line::from(spans)
    }

    fn render_initiative_field(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Initiative ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::PRIMARY_LIGHT));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = self.init_input.text();
        let line = if text.is_empty() {
            Line::from(Span::styled("roll or type a number...", theme::dim()))
        } else {
            Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(theme::TEXT),
            ))
        };
        frame.render_widget(Paragraph::new(line), inner);

        frame.set_cursor_position((
            inner.x + self.init_input.cursor_position() as u16,
            inner.y,
        ));
    }

    fn render_amount_modal(&self, frame: &mut Frame, area: Rect) {
        let (label, color) = match self.mode {
            Mode::Damage => ("Damage Amount", theme::ERROR),
            _ => ("Heal Amount", theme::SUCCESS),
        };

        let width = 30.min(area.width.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + area.height / 2 - 2;
        let modal = Rect::new(x, y, width, 4);

        frame.render_widget(Clear, modal);
        let block = Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme::BG_SURFACE));

        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let text = self.amount_input.text();
        let display = if text.is_empty() { "0" } else { text };
        frame.render_widget(
            Paragraph::new(Span::styled(
                display.to_string(),
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            )),
            inner,
        );

        frame.set_cursor_position((
            inner.x + self.amount_input.cursor_position() as u16,
            inner.y,
        ));
    }

    fn render_status_picker(&self, frame: &mut Frame, area: Rect) {
        let options = self.status_options();
        let title = match self.mode {
            Mode::RemoveStatus => " Remove Status ",
            _ => " Apply Status ",
        };

        let height = (options.len() as u16 + 2).min(area.height.saturating_sub(4));
        let width = 32.min(area.width.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let modal = Rect::new(x, y, width, height);

        frame.render_widget(Clear, modal);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::STATUS))
            .style(Style::default().bg(theme::BG_SURFACE));

        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let lines: Vec<Line> = options
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let is_sel = i == self.status_cursor;
                let prefix = if is_sel { "▸ " } else { "  " };
                let style = if is_sel {
                    theme::highlight()
                } else {
                    Style::default().fg(theme::TEXT)
                };
                Line::from(Span::styled(format!("{prefix}{label}"), style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Center a modal of given percentage within the area.
fn centered_modal(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let v = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(v[1])[1]
}

fn kind_icon(kind: CombatantKind) -> &'static str {
    match kind {
        CombatantKind::Player => "🛡",
        CombatantKind::Monster => "💀",
    }
}

fn kind_color(kind: CombatantKind) -> ratatui::style::Color {
    match kind {
        CombatantKind::Player => theme::INFO,
        CombatantKind::Monster => theme::ERROR,
    }
}

/// Compact status badges for order rows: first two letters of each label.
fn compact_statuses(combatant: &Combatant) -> String {
    combatant
        .status_effects
        .iter()
        .map(|label| {
            let mut chars = label.chars();
            match (chars.next(), chars.next()) {
                (Some(a), Some(b)) => format!("{}{}", a, b).to_uppercase(),
                (Some(a), None) => a.to_uppercase().to_string(),
                _ => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else if max > 1 {
        let cut: String = name.chars().take(max - 1).collect();
        format!("{cut}…")
    } else {
        name.chars().take(max).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
