//! Dice Roller modal overlay.
//!
//! Global overlay toggled by `Ctrl+D`. Quick keys roll the standard dice;
//! the latest result flashes front and center, with NAT 20 / NAT 1 called
//! out, above a bounded history.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::dice::{DiceRoller, DieRoll};
use crate::tui::theme;

/// Maximum number of history entries to keep.
const MAX_HISTORY: usize = 12;

/// Ticks the latest result stays emphasized.
const FLASH_TICKS: u32 = 30;

/// Quick-roll key mappings: (key, sides).
const QUICK_ROLLS: &[(char, u32)] = &[
    ('4', 4),
    ('6', 6),
    ('8', 8),
    ('0', 10),
    ('2', 12),
    ('d', 20),
];

/// State for the dice roller modal.
pub struct DiceModalState {
    roller: DiceRoller,
    last: Option<DieRoll>,
    history: Vec<DieRoll>,
    /// Emphasis countdown for the latest result.
    flash_ticks: u32,
}

impl DiceModalState {
    pub fn new(roller: DiceRoller) -> Self {
        Self {
            roller,
            last: None,
            history: Vec::new(),
            flash_ticks: 0,
        }
    }

    /// Handle input events. Returns `true` if the event was consumed.
    /// Returns `false` for Esc / Ctrl+D (caller should close the modal).
    pub fn handle_input(&mut self, event: &Event) -> bool {
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = event
        {
            // Ctrl+D closes (toggle behavior)
            if *modifiers == KeyModifiers::CONTROL && *code == KeyCode::Char('d') {
                return false;
            }

            match code {
                KeyCode::Esc => return false,
                KeyCode::Char(c) => {
                    if let Some((_, sides)) = QUICK_ROLLS.iter().find(|(k, _)| k == c) {
                        self.roll(*sides);
                    }
                }
                _ => {}
            }
            true
        } else {
            false
        }
    }

    /// Decay the result flash each tick.
    pub fn on_tick(&mut self) {
        self.flash_ticks = self.flash_ticks.saturating_sub(1);
    }

    fn roll(&mut self, sides: u32) {
        let roll = self.roller.roll(sides);
        self.last = Some(roll);
        self.flash_ticks = FLASH_TICKS;
        self.history.push(roll);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
    }

    /// Render the dice roller as a centered modal overlay.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_modal(50, 60, area);
        frame.render_widget(Clear, modal);

        let block = Block::default()
            .title(" 🎲 Dice Roller ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::PRIMARY))
            .style(Style::default().bg(theme::BG_SURFACE));

        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let chunks = Layout::vertical([
            Constraint::Length(4), // Latest result
            Constraint::Length(2), // Quick keys
            Constraint::Min(2),    // History
            Constraint::Length(1), // Hint
        ])
        .split(inner);

        self.render_result(frame, chunks[0]);
        self.render_quick_keys(frame, chunks[1]);
        self.render_history(frame, chunks[2]);
        self.render_hint(frame, chunks[3]);
    }

    fn render_result(&self, frame: &mut Frame, area: Rect) {
        let Some(roll) = self.last else {
            let lines = vec![
                Line::raw(""),
                Line::from(Span::styled("Pick a die to roll", theme::dim())),
            ];
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
            return;
        };

        let flashing = self.flash_ticks > 0;
        let result_style = if roll.is_critical {
            Style::default()
                .fg(theme::SUCCESS)
                .add_modifier(Modifier::BOLD)
        } else if roll.is_fumble {
            Style::default()
                .fg(theme::ERROR)
                .add_modifier(Modifier::BOLD)
        } else if flashing {
            theme::title()
        } else {
            Style::default().fg(theme::TEXT)
        };

        let mut lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::styled(format!("{} → ", roll.notation()), theme::muted()),
                Span::styled(roll.result.to_string(), result_style),
            ]),
        ];
        if roll.is_critical {
            lines.push(Line::from(Span::styled("NAT 20! Critical!", result_style)));
        } else if roll.is_fumble {
            lines.push(Line::from(Span::styled("NAT 1! Fumble!", result_style)));
        }

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn render_quick_keys(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(" Quick: ", theme::muted())];
        for (key, sides) in QUICK_ROLLS {
            spans.push(Span::styled(key.to_string(), theme::key_hint()));
            spans.push(Span::styled(format!(":d{sides} "), theme::dim()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        if self.history.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" No rolls yet", theme::dim())),
                area,
            );
            return;
        }

        let visible = area.height as usize;
        let lines: Vec<Line> = self
            .history
            .iter()
            .rev()
            .take(visible)
            .map(|roll| {
                let marker = if roll.is_critical {
                    Span::styled(" ★", Style::default().fg(theme::SUCCESS))
                } else if roll.is_fumble {
                    Span::styled(" ✗", Style::default().fg(theme::ERROR))
                } else {
                    Span::raw("")
                };
                Line::from(vec![
                    Span::styled(format!(" {:>4}: ", roll.notation()), theme::muted()),
                    Span::styled(
                        roll.result.to_string(),
                        Style::default().fg(theme::TEXT),
                    ),
                    marker,
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_hint(&self, frame: &mut Frame, area: Rect) {
        let hint = Line::from(vec![
            Span::styled(" Esc", theme::key_hint()),
            Span::styled(":close", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(hint), area);
    }
}

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dice::STANDARD_DICE;

    fn state() -> DiceModalState {
        DiceModalState::new(DiceRoller::seeded(21))
    }

    fn press(state: &mut DiceModalState, code: KeyCode) -> bool {
        state.handle_input(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert!(state.last.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_quick_roll_d20() {
        let mut state = state();
        assert!(press(&mut state, KeyCode::Char('d')));
        let roll = state.last.unwrap();
        assert_eq!(roll.sides, 20);
        assert!((1..=20).contains(&roll.result));
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.flash_ticks, FLASH_TICKS);
    }

    #[test]
    fn test_all_quick_keys_roll() {
        let mut state = state();
        for (key, sides) in QUICK_ROLLS {
            press(&mut state, KeyCode::Char(*key));
            assert_eq!(state.last.unwrap().sides, *sides);
        }
        assert_eq!(state.history.len(), QUICK_ROLLS.len());
    }

    #[test]
    fn test_quick_keys_cover_standard_dice() {
        let mapped: Vec<u32> = QUICK_ROLLS.iter().map(|(_, sides)| *sides).collect();
        assert_eq!(mapped, STANDARD_DICE);
    }

    #[test]
    fn test_unmapped_key_consumed_without_roll() {
        let mut state = state();
        assert!(press(&mut state, KeyCode::Char('z')));
        assert!(state.last.is_none());
    }

    #[test]
    fn test_history_cap() {
        let mut state = state();
        for _ in 0..(MAX_HISTORY + 8) {
            press(&mut state, KeyCode::Char('6'));
        }
        assert_eq!(state.history.len(), MAX_HISTORY);
    }

    #[test]
    fn test_esc_and_ctrl_d_close() {
        let mut state = state();
        assert!(!press(&mut state, KeyCode::Esc));
        let ctrl_d = Event::Key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(!state.handle_input(&ctrl_d));
    }

    #[test]
    fn test_flash_decays() {
        let mut state = state();
        press(&mut state, KeyCode::Char('d'));
        for _ in 0..FLASH_TICKS {
            state.on_tick();
        }
        assert_eq!(state.flash_ticks, 0);
        state.on_tick(); // saturates
        assert_eq!(state.flash_ticks, 0);
    }

    #[test]
    fn test_crit_flags_match_result() {
        let mut state = state();
        for _ in 0..300 {
            press(&mut state, KeyCode::Char('d'));
            let roll = state.last.unwrap();
            assert_eq!(roll.is_critical, roll.result == 20);
            assert_eq!(roll.is_fumble, roll.result == 1);
        }
    }
}
