use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::catalog;
use crate::models::{SettingKey, StudioSettings};

use super::components::Selection;
use super::layout::panel;

#[derive(Default)]
pub struct SettingsState {
    selection: Selection,
}

pub enum SettingsAction {
    Toggle(SettingKey),
}

impl SettingsState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The notice posted after a switch flips, e.g. "Ai Enabled Updated".
pub fn updated_notice(key: SettingKey) -> String {
    format!("{key} Updated")
}

pub fn render_settings<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut SettingsState, settings: &StudioSettings) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(area);

    let items: Vec<ListItem> = SettingKey::ALL
        .iter()
        .map(|key| {
            let (mark, color) = if settings.get(*key) {
                ("[on] ", Color::Green)
            } else {
                ("[off]", Color::DarkGray)
            };
            ListItem::new(Spans::from(vec![
                Span::styled(mark, Style::default().fg(color)),
                Span::raw(format!(" {key}")),
            ]))
        })
        .collect();

    state.selection.clamp(SettingKey::ALL.len());
    let mut list_state = state.selection.list_state();
    let list = List::new(items)
        .block(panel("System"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, columns[0], &mut list_state);

    let plans = catalog::plans();
    let constraints: Vec<Constraint> = plans
        .iter()
        .map(|_| Constraint::Ratio(1, plans.len().max(1) as u32))
        .collect();
    let cards = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(columns[1]);

    for (plan, card) in plans.iter().zip(cards.iter()) {
        let mut header = vec![
            Span::styled(plan.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {}/mo", plan.price)),
        ];
        if plan.is_popular {
            header.push(Span::styled("  Most Popular", Style::default().fg(Color::Magenta)));
        }

        let lines = vec![
            Spans::from(header),
            Spans::from(Span::styled(plan.features.join(" · "), Style::default().fg(Color::Gray))),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(panel("Subscription")),
            *card,
        );
    }
}

pub fn buttons() -> &'static str {
    "<Up/Down> Select | <Enter/Space> Toggle | <1-7> Navigate | <X> Sign Out | <Q> Quit"
}

pub fn handle_key(state: &mut SettingsState, key: KeyEvent) -> Option<SettingsAction> {
    let len = SettingKey::ALL.len();
    match key.code {
        KeyCode::Down => state.selection.next(len),
        KeyCode::Up => state.selection.previous(len),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let index = state.selection.clamp(len)?;
            return SettingKey::ALL.get(index).copied().map(SettingsAction::Toggle);
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    #[test]
    fn notice_uses_the_spaced_key_name() {
        assert_eq!(updated_notice(SettingKey::AiEnabled), "Ai Enabled Updated");
        assert_eq!(updated_notice(SettingKey::CloudBackup), "Cloud Backup Updated");
    }

    #[test]
    fn toggle_targets_the_selected_key() {
        let mut state = SettingsState::new();
        handle_key(&mut state, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        handle_key(&mut state, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));

        match handle_key(&mut state, KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)) {
            Some(SettingsAction::Toggle(key)) => assert_eq!(key, SettingKey::AutoSync),
            None => panic!("expected a toggle"),
        }
    }
}
