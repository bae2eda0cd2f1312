use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent};
use reqwest::Url;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::metrics::money;
use crate::models::LeadIntake;
use crate::sync::{DashboardData, Dataset};

use super::components::{Selection, TextInputState};
use super::layout::{panel, sourced_panel};

pub const DEFAULT_AD_TEXT: &str = "Hi Canti! I saw your Combo 1 ad and...";

pub struct MarketingState {
    selection: Selection,
    converted: HashSet<String>,
    pub ad_text: TextInputState,
    whatsapp_number: String,
}

pub enum MarketingAction {
    /// The lead was dropped from the intake queue
    Converted(String),
}

/// A `wa.me` deep link that opens a chat with `text` prefilled.
///
/// Spaces are encoded as `%20` so the link survives apps that do not treat
/// `+` as a space.
pub fn whatsapp_link(number: &str, text: &str) -> Option<String> {
    let mut url = Url::parse(&format!("https://wa.me/{number}")).ok()?;
    url.query_pairs_mut().append_pair("text", text);
    let query = url.query().unwrap_or_default().replace('+', "%20");
    url.set_query(Some(&query));
    Some(url.to_string())
}

impl MarketingState {
    pub fn new(whatsapp_number: &str) -> Self {
        Self {
            selection: Selection::default(),
            converted: HashSet::new(),
            ad_text: TextInputState::with_value(DEFAULT_AD_TEXT),
            whatsapp_number: whatsapp_number.to_string(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.ad_text.editing
    }

    /// Leads still waiting in the intake queue.
    pub fn queue<'a>(&self, data: &'a DashboardData) -> Vec<&'a LeadIntake> {
        data.leads()
            .iter()
            .filter(|lead| !self.converted.contains(&lead.id))
            .collect()
    }

    pub fn link(&self) -> Option<String> {
        whatsapp_link(&self.whatsapp_number, &self.ad_text.value)
    }

    fn convert_selected(&mut self, data: &DashboardData) -> Option<MarketingAction> {
        let queue = self.queue(data);
        let index = self.selection.clamp(queue.len())?;
        let lead = queue.get(index)?;
        let name = lead.name.clone();
        self.converted.insert(lead.id.clone());

        let remaining = queue.len() - 1;
        self.selection.clamp(remaining);
        Some(MarketingAction::Converted(name))
    }
}

pub fn render_marketing<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut MarketingState, data: &DashboardData) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(area);

    let queue = state.queue(data);
    state.selection.clamp(queue.len());

    let items: Vec<ListItem> = if queue.is_empty() {
        vec![ListItem::new(Span::styled(
            "Queue Clear. No active intakes.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        queue
            .iter()
            .map(|lead| {
                let budget = lead.initial_budget.map(money).unwrap_or_else(|| "N/A".to_string());
                ListItem::new(vec![
                    Spans::from(vec![
                        Span::styled(lead.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(format!("  {budget}")),
                    ]),
                    Spans::from(Span::styled(
                        format!("  {} · {} · {} · {}", lead.platform, lead.source, lead.date, lead.status),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect()
    };

    let list = List::new(items)
        .block(sourced_panel("Recent Intake Queue", data.source(Dataset::Leads)))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    let mut list_state = state.selection.list_state();
    frame.render_stateful_widget(list, columns[0], &mut list_state);

    let link = state
        .link()
        .unwrap_or_else(|| "Invalid WhatsApp number".to_string());
    let builder = Paragraph::new(vec![
        Spans::from(Span::styled(
            "Deep links for ads with a preset message.",
            Style::default().fg(Color::Gray),
        )),
        Spans::from(""),
        state.ad_text.spans("Initial Text", true),
        Spans::from(""),
        Spans::from(Span::styled(link, Style::default().fg(Color::Green))),
    ])
    .wrap(Wrap { trim: false })
    .block(panel("Quick Link Builder"));
    frame.render_widget(builder, columns[1]);
}

pub fn buttons(state: &MarketingState) -> &'static str {
    if state.is_editing() {
        "<Enter> Done | <Esc> Cancel editing"
    } else {
        "<Up/Down> Select | <C> Convert Lead | <E> Edit Ad Text | <1-7> Navigate | <Q> Quit"
    }
}

pub fn handle_key(state: &mut MarketingState, key: KeyEvent, data: &DashboardData) -> Option<MarketingAction> {
    if state.is_editing() {
        state.ad_text.handle_input(key.code);
        return None;
    }

    let len = state.queue(data).len();
    match key.code {
        KeyCode::Down => state.selection.next(len),
        KeyCode::Up => state.selection.previous(len),
        KeyCode::Char('c') => return state.convert_selected(data),
        KeyCode::Char('e') => state.ad_text.toggle_editing(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(state: &mut MarketingState, code: KeyCode, data: &DashboardData) -> Option<MarketingAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE), data)
    }

    #[test]
    fn link_percent_encodes_the_ad_text() {
        let link = whatsapp_link("1234567890", "Hi Canti! Combo 1 & more?").unwrap();
        assert_eq!(
            link,
            "https://wa.me/1234567890?text=Hi%20Canti%21%20Combo%201%20%26%20more%3F"
        );
    }

    #[test]
    fn literal_plus_survives_encoding() {
        let link = whatsapp_link("1234567890", "1+1").unwrap();
        assert_eq!(link, "https://wa.me/1234567890?text=1%2B1");
    }

    #[test]
    fn converting_removes_the_lead_locally() {
        let data = DashboardData::default();
        let mut state = MarketingState::new("1234567890");
        let before = state.queue(&data).len();
        let first = state.queue(&data)[0].name.clone();

        match press(&mut state, KeyCode::Char('c'), &data) {
            Some(MarketingAction::Converted(name)) => assert_eq!(name, first),
            None => panic!("expected a conversion"),
        }
        assert_eq!(state.queue(&data).len(), before - 1);
        assert_eq!(data.leads().len(), before);
    }

    #[test]
    fn converting_an_empty_queue_does_nothing() {
        let data = DashboardData::default();
        let mut state = MarketingState::new("1234567890");
        for _ in 0..data.leads().len() {
            press(&mut state, KeyCode::Char('c'), &data);
        }
        assert!(press(&mut state, KeyCode::Char('c'), &data).is_none());
    }
}
