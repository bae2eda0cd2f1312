use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::metrics::{self, ClientFilter};
use crate::models::{Brand, Client, ProjectStatus};
use crate::sync::{DashboardData, Dataset};

use super::components::Selection;
use super::layout::sourced_panel;

// Represents the state of the client directory screen
#[derive(Default)]
pub struct ClientsState {
    filter: ClientFilter,
    selection: Selection,
}

pub enum ClientAction {
    OpenClient(String),
}

/// Step `current` through `None` ("All") and then each of `all`.
fn cycle<T: Copy + PartialEq>(current: Option<T>, all: &[T]) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => {
            let i = all.iter().position(|v| *v == value).unwrap_or(all.len());
            all.get(i + 1).copied()
        }
    }
}

impl ClientsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> ClientFilter {
        self.filter
    }

    pub fn cycle_status(&mut self) {
        self.filter.status = cycle(self.filter.status, ProjectStatus::ALL);
        self.selection = Selection::default();
    }

    pub fn cycle_brand(&mut self) {
        self.filter.brand = cycle(self.filter.brand, Brand::ALL);
        self.selection = Selection::default();
    }

    fn visible<'a>(&self, data: &'a DashboardData) -> Vec<&'a Client> {
        self.filter.apply(data.clients())
    }
}

fn label<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "All".to_string())
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ClientsState, data: &DashboardData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)].as_ref())
        .split(area);

    let filters = Paragraph::new(Spans::from(vec![
        Span::raw(" Status: "),
        Span::styled(label(state.filter.status), Style::default().fg(Color::Yellow)),
        Span::raw("   Brand: "),
        Span::styled(label(state.filter.brand), Style::default().fg(Color::Yellow)),
    ]));
    frame.render_widget(filters, chunks[0]);

    let projects = data.projects();
    let clients = state.visible(data);
    state.selection.clamp(clients.len());

    let rows: Vec<Row> = clients
        .iter()
        .map(|client| {
            Row::new(vec![
                Cell::from(client.name.clone()),
                Cell::from(client.brand.to_string()),
                Cell::from(client.status.to_string()),
                Cell::from(client.genre_tags.join(", ")),
                Cell::from(client.source.clone()),
                Cell::from(metrics::money(metrics::lifetime_value(&client.id, &projects))),
            ])
        })
        .collect();

    let table = Table::new(rows)
        .header(
            Row::new(vec!["Name", "Brand", "Status", "Genres", "Source", "LTV"])
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        )
        .block(sourced_panel("Client Directory", data.source(Dataset::Clients)))
        .widths(&[
            Constraint::Percentage(20),
            Constraint::Percentage(15),
            Constraint::Percentage(12),
            Constraint::Percentage(20),
            Constraint::Percentage(18),
            Constraint::Percentage(15),
        ])
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD));

    let mut table_state = state.selection.table_state();
    frame.render_stateful_widget(table, chunks[1], &mut table_state);
}

pub fn buttons() -> &'static str {
    "<Up/Down> Select | <Enter> Client Memory | <S> Status Filter | <B> Brand Filter | <1-7> Navigate | <Q> Quit"
}

pub fn handle_key(state: &mut ClientsState, key: KeyEvent, data: &DashboardData) -> Option<ClientAction> {
    let len = state.visible(data).len();
    match key.code {
        KeyCode::Down => state.selection.next(len),
        KeyCode::Up => state.selection.previous(len),
        KeyCode::Char('s') => state.cycle_status(),
        KeyCode::Char('b') => state.cycle_brand(),
        KeyCode::Enter => {
            let index = state.selection.clamp(len)?;
            return state
                .visible(data)
                .get(index)
                .map(|c| ClientAction::OpenClient(c.id.clone()));
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(state: &mut ClientsState, code: KeyCode, data: &DashboardData) -> Option<ClientAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE), data)
    }

    #[test]
    fn filters_cycle_through_all_and_back() {
        let mut state = ClientsState::new();
        let seen: Vec<Option<Brand>> = (0..3)
            .map(|_| {
                state.cycle_brand();
                state.filter().brand
            })
            .collect();
        assert_eq!(seen, vec![Some(Brand::CantiRecords), Some(Brand::CantiMedia), None]);
    }

    #[test]
    fn enter_opens_the_filtered_row() {
        let data = DashboardData::default();
        let mut state = ClientsState::new();

        press(&mut state, KeyCode::Char('b'), &data);
        press(&mut state, KeyCode::Char('b'), &data);

        match press(&mut state, KeyCode::Enter, &data) {
            Some(ClientAction::OpenClient(id)) => assert_eq!(id, "c2"),
            None => panic!("expected Yung Wave"),
        }
    }
}
