use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use crate::metrics;
use crate::models::Project;
use crate::sync::{DashboardData, DataSource, Dataset};

use super::components::Selection;
use super::layout::{bar, panel, sourced_panel};

#[derive(Default)]
pub struct DashboardState {
    selection: Selection,
}

pub enum DashboardAction {
    OpenClient(String),
    Refresh,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }
}

fn active(data: &DashboardData) -> Vec<Project> {
    metrics::active_projects(&data.projects())
        .into_iter()
        .cloned()
        .collect()
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut DashboardState, data: &DashboardData) {
    let projects = data.projects();

    // Nothing from the store yet.
    if data.is_loading() && data.source(Dataset::Projects) == DataSource::SeedWhileLoading {
        let waiting = Paragraph::new("Initialising Core Systems...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(panel("Dashboard"));
        frame.render_widget(waiting, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)].as_ref())
        .split(area);

    render_hud(frame, chunks[0], data, &projects);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(chunks[1]);

    render_production(frame, columns[0], state, data);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(columns[1]);

    let leads: Vec<ListItem> = data
        .leads()
        .iter()
        .take(4)
        .map(|lead| {
            let budget = lead.initial_budget.map(metrics::money).unwrap_or_else(|| "-".to_string());
            ListItem::new(vec![
                Spans::from(Span::styled(lead.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
                Spans::from(format!("  {} · {} · {} · {}", lead.platform, lead.source, lead.status, budget)),
            ])
        })
        .collect();
    frame.render_widget(
        List::new(leads).block(sourced_panel("Marketing Intake", data.source(Dataset::Leads))),
        side[0],
    );

    let assets: Vec<ListItem> = data
        .assets()
        .iter()
        .take(2)
        .map(|asset| {
            ListItem::new(vec![
                Spans::from(asset.name.clone()),
                Spans::from(format!("  {} · {} · {}", asset.kind, asset.size, asset.uploaded_at)),
            ])
        })
        .collect();
    frame.render_widget(
        List::new(assets).block(sourced_panel("Asset Vault", data.source(Dataset::Assets))),
        side[1],
    );
}

fn render_hud<B: Backend>(frame: &mut Frame<B>, area: Rect, data: &DashboardData, projects: &[Project]) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4].as_ref())
        .split(area);

    let figures = [
        ("Revenue Pulse", metrics::revenue_pulse(projects), Color::Magenta),
        ("Live Sessions", metrics::active_projects(projects).len().to_string(), Color::White),
        ("Marketing Leads", data.leads().len().to_string(), Color::Green),
        (
            "Pending Docs",
            metrics::pending_docs(data.invoices(), Utc::now()).to_string(),
            Color::Yellow,
        ),
    ];

    for (cell, (label, value, color)) in cells.iter().zip(figures) {
        let widget = Paragraph::new(Spans::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(panel(label));
        frame.render_widget(widget, *cell);
    }
}

fn render_production<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut DashboardState, data: &DashboardData) {
    let active = active(data);
    state.selection.clamp(active.len());

    let rows: Vec<Row> = active
        .iter()
        .map(|project| {
            let client = data
                .find_client(&project.client_id)
                .map(|c| c.name)
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(project.title.clone()),
                Cell::from(client),
                Cell::from(project.target_date.to_string()),
                Cell::from(bar(project.progress as f64, 10)),
            ])
        })
        .collect();

    let table = Table::new(rows)
        .header(
            Row::new(vec!["Project", "Client", "Due", "Progress"])
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        )
        .block(sourced_panel("Production Timeline", data.source(Dataset::Projects)))
        .widths(&[
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
        ])
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD));

    let mut table_state = state.selection.table_state();
    frame.render_stateful_widget(table, area, &mut table_state);
}

pub fn buttons() -> &'static str {
    "<Up/Down> Select | <Enter> Open Client | <R> Refresh | <1-7> Navigate | <X> Sign Out | <Q> Quit"
}

pub fn handle_key(state: &mut DashboardState, key: KeyEvent, data: &DashboardData) -> Option<DashboardAction> {
    let active = active(data);
    match key.code {
        KeyCode::Down => state.selection.next(active.len()),
        KeyCode::Up => state.selection.previous(active.len()),
        KeyCode::Enter => {
            let index = state.selection.clamp(active.len())?;
            return active
                .get(index)
                .map(|p| DashboardAction::OpenClient(p.client_id.clone()));
        }
        KeyCode::Char('r') => return Some(DashboardAction::Refresh),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    #[test]
    fn enter_opens_the_selected_projects_client() {
        let data = DashboardData::default();
        let mut state = DashboardState::new();

        let action = handle_key(&mut state, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &data);

        match action {
            Some(DashboardAction::OpenClient(id)) => assert_eq!(id, "c1"),
            _ => panic!("expected the seed project's client"),
        }
    }
}
