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
use crate::sync::{DashboardData, Dataset};

use super::components::{InputOutcome, TextInputState};
use super::layout::{bar, panel, sourced_panel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaymentField {
    Amount,
    Description,
}

pub struct FinanceState {
    pub amount: TextInputState,
    pub description: TextInputState,
    pub current_field: PaymentField,
    pub error: Option<String>,
}

pub enum FinanceAction {
    LogPayment {
        project_id: String,
        amount: f64,
        description: String,
    },
}

impl Default for FinanceState {
    fn default() -> Self {
        Self {
            amount: TextInputState::numeric(),
            description: TextInputState::new(),
            current_field: PaymentField::Amount,
            error: None,
        }
    }
}

impl FinanceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.amount.editing || self.description.editing
    }

    fn field_mut(&mut self) -> &mut TextInputState {
        match self.current_field {
            PaymentField::Amount => &mut self.amount,
            PaymentField::Description => &mut self.description,
        }
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            PaymentField::Amount => PaymentField::Description,
            PaymentField::Description => PaymentField::Amount,
        };
    }

    /// Build the payment for the first project in scope, or explain why not.
    fn submit(&mut self, data: &DashboardData) -> Option<FinanceAction> {
        let amount = match self.amount.value.parse::<f64>() {
            Ok(amount) if amount > 0.0 => amount,
            _ => {
                self.error = Some("Enter an amount greater than zero".to_string());
                return None;
            }
        };
        let Some(project) = data.projects().into_iter().next() else {
            self.error = Some("No project to record against".to_string());
            return None;
        };

        self.error = None;
        let description = std::mem::take(&mut self.description.value);
        self.amount.clear();
        Some(FinanceAction::LogPayment {
            project_id: project.id,
            amount,
            description,
        })
    }
}

pub fn render_finance<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &FinanceState, data: &DashboardData) {
    let projects = data.projects();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)].as_ref())
        .split(area);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3].as_ref())
        .split(chunks[0]);

    let figures = [
        ("Total Revenue", metrics::total_revenue(&projects), Color::White),
        ("Received", metrics::total_received(&projects), Color::Green),
        ("Pending", metrics::total_pending(&projects), Color::Yellow),
    ];
    for (cell, (label, value, color)) in cells.iter().zip(figures) {
        let widget = Paragraph::new(Span::styled(
            metrics::money(value),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(panel(label));
        frame.render_widget(widget, *cell);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(chunks[1]);

    let rows: Vec<Row> = metrics::ltv_ranking(data.clients(), &projects)
        .into_iter()
        .map(|(client, ltv)| {
            let paid = metrics::client_paid_percent(&client.id, &projects);
            Row::new(vec![
                Cell::from(client.name.clone()),
                Cell::from(format!("{} // {}", client.brand, client.source)),
                Cell::from(bar(paid.round(), 10)),
                Cell::from(metrics::money(ltv)),
            ])
        })
        .collect();
    let ranking = Table::new(rows)
        .header(
            Row::new(vec!["Client", "Brand // Source", "Paid", "LTV"])
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        )
        .block(sourced_panel("Client Investment Ranking (LTV)", data.source(Dataset::Clients)))
        .widths(&[
            Constraint::Percentage(25),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(columns[0]);
    frame.render_widget(ranking, left[0]);

    render_balances(frame, left[1], &projects, data);

    render_payment_form(frame, columns[1], state, data);
}

/// Title, value, pending and percent paid for one project.
fn balance_cells(project: &Project) -> [String; 4] {
    [
        project.title.clone(),
        metrics::money(project.value),
        metrics::money(metrics::project_pending(project)),
        format!("{:.0}%", metrics::percent_paid(project)),
    ]
}

fn render_balances<B: Backend>(frame: &mut Frame<B>, area: Rect, projects: &[Project], data: &DashboardData) {
    let rows: Vec<Row> = projects
        .iter()
        .map(|project| {
            let [title, value, pending, paid] = balance_cells(project);
            let pending_style = if metrics::project_pending(project) > 0.0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Green)
            };
            Row::new(vec![
                Cell::from(title),
                Cell::from(value),
                Cell::from(pending).style(pending_style),
                Cell::from(paid),
            ])
        })
        .collect();

    let table = Table::new(rows)
        .header(
            Row::new(vec!["Project", "Value", "Pending", "Paid"])
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        )
        .block(sourced_panel("Project Balances", data.source(Dataset::Projects)))
        .widths(&[
            Constraint::Percentage(40),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Percentage(16),
        ]);
    frame.render_widget(table, area);
}

fn render_payment_form<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &FinanceState, data: &DashboardData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(1)].as_ref())
        .split(area);

    let target = data
        .projects()
        .into_iter()
        .next()
        .map(|p| p.title)
        .unwrap_or_else(|| "-".to_string());

    let mut items = vec![
        ListItem::new(Spans::from(vec![
            Span::styled("Project: ", Style::default().fg(Color::DarkGray)),
            Span::raw(target),
        ])),
        ListItem::new(state.amount.spans("Amount", state.current_field == PaymentField::Amount)),
        ListItem::new(state.description.spans("Description", state.current_field == PaymentField::Description)),
    ];
    if let Some(error) = &state.error {
        items.push(ListItem::new(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    frame.render_widget(List::new(items).block(panel("Record Payment")), chunks[0]);

    let payments: Vec<ListItem> = data
        .payments()
        .iter()
        .rev()
        .map(|p| {
            ListItem::new(format!(
                "{}  {}  {}",
                p.date.format("%Y-%m-%d"),
                metrics::money(p.amount),
                p.description
            ))
        })
        .collect();
    frame.render_widget(
        List::new(payments).block(sourced_panel("Payment Ledger", data.source(Dataset::Payments))),
        chunks[1],
    );
}

pub fn buttons(state: &FinanceState) -> &'static str {
    if state.is_editing() {
        "<Enter> Save field | <Esc> Cancel editing"
    } else {
        "<Enter> Edit field | <Up/Down> Navigate | <S> Record Payment | <1-7> Navigate | <Q> Quit"
    }
}

pub fn handle_key(state: &mut FinanceState, key: KeyEvent, data: &DashboardData) -> Option<FinanceAction> {
    if state.is_editing() {
        if state.field_mut().handle_input(key.code) == InputOutcome::Submitted
            && state.current_field == PaymentField::Description
        {
            return state.submit(data);
        }
        return None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Enter => state.field_mut().toggle_editing(),
        KeyCode::Char('s') => return state.submit(data),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(state: &mut FinanceState, code: KeyCode, data: &DashboardData) -> Option<FinanceAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE), data)
    }

    #[test]
    fn payment_is_logged_against_the_first_project() {
        let data = DashboardData::default();
        let mut state = FinanceState::new();

        press(&mut state, KeyCode::Enter, &data);
        for c in "1250".chars() {
            press(&mut state, KeyCode::Char(c), &data);
        }
        press(&mut state, KeyCode::Enter, &data);

        match press(&mut state, KeyCode::Char('s'), &data) {
            Some(FinanceAction::LogPayment {
                project_id,
                amount,
                description,
            }) => {
                assert_eq!(project_id, "p1");
                assert_eq!(amount, 1250.0);
                assert!(description.is_empty());
            }
            None => panic!("expected a payment"),
        }
        assert!(state.amount.value.is_empty());
    }

    #[test]
    fn zero_amount_is_refused_inline() {
        let data = DashboardData::default();
        let mut state = FinanceState::new();

        assert!(press(&mut state, KeyCode::Char('s'), &data).is_none());
        assert!(state.error.is_some());
    }

    #[test]
    fn balance_row_shows_pending_and_percent_paid() {
        let mut project = crate::sync::seed::projects()[0].clone();
        project.title = "Night Drive".to_string();
        project.value = 2500.0;
        project.payments = vec![crate::models::Payment {
            id: "pay-1".to_string(),
            project_id: project.id.clone(),
            amount: 1250.0,
            description: "Deposit".to_string(),
            date: chrono::Utc::now(),
        }];

        assert_eq!(
            balance_cells(&project),
            ["Night Drive".to_string(), "$2,500".to_string(), "$1,250".to_string(), "50%".to_string()]
        );
    }
}
