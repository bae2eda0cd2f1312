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
use crate::models::LegalTemplate;
use crate::sync::DashboardData;

use super::components::Selection;
use super::layout::panel;

pub struct TemplatesState {
    templates: Vec<LegalTemplate>,
    selection: Selection,
}

pub enum TemplateAction {
    /// Generate the template for the given project
    Generate {
        template: LegalTemplate,
        project_id: String,
    },
}

impl Default for TemplatesState {
    fn default() -> Self {
        Self {
            templates: catalog::legal_templates(),
            selection: Selection::default(),
        }
    }
}

impl TemplatesState {
    pub fn new() -> Self {
        Self::default()
    }

    fn selected(&mut self) -> Option<&LegalTemplate> {
        let index = self.selection.clamp(self.templates.len())?;
        self.templates.get(index)
    }
}

pub fn render_templates<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut TemplatesState, data: &DashboardData) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(area);

    let items: Vec<ListItem> = state
        .templates
        .iter()
        .map(|t| ListItem::new(Span::styled(t.title.clone(), Style::default().add_modifier(Modifier::BOLD))))
        .collect();
    let list = List::new(items)
        .block(panel("Legal Templates Vault"))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    state.selection.clamp(state.templates.len());
    let mut list_state = state.selection.list_state();
    frame.render_stateful_widget(list, columns[0], &mut list_state);

    let target = data
        .projects()
        .into_iter()
        .next()
        .map(|p| p.title)
        .unwrap_or_else(|| "no project in scope".to_string());

    let detail = match state.selected() {
        Some(template) => vec![
            Spans::from(Span::styled(
                template.title.clone(),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )),
            Spans::from(""),
            Spans::from(template.description.clone()),
            Spans::from(""),
            Spans::from(vec![
                Span::styled("Generate for: ", Style::default().fg(Color::Gray)),
                Span::raw(target),
            ]),
        ],
        None => Vec::new(),
    };
    frame.render_widget(
        Paragraph::new(detail).wrap(Wrap { trim: true }).block(panel("Template")),
        columns[1],
    );
}

pub fn buttons() -> &'static str {
    "<Up/Down> Select | <Enter> Generate for Project | <1-7> Navigate | <Q> Quit"
}

pub fn handle_key(state: &mut TemplatesState, key: KeyEvent, data: &DashboardData) -> Option<TemplateAction> {
    let len = state.templates.len();
    match key.code {
        KeyCode::Down => state.selection.next(len),
        KeyCode::Up => state.selection.previous(len),
        KeyCode::Enter => {
            let project_id = data.projects().into_iter().next()?.id;
            let template = state.selected()?.clone();
            return Some(TemplateAction::Generate { template, project_id });
        }
        _ => {}
    }
    None
}
