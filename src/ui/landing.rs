use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::catalog;
use crate::metrics::money;

use super::layout::{centered_rect, render_buttons};

pub enum LandingAction {
    Enter,
    Exit,
}

pub fn render_landing<B: Backend>(frame: &mut Frame<B>) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let mut lines = vec![
        Spans::from(Span::styled(
            "CANTI OS",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Spans::from(""),
        Spans::from("The operating system for independent studios."),
        Spans::from("Track every session, payment and contract in one place."),
        Spans::from(""),
    ];
    for service in catalog::services() {
        lines.push(Spans::from(vec![
            Span::styled(service.name, Style::default().fg(Color::Cyan)),
            Span::raw(format!("  {}", money(service.price))),
        ]));
    }

    let hero = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(hero, centered_rect(60, 50, chunks[0]));
    render_buttons(frame, chunks[1], "<Enter> Operator Login | <Q> Quit");
}

pub fn handle_key(key: KeyEvent) -> Option<LandingAction> {
    match key.code {
        KeyCode::Enter => Some(LandingAction::Enter),
        KeyCode::Char('q') | KeyCode::Esc => Some(LandingAction::Exit),
        _ => None,
    }
}
