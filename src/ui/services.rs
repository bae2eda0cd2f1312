use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::catalog;
use crate::metrics::money;

use super::layout::panel;

pub fn render_services<B: Backend>(frame: &mut Frame<B>, area: Rect) {
    let services = catalog::services();
    if services.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = services
        .iter()
        .map(|_| Constraint::Ratio(1, services.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (service, column) in services.iter().zip(columns.iter()) {
        let mut lines = vec![
            Spans::from(Span::styled(
                money(service.price),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )),
            Spans::from(""),
            Spans::from(service.description.clone()),
            Spans::from(""),
        ];
        lines.extend(service.includes.iter().map(|item| Spans::from(format!("✓ {item}"))));

        let card = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(&service.name));
        frame.render_widget(card, *column);
    }
}

pub fn buttons() -> &'static str {
    "<1-7> Navigate | <X> Sign Out | <Q> Quit"
}
