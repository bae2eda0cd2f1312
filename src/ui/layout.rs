use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::notice::{Notice, NoticeLevel};
use crate::sync::{DashboardData, DataSource};

use super::route::{Route, NAV};

/// Header, body and button bar of every protected screen.
pub struct Chrome {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub fn chrome(area: Rect) -> Chrome {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ].as_ref())
        .split(area);

    Chrome {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

/// Nav tabs with the signed-in operator and load status on the right.
pub fn render_nav<B: Backend>(frame: &mut Frame<B>, area: Rect, route: &Route, operator: &str, data: &DashboardData) {
    let titles: Vec<Spans> = NAV
        .iter()
        .enumerate()
        .map(|(i, r)| Spans::from(format!("{} {}", i + 1, r.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(route.nav_index().unwrap_or(0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Canti OS ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))),
        )
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider("|");

    frame.render_widget(tabs, area);

    let status = Paragraph::new(Spans::from(vec![status_span(data), Span::raw(format!("  {operator} "))]))
        .alignment(Alignment::Right);
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: 1,
    };
    if inner.width > 60 {
        let right = Rect {
            x: inner.x + inner.width / 2,
            width: inner.width / 2,
            ..inner
        };
        frame.render_widget(status, right);
    }
}

/// Syncing, last error, or idle.
pub fn status_span(data: &DashboardData) -> Span<'static> {
    if data.is_loading() {
        Span::styled("● syncing", Style::default().fg(Color::Yellow))
    } else if let Some(error) = data.error() {
        Span::styled(format!("● {error}"), Style::default().fg(Color::Red))
    } else {
        Span::styled("● synced", Style::default().fg(Color::Green))
    }
}

/// Where a panel's rows came from.
pub fn source_span(source: DataSource) -> Span<'static> {
    let color = match source {
        DataSource::Remote => Color::Green,
        DataSource::SeedWhileLoading => Color::Yellow,
        DataSource::SeedForEmpty => Color::DarkGray,
    };
    Span::styled(format!("[{}]", source.label()), Style::default().fg(color))
}

pub fn render_buttons<B: Backend>(frame: &mut Frame<B>, area: Rect, text: &str) {
    let buttons = Paragraph::new(text.to_string())
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, area);
}

/// Where a notice sits: one row down, right aligned, never past the frame.
fn notice_area(size: Rect, message: &str) -> Option<Rect> {
    let height = size.height.saturating_sub(1).min(3);
    if height == 0 || size.width == 0 {
        return None;
    }

    let text = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
    let width = text.saturating_add(4).max(20).min(size.width);
    Some(Rect {
        x: size.width.saturating_sub(width.saturating_add(1)),
        y: 1,
        width,
        height,
    })
}

/// The current notice, top right, over whatever is drawn.
pub fn render_notice<B: Backend>(frame: &mut Frame<B>, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };

    let Some(area) = notice_area(frame.size(), &notice.message) else {
        return;
    };

    let color = match notice.level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    };

    let toast = Paragraph::new(notice.message.clone())
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)))
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(toast, area);
}

pub fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {title} "), Style::default().fg(Color::Cyan)))
}

/// A panel title followed by a data-source tag.
pub fn sourced_panel(title: &str, source: DataSource) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(Spans::from(vec![
        Span::styled(format!(" {title} "), Style::default().fg(Color::Cyan)),
        source_span(source),
        Span::raw(" "),
    ]))
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A text bar like `[#####-----] 50%`.
pub fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}] {:.0}%", "#".repeat(filled), "-".repeat(width - filled), percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally_and_clamps() {
        assert_eq!(bar(50.0, 10), "[#####-----] 50%");
        assert_eq!(bar(0.0, 4), "[----] 0%");
        assert_eq!(bar(140.0, 4), "[####] 140%");
    }

    #[test]
    fn notice_stays_inside_short_frames() {
        let message = "Progress Updated";

        let area = notice_area(Rect::new(0, 0, 80, 3), message).unwrap();
        assert_eq!((area.y, area.height), (1, 2));

        assert!(notice_area(Rect::new(0, 0, 80, 1), message).is_none());
        assert!(notice_area(Rect::new(0, 0, 0, 10), message).is_none());

        let narrow = notice_area(Rect::new(0, 0, 12, 10), message).unwrap();
        assert_eq!((narrow.x, narrow.width), (0, 12));
    }

    #[test]
    fn long_notice_is_capped_at_the_frame_width() {
        let message = "x".repeat(70_000);
        let area = notice_area(Rect::new(0, 0, 80, 24), &message).unwrap();
        assert_eq!((area.x, area.width, area.height), (0, 80, 3));
    }

    #[test]
    fn notice_renders_on_a_two_row_terminal() {
        let mut terminal = tui::Terminal::new(tui::backend::TestBackend::new(40, 2)).unwrap();
        let notice = Notice {
            level: NoticeLevel::Success,
            message: "Payment Recorded".to_string(),
        };

        terminal.draw(|f| render_notice(f, Some(&notice))).unwrap();
    }
}
