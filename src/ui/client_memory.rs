use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::catalog;
use crate::metrics;
use crate::models::{ChecklistItem, Client, Message, Project, Sender};
use crate::sync::DashboardData;

use super::components::{InputOutcome, Selection, TextInputState};
use super::layout::{bar, panel};

pub const SUMMARY_ANALYZING: &str = "Analyzing studio chatter...";
pub const SUMMARY_NO_HISTORY: &str =
    "Once you log some studio conversations, I'll provide a high-level creative breakdown here.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTab {
    Timeline,
    Communication,
    Vault,
    Legal,
    Billing,
}

impl MemoryTab {
    const ALL: [MemoryTab; 5] = [
        MemoryTab::Timeline,
        MemoryTab::Communication,
        MemoryTab::Vault,
        MemoryTab::Legal,
        MemoryTab::Billing,
    ];

    fn title(self) -> &'static str {
        match self {
            MemoryTab::Timeline => "Timeline",
            MemoryTab::Communication => "Communication",
            MemoryTab::Vault => "Vault",
            MemoryTab::Legal => "Legal",
            MemoryTab::Billing => "Billing",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct ClientMemoryState {
    client_id: String,
    pub tab: MemoryTab,
    messages: Vec<Message>,
    messages_loaded: bool,
    summary: String,
    project_status: Option<String>,
    project_status_pending: bool,
    checklist: Option<Vec<ChecklistItem>>,
    checklist_selection: Selection,
    pub input: TextInputState,
}

pub enum ClientMemoryAction {
    Back,
    SendMessage(String),
    ChecklistToggled,
    RequestProjectStatus { title: String, checklist: Vec<ChecklistItem> },
}

impl ClientMemoryState {
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            tab: MemoryTab::Timeline,
            messages: Vec::new(),
            messages_loaded: false,
            summary: SUMMARY_ANALYZING.to_string(),
            project_status: None,
            project_status_pending: false,
            checklist: None,
            checklist_selection: Selection::default(),
            input: TextInputState::new(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_editing(&self) -> bool {
        self.input.editing
    }

    /// Take the stored conversation, or `embedded` when the store has none.
    /// Returns whether there is anything to summarize.
    pub fn set_messages(&mut self, stored: Vec<Message>, embedded: &[Message]) -> bool {
        // Entries logged while the read was in flight stay at the end.
        let pending: Vec<Message> = std::mem::take(&mut self.messages)
            .into_iter()
            .filter(|m| !stored.iter().any(|s| s.id == m.id))
            .collect();

        self.messages = if stored.is_empty() && pending.is_empty() {
            embedded.to_vec()
        } else {
            stored
        };
        self.messages.extend(pending);
        self.messages_loaded = true;
        self.refresh_summary_placeholder()
    }

    /// Optimistically append a message the operator just logged.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.refresh_summary_placeholder();
    }

    fn refresh_summary_placeholder(&mut self) -> bool {
        if self.messages.is_empty() {
            self.summary = SUMMARY_NO_HISTORY.to_string();
            false
        } else {
            self.summary = SUMMARY_ANALYZING.to_string();
            true
        }
    }

    pub fn set_summary(&mut self, summary: String) {
        self.summary = summary;
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn set_project_status(&mut self, status: String) {
        self.project_status_pending = false;
        self.project_status = Some(status);
    }

    /// The project's checklist, with any local toggles applied.
    pub fn checklist(&self, project: Option<&Project>) -> Vec<ChecklistItem> {
        match (&self.checklist, project) {
            (Some(local), _) => local.clone(),
            (None, Some(project)) => project.checklist.clone(),
            (None, None) => Vec::new(),
        }
    }

    /// Flip the selected item locally. Nothing is written to the store.
    pub fn toggle_selected(&mut self, project: Option<&Project>) -> bool {
        let mut checklist = self.checklist(project);
        let Some(index) = self.checklist_selection.clamp(checklist.len()) else {
            return false;
        };
        if let Some(item) = checklist.get_mut(index) {
            item.is_completed = !item.is_completed;
        }
        self.checklist = Some(checklist);
        true
    }
}

pub fn render_client_memory<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &mut ClientMemoryState,
    data: &DashboardData,
) {
    let Some(client) = data.find_client(&state.client_id) else {
        let missing = Paragraph::new(vec![
            Spans::from(""),
            Spans::from("Client record not found."),
            Spans::from(""),
            Spans::from("<Esc> Back to Directory"),
        ])
        .alignment(Alignment::Center)
        .block(panel("Client Memory"));
        frame.render_widget(missing, area);
        return;
    };
    let project = data.project_for_client(&client.id);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ].as_ref())
        .split(area);

    render_profile(frame, columns[0], state, &client, data);
    render_tabs(frame, columns[1], state, &client, project.as_ref(), data);
    render_project(frame, columns[2], state, project.as_ref());
}

fn render_profile<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &ClientMemoryState,
    client: &Client,
    data: &DashboardData,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(area);

    let dim = Style::default().fg(Color::DarkGray);
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let ltv = metrics::lifetime_value(&client.id, &data.projects());

    let lines = vec![
        Spans::from(Span::styled(
            client.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(
            client.alias.as_deref().map(|a| format!("aka {a}")).unwrap_or_default(),
            dim,
        )),
        Spans::from(""),
        Spans::from(vec![
            Span::styled(client.status.to_string(), Style::default().fg(Color::Green)),
            Span::raw(format!(" · {}", client.brand)),
        ]),
        Spans::from(client.genre_tags.join(" / ")),
        Spans::from(""),
        Spans::from(vec![Span::styled("Email     ", dim), Span::raw(client.email.clone())]),
        Spans::from(vec![Span::styled("Phone     ", dim), Span::raw(client.phone.clone())]),
        Spans::from(vec![Span::styled("Instagram ", dim), Span::raw(optional(&client.instagram))]),
        Spans::from(vec![Span::styled("TikTok    ", dim), Span::raw(optional(&client.tiktok))]),
        Spans::from(vec![Span::styled("WhatsApp  ", dim), Span::raw(client.whatsapp_link.clone())]),
        Spans::from(vec![Span::styled("Source    ", dim), Span::raw(client.source.clone())]),
        Spans::from(vec![Span::styled("LTV       ", dim), Span::raw(metrics::money(ltv))]),
        Spans::from(""),
        Spans::from(optional(&client.bio)),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(panel("Profile")),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(state.summary().to_string())
            .wrap(Wrap { trim: false })
            .block(panel("AI Studio Memory")),
        chunks[1],
    );
}

fn render_tabs<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &ClientMemoryState,
    client: &Client,
    project: Option<&Project>,
    data: &DashboardData,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(area);

    let titles: Vec<Spans> = MemoryTab::ALL.iter().map(|t| Spans::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .block(panel("Memory"))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, chunks[0]);

    let body = chunks[1];
    match state.tab {
        MemoryTab::Timeline => {
            let items: Vec<ListItem> = client
                .timeline
                .iter()
                .map(|event| {
                    ListItem::new(vec![
                        Spans::from(vec![
                            Span::styled(format!("{} ", event.date), Style::default().fg(Color::DarkGray)),
                            Span::styled(event.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                            Span::styled(format!("  [{}]", event.kind), Style::default().fg(Color::Cyan)),
                        ]),
                        Spans::from(format!("  {}", event.description)),
                    ])
                })
                .collect();
            frame.render_widget(List::new(items).block(panel("Timeline")), body);
        }
        MemoryTab::Communication => render_conversation(frame, body, state, client),
        MemoryTab::Vault => {
            let assets = project
                .map(|p| data.assets_for_project(&p.id))
                .unwrap_or_default();
            let rows: Vec<Row> = assets
                .iter()
                .map(|a| {
                    Row::new(vec![
                        Cell::from(a.name.clone()),
                        Cell::from(a.kind.to_string()),
                        Cell::from(a.size.clone()),
                        Cell::from(a.uploaded_at.to_string()),
                    ])
                })
                .collect();
            let table = Table::new(rows)
                .header(Row::new(vec!["File", "Type", "Size", "Uploaded"]).style(Style::default().fg(Color::Gray)))
                .block(panel("Vault"))
                .widths(&[
                    Constraint::Percentage(40),
                    Constraint::Percentage(20),
                    Constraint::Percentage(15),
                    Constraint::Percentage(25),
                ]);
            frame.render_widget(table, body);
        }
        MemoryTab::Legal => {
            let splits = project
                .map(|p| catalog::split_sheets_for_project(&p.id))
                .unwrap_or_default();
            let mut lines = Vec::new();
            for sheet in &splits {
                lines.push(Spans::from(vec![
                    Span::styled(sheet.track_title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", sheet.status), Style::default().fg(Color::Yellow)),
                ]));
                for participant in &sheet.participants {
                    lines.push(Spans::from(format!(
                        "  {} ({}) {}%",
                        participant.name, participant.role, participant.share
                    )));
                }
                let sent = sheet.sent_at.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
                let viewed = sheet.viewed_at.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
                lines.push(Spans::from(Span::styled(
                    format!("  sent {sent} · viewed {viewed}"),
                    Style::default().fg(Color::DarkGray),
                )));
                lines.push(Spans::from(""));
            }
            if splits.is_empty() {
                lines.push(Spans::from("No split sheets on file."));
            }
            frame.render_widget(Paragraph::new(lines).block(panel("Split Sheets")), body);
        }
        MemoryTab::Billing => {
            let now = Utc::now();
            let invoices = data.invoices_for_client(&client.id);
            let rows: Vec<Row> = invoices
                .iter()
                .map(|inv| {
                    let status_style = if metrics::is_effectively_overdue(inv, now) {
                        Style::default().fg(Color::Red)
                    } else {
                        Style::default()
                    };
                    Row::new(vec![
                        Cell::from(inv.id.clone()),
                        Cell::from(metrics::money(inv.amount)),
                        Cell::from(inv.status.to_string()).style(status_style),
                        Cell::from(inv.due_date.to_string()),
                        Cell::from(inv.items.join(", ")),
                    ])
                })
                .collect();
            let table = Table::new(rows)
                .header(Row::new(vec!["Invoice", "Amount", "Status", "Due", "Items"]).style(Style::default().fg(Color::Gray)))
                .block(panel("Billing"))
                .widths(&[
                    Constraint::Percentage(15),
                    Constraint::Percentage(15),
                    Constraint::Percentage(15),
                    Constraint::Percentage(20),
                    Constraint::Percentage(35),
                ]);
            frame.render_widget(table, body);
        }
    }
}

fn render_conversation<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &ClientMemoryState, client: &Client) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(area);

    let items: Vec<ListItem> = if !state.messages_loaded {
        vec![ListItem::new("Loading conversation...")]
    } else {
        state
            .messages
            .iter()
            .map(|m| {
                let (who, color) = match m.sender {
                    Sender::Operator => ("You".to_string(), Color::Magenta),
                    Sender::Client => (client.display_name().to_string(), Color::Cyan),
                };
                ListItem::new(vec![
                    Spans::from(vec![
                        Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                        Span::styled(
                            format!("  {} · {}", m.platform, m.timestamp.format("%Y-%m-%d %H:%M")),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]),
                    Spans::from(format!("  {}", m.text)),
                ])
            })
            .collect()
    };

    // Keep the newest messages in view.
    let visible = chunks[0].height.saturating_sub(2) as usize / 2;
    let skip = items.len().saturating_sub(visible.max(1));
    let items: Vec<ListItem> = items.into_iter().skip(skip).collect();
    frame.render_widget(List::new(items).block(panel("Conversation")), chunks[0]);

    let input = Paragraph::new(state.input.spans("Log", state.input.editing)).block(panel("Sync Log"));
    frame.render_widget(input, chunks[1]);
}

fn render_project<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ClientMemoryState, project: Option<&Project>) {
    let Some(project) = project else {
        frame.render_widget(Paragraph::new("No active project.").block(panel("Project")), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3), Constraint::Length(6)].as_ref())
        .split(area);

    let checklist = state.checklist(Some(project));
    let completion = metrics::checklist_completion(&checklist);

    let header = Paragraph::new(vec![
        Spans::from(Span::styled(project.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Spans::from(format!("{} · {} · {}", project.package, project.status, project.genre)),
        Spans::from(format!("Due {}", project.target_date)),
        Spans::from(bar(completion as f64, 12)),
    ])
    .block(panel("Project"));
    frame.render_widget(header, chunks[0]);

    state.checklist_selection.clamp(checklist.len());
    let items: Vec<ListItem> = checklist
        .iter()
        .map(|item| {
            let mark = if item.is_completed { "[x]" } else { "[ ]" };
            let style = if item.is_completed {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(format!("{mark} {}", item.label), style))
        })
        .collect();
    let list = List::new(items)
        .block(panel("Checklist"))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    let mut list_state = state.checklist_selection.list_state();
    frame.render_stateful_widget(list, chunks[1], &mut list_state);

    let status = if state.project_status_pending {
        "Thinking...".to_string()
    } else {
        state
            .project_status
            .clone()
            .unwrap_or_else(|| "<P> for an AI status update".to_string())
    };
    frame.render_widget(
        Paragraph::new(status).wrap(Wrap { trim: true }).block(panel("AI Status")),
        chunks[2],
    );
}

pub fn buttons(state: &ClientMemoryState) -> &'static str {
    if state.is_editing() {
        "<Enter> Sync Log | <Esc> Cancel"
    } else {
        "<Left/Right> Tabs | <Up/Down> Checklist | <Space> Toggle | <M> Log Message | <P> AI Status | <Esc> Back"
    }
}

pub fn handle_key(state: &mut ClientMemoryState, key: KeyEvent, data: &DashboardData) -> Option<ClientMemoryAction> {
    if state.input.editing {
        if state.input.handle_input(key.code) == InputOutcome::Submitted {
            let text = std::mem::take(&mut state.input.value);
            if !text.trim().is_empty() {
                return Some(ClientMemoryAction::SendMessage(text));
            }
        }
        return None;
    }

    let project = data.project_for_client(&state.client_id);
    match key.code {
        KeyCode::Esc => return Some(ClientMemoryAction::Back),
        KeyCode::Right | KeyCode::Tab => state.tab = state.tab.next(),
        KeyCode::Left | KeyCode::BackTab => state.tab = state.tab.previous(),
        KeyCode::Down => {
            let len = state.checklist(project.as_ref()).len();
            state.checklist_selection.next(len);
        }
        KeyCode::Up => {
            let len = state.checklist(project.as_ref()).len();
            state.checklist_selection.previous(len);
        }
        KeyCode::Char(' ') => {
            if state.toggle_selected(project.as_ref()) {
                return Some(ClientMemoryAction::ChecklistToggled);
            }
        }
        KeyCode::Char('m') => {
            state.tab = MemoryTab::Communication;
            state.input.editing = true;
        }
        KeyCode::Char('p') => {
            let project = project?;
            if state.project_status_pending {
                return None;
            }
            state.project_status_pending = true;
            return Some(ClientMemoryAction::RequestProjectStatus {
                checklist: state.checklist(Some(&project)),
                title: project.title,
            });
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::sync::seed;

    fn press(state: &mut ClientMemoryState, code: KeyCode, data: &DashboardData) -> Option<ClientMemoryAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE), data)
    }

    #[test]
    fn stored_messages_win_over_embedded_ones() {
        let embedded = seed::clients()[0].conversations.clone();
        let mut state = ClientMemoryState::new("c1");

        assert!(state.set_messages(embedded[..1].to_vec(), &embedded));
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.summary(), SUMMARY_ANALYZING);
    }

    #[test]
    fn embedded_conversation_fills_an_empty_store() {
        let embedded = seed::clients()[0].conversations.clone();
        let mut state = ClientMemoryState::new("c1");

        assert!(state.set_messages(Vec::new(), &embedded));
        assert_eq!(state.messages().len(), 5);
    }

    #[test]
    fn no_history_shows_the_placeholder() {
        let mut state = ClientMemoryState::new("c2");
        assert!(!state.set_messages(Vec::new(), &[]));
        assert_eq!(state.summary(), SUMMARY_NO_HISTORY);
    }

    #[test]
    fn toggling_stays_local() {
        let data = DashboardData::default();
        let mut state = ClientMemoryState::new("c1");

        press(&mut state, KeyCode::Down, &data);
        press(&mut state, KeyCode::Down, &data);
        press(&mut state, KeyCode::Down, &data);
        press(&mut state, KeyCode::Down, &data);
        let action = press(&mut state, KeyCode::Char(' '), &data);

        assert!(matches!(action, Some(ClientMemoryAction::ChecklistToggled)));
        let project = data.project_for_client("c1");
        let checklist = state.checklist(project.as_ref());
        assert!(checklist[3].is_completed);
        assert_eq!(metrics::checklist_completion(&checklist), 80);
        assert!(!project.unwrap().checklist[3].is_completed);
    }

    #[test]
    fn typed_message_is_sent_on_enter() {
        let data = DashboardData::default();
        let mut state = ClientMemoryState::new("c1");

        press(&mut state, KeyCode::Char('m'), &data);
        assert!(state.is_editing());
        assert_eq!(state.tab, MemoryTab::Communication);
        for c in "vocals friday".chars() {
            press(&mut state, KeyCode::Char(c), &data);
        }

        match press(&mut state, KeyCode::Enter, &data) {
            Some(ClientMemoryAction::SendMessage(text)) => assert_eq!(text, "vocals friday"),
            _ => panic!("expected a message"),
        }
        assert!(state.input.value.is_empty());
    }

    #[test]
    fn project_status_is_requested_once_at_a_time() {
        let data = DashboardData::default();
        let mut state = ClientMemoryState::new("c1");

        assert!(matches!(
            press(&mut state, KeyCode::Char('p'), &data),
            Some(ClientMemoryAction::RequestProjectStatus { .. })
        ));
        assert!(press(&mut state, KeyCode::Char('p'), &data).is_none());

        state.set_project_status("Vocals next.".to_string());
        assert!(press(&mut state, KeyCode::Char('p'), &data).is_some());
    }
}
