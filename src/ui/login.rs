use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use super::components::{InputOutcome, TextInputState};
use super::layout::{centered_rect, panel, render_buttons};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginField {
    Email,
    Password,
}

pub struct LoginState {
    pub email: TextInputState,
    pub password: TextInputState,
    pub current_field: LoginField,
    pub error: Option<String>,
    pub hint: Option<String>,
    pub submitting: bool,
}

pub enum LoginAction {
    Submit { email: String, password: String },
    Back,
}

impl LoginState {
    pub fn new(hint: Option<String>) -> Self {
        Self {
            email: TextInputState::new(),
            password: TextInputState::masked(),
            current_field: LoginField::Email,
            error: None,
            hint,
            submitting: false,
        }
    }

    fn field_mut(&mut self) -> &mut TextInputState {
        match self.current_field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn is_editing(&self) -> bool {
        self.email.editing || self.password.editing
    }

    fn submit(&mut self) -> LoginAction {
        self.error = None;
        self.submitting = true;
        LoginAction::Submit {
            email: self.email.value.trim().to_string(),
            password: self.password.value.clone(),
        }
    }

    /// Show a failed attempt inline and clear the password.
    pub fn fail(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
        self.password.clear();
    }
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &LoginState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let area = centered_rect(50, 40, chunks[0]);
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)].as_ref())
        .split(area);

    let items = vec![
        ListItem::new(state.email.spans("Email", state.current_field == LoginField::Email)),
        ListItem::new(state.password.spans("Password", state.current_field == LoginField::Password)),
    ];
    frame.render_widget(List::new(items).block(panel("Operator Login")), inner[0]);

    let mut lines = Vec::new();
    if state.submitting {
        lines.push(Spans::from("Verifying credentials..."));
    }
    if let Some(error) = &state.error {
        lines.push(Spans::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    if let Some(hint) = &state.hint {
        lines.push(Spans::from(Span::styled(hint.clone(), Style::default().fg(Color::DarkGray))));
    }
    frame.render_widget(Paragraph::new(lines), inner[1]);

    let help = if state.is_editing() {
        "<Enter> Save field | <Tab> Next field | <Esc> Cancel editing"
    } else {
        "<Enter> Edit field | <Up/Down> Navigate | <S> Sign in | <Esc> Back"
    };
    render_buttons(frame, chunks[1], help);
}

pub fn handle_key(state: &mut LoginState, key: KeyEvent) -> Option<LoginAction> {
    if state.submitting {
        return None;
    }

    if state.is_editing() {
        match key.code {
            KeyCode::Tab => {
                state.field_mut().editing = false;
                state.next_field();
                state.field_mut().editing = true;
            }
            KeyCode::Enter if state.current_field == LoginField::Password => {
                state.field_mut().editing = false;
                return Some(state.submit());
            }
            code => {
                if state.field_mut().handle_input(code) == InputOutcome::Submitted {
                    state.next_field();
                    state.field_mut().editing = true;
                }
            }
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(LoginAction::Back),
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Enter => state.field_mut().toggle_editing(),
        KeyCode::Char('s') => return Some(state.submit()),
        _ => {}
    }
    None
}
