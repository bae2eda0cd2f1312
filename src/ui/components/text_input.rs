use crossterm::event::KeyCode;
use tui::{
    style::{Color, Modifier, Style},
    text::{Span, Spans},
};

/// What a key did to a field being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Changed,
    Submitted,
    Cancelled,
    Ignored,
}

/// A single-line text field that is either idle or being edited.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    pub value: String,
    pub editing: bool,
    masked: bool,
    numeric: bool,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            ..Self::default()
        }
    }

    /// Render as bullets, for passwords
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    /// Accept only digits and one decimal point
    pub fn numeric() -> Self {
        Self {
            numeric: true,
            ..Self::default()
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) -> InputOutcome {
        if !self.editing {
            return InputOutcome::Ignored;
        }

        match key {
            KeyCode::Enter => {
                self.editing = false;
                InputOutcome::Submitted
            }
            KeyCode::Esc => {
                self.editing = false;
                InputOutcome::Cancelled
            }
            KeyCode::Backspace => {
                self.value.pop();
                InputOutcome::Changed
            }
            KeyCode::Char(c) if self.numeric => {
                if c.is_ascii_digit() || (c == '.' && !self.value.contains('.')) {
                    self.value.push(c);
                    InputOutcome::Changed
                } else {
                    InputOutcome::Ignored
                }
            }
            KeyCode::Char(c) => {
                self.value.push(c);
                InputOutcome::Changed
            }
            _ => InputOutcome::Ignored,
        }
    }

    pub fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// `label: value` with a cursor while editing; highlighted when focused.
    pub fn spans(&self, label: &str, focused: bool) -> Spans<'static> {
        let label_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let value_style = if self.editing {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if self.editing { "|" } else { "" };

        Spans::from(vec![
            Span::styled(format!("{label}: "), label_style),
            Span::styled(format!("{}{cursor}", self.display_value()), value_style),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_only_apply_while_editing() {
        let mut input = TextInputState::new();
        assert_eq!(input.handle_input(KeyCode::Char('a')), InputOutcome::Ignored);

        input.toggle_editing();
        input.handle_input(KeyCode::Char('h'));
        input.handle_input(KeyCode::Char('i'));
        input.handle_input(KeyCode::Backspace);
        assert_eq!(input.value, "h");

        assert_eq!(input.handle_input(KeyCode::Enter), InputOutcome::Submitted);
        assert!(!input.editing);
    }

    #[test]
    fn numeric_fields_take_one_decimal_point() {
        let mut input = TextInputState::numeric();
        input.toggle_editing();
        for c in "12a.5.0".chars() {
            input.handle_input(KeyCode::Char(c));
        }
        assert_eq!(input.value, "12.50");
    }

    #[test]
    fn masked_fields_hide_their_value() {
        let mut input = TextInputState::masked();
        input.value = "studio".to_string();
        assert_eq!(input.display_value(), "••••••");
    }
}
