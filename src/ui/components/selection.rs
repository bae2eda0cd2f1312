use tui::widgets::{ListState, TableState};

/// Wrapping cursor over a list whose length can change between draws.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    selected: Option<usize>,
}

impl Selection {
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }

        let i = match self.selected {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn previous(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }

        let i = match self.selected {
            Some(i) => {
                if i == 0 || i > len - 1 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    /// Keep the cursor inside `0..len`, selecting the first row if nothing is.
    pub fn clamp(&mut self, len: usize) -> Option<usize> {
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
        self.selected
    }

    pub fn list_state(&self) -> ListState {
        let mut state = ListState::default();
        state.select(self.selected);
        state
    }

    pub fn table_state(&self) -> TableState {
        let mut state = TableState::default();
        state.select(self.selected);
        state
    }
}
