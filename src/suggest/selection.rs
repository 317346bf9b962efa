//! Keyboard and pointer selection over the candidate list
use crate::suggest::Suggestion;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SelectionState {
    #[default]
    Closed,
    /// `None` means no row is highlighted, so Enter searches the literal text
    Open { highlighted: Option<usize> },
}

/// What the user chose to navigate to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Commit {
    Item(Suggestion),
    FullResults(String),
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    len: usize,
    focused: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SelectionState::Open { .. })
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self.state {
            SelectionState::Open { highlighted } => highlighted,
            SelectionState::Closed => None,
        }
    }

    /// Highlighted row, or -1 when there is none
    pub fn index(&self) -> isize {
        self.highlighted().map_or(-1, |i| i as isize)
    }

    /// A new candidate list replaced the old one
    pub fn candidates_arrived(&mut self, len: usize) {
        self.len = len;
        self.state = if len > 0 && self.focused {
            SelectionState::Open { highlighted: None }
        } else {
            SelectionState::Closed
        };
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.state = SelectionState::Closed;
    }

    pub fn focus(&mut self) {
        self.focused = true;
        if self.len > 0 && !self.is_open() {
            self.state = SelectionState::Open { highlighted: None };
        }
    }

    /// Pointer-down outside the control
    pub fn blur(&mut self) {
        self.focused = false;
        self.state = SelectionState::Closed;
    }

    /// Text was edited; drop the highlight but stay open
    pub fn reset_highlight(&mut self) {
        if self.is_open() {
            self.state = SelectionState::Open { highlighted: None };
        }
    }

    pub fn hover(&mut self, index: usize) {
        if self.is_open() && index < self.len {
            self.state = SelectionState::Open {
                highlighted: Some(index),
            };
        }
    }

    pub fn click(&mut self, index: usize, candidates: &[Suggestion]) -> Option<Commit> {
        if !self.is_open() || index >= self.len {
            return None;
        }
        let item = candidates.get(index)?.clone();
        self.state = SelectionState::Closed;
        Some(Commit::Item(item))
    }

    pub fn key(&mut self, key: Key, candidates: &[Suggestion], text: &str) -> Option<Commit> {
        match (key, self.state) {
            (Key::ArrowDown, SelectionState::Closed) => {
                if self.len > 0 {
                    self.state = SelectionState::Open {
                        highlighted: Some(0),
                    };
                }
                None
            }
            (Key::ArrowDown, SelectionState::Open { highlighted }) => {
                if self.len > 0 {
                    let next = highlighted.map_or(0, |i| (i + 1).min(self.len - 1));
                    self.state = SelectionState::Open {
                        highlighted: Some(next),
                    };
                }
                None
            }
            (Key::ArrowUp, SelectionState::Open { highlighted: Some(i) }) => {
                self.state = SelectionState::Open {
                    highlighted: i.checked_sub(1),
                };
                None
            }
            (Key::ArrowUp, _) => None,
            (Key::Enter, SelectionState::Open { highlighted: Some(i) }) => {
                let item = candidates.get(i)?.clone();
                self.state = SelectionState::Closed;
                Some(Commit::Item(item))
            }
            (Key::Enter, _) => {
                if text.trim().is_empty() {
                    return None;
                }
                self.state = SelectionState::Closed;
                Some(Commit::FullResults(text.to_string()))
            }
            (Key::Escape, _) => {
                self.state = SelectionState::Closed;
                None
            }
        }
    }
}
