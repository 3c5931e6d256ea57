//! Keyboard focus over a rendered item list.

/// Which widget receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    TextInput,
    ListFocus,
}

/// Keyboard cursor of a list panel.
///
/// `TextInput` corresponds to index -1: keystrokes edit the filter field.
/// `List` always points at a rendered item; the engine resets the cursor on
/// every rebuild so it cannot outlive the items it indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusCursor {
    #[default]
    TextInput,
    List {
        index: usize,
    },
}

impl FocusCursor {
    #[must_use]
    pub fn mode(self) -> FocusMode {
        match self {
            FocusCursor::TextInput => FocusMode::TextInput,
            FocusCursor::List { .. } => FocusMode::ListFocus,
        }
    }

    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            FocusCursor::TextInput => None,
            FocusCursor::List { index } => Some(index),
        }
    }
}

/// Direction of a rendered list. Decides which arrow keys navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}
