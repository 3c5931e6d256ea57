//! Keyboard focus between a panel's text field and its rendered list.

use halo_types::ui::{FocusCursor, LogicalKey, Orientation};

/// What the panel should do with a key after navigation looked at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Not a navigation key; the text field gets it.
    PassThrough,
    /// Swallowed without effect.
    Consumed,
    Focus(usize),
    Activate(usize),
    /// Focus went back to the text field; the key is then treated as text.
    ReturnToInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusNavigator {
    orientation: Orientation,
    cursor: FocusCursor,
}

impl FocusNavigator {
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            cursor: FocusCursor::TextInput,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> FocusCursor {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = FocusCursor::TextInput;
    }

    fn enters(&self, key: LogicalKey) -> bool {
        match self.orientation {
            Orientation::Vertical => key == LogicalKey::Down,
            Orientation::Horizontal => matches!(key, LogicalKey::Left | LogicalKey::Right),
        }
    }

    fn next(&self, key: LogicalKey) -> bool {
        match self.orientation {
            Orientation::Vertical => key == LogicalKey::Down,
            Orientation::Horizontal => key == LogicalKey::Right,
        }
    }

    fn prev(&self, key: LogicalKey) -> bool {
        match self.orientation {
            Orientation::Vertical => key == LogicalKey::Up,
            Orientation::Horizontal => key == LogicalKey::Left,
        }
    }

    /// Route a key given `len` rendered items. Escape is the panel's
    /// business and never reaches here.
    pub fn handle(&mut self, key: LogicalKey, len: usize) -> NavAction {
        match self.cursor {
            FocusCursor::TextInput => {
                if !self.enters(key) {
                    return NavAction::PassThrough;
                }
                if len == 0 {
                    return NavAction::Consumed;
                }
                self.cursor = FocusCursor::List { index: 0 };
                NavAction::Focus(0)
            }
            FocusCursor::List { index } => {
                if index >= len {
                    // The list shrank under us; start over from the field.
                    self.cursor = FocusCursor::TextInput;
                    return NavAction::ReturnToInput;
                }
                if key == LogicalKey::Enter {
                    return NavAction::Activate(index);
                }
                let target = if self.next(key) {
                    (index + 1).min(len - 1)
                } else if self.prev(key) {
                    index.saturating_sub(1)
                } else {
                    self.cursor = FocusCursor::TextInput;
                    return NavAction::ReturnToInput;
                };
                if target == index {
                    return NavAction::Consumed;
                }
                self.cursor = FocusCursor::List { index: target };
                NavAction::Focus(target)
            }
        }
    }
}
