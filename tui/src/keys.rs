//! Terminal keys to shell input.
//!
//! Global bindings (`f1 = "launcher.toggle"`) are checked first; whatever is
//! left goes to the focused panel as a [`LogicalKey`].

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;
use tracing::warn;

use halo_engine::{LogicalKey, ShellCommand};

/// What one terminal key means to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(LogicalKey),
    Command(ShellCommand),
    Quit,
    FocusLost,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid key binding: {0:?}")]
pub struct ParseBindingError(String);

/// A key plus modifiers, normalized so lookups ignore case and shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self {
            code,
            modifiers: modifiers.difference(KeyModifiers::SHIFT),
        }
    }

    #[must_use]
    pub fn from_event(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl FromStr for KeyBinding {
    type Err = ParseBindingError;

    /// Accepts `f1`, `ctrl+x`, `alt+shift+l`, `space`, `esc` and the like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseBindingError(s.to_string());
        let lowered = s.trim().to_ascii_lowercase();
        let mut parts: Vec<&str> = lowered.split('+').collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or_else(err)?;

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= match part {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                "super" | "mod" => KeyModifiers::SUPER,
                _ => return Err(err()),
            };
        }

        let code = match key {
            "space" => KeyCode::Char(' '),
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            _ if key.len() > 1 && key.starts_with('f') => {
                let n: u8 = key[1..].parse().map_err(|_| err())?;
                if !(1..=24).contains(&n) {
                    return Err(err());
                }
                KeyCode::F(n)
            }
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(err()),
                }
            }
        };
        Ok(Self::new(code, modifiers))
    }
}

/// Global bindings from the `[bindings]` table.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<KeyBinding, ShellCommand>,
}

impl KeyMap {
    /// Invalid keys or commands are logged and skipped.
    #[must_use]
    pub fn from_config(table: &BTreeMap<String, String>) -> Self {
        let mut bindings = HashMap::new();
        for (key, command) in table {
            let binding = match key.parse::<KeyBinding>() {
                Ok(binding) => binding,
                Err(e) => {
                    warn!(error = %e, "Skipping key binding");
                    continue;
                }
            };
            match command.parse::<ShellCommand>() {
                Ok(command) => {
                    bindings.insert(binding, command);
                }
                Err(e) => warn!(key = %key, error = %e, "Skipping key binding"),
            }
        }
        Self { bindings }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn command(&self, event: &KeyEvent) -> Option<ShellCommand> {
        self.bindings.get(&KeyBinding::from_event(event)).copied()
    }

    /// Classify a key event. Releases are ignored.
    #[must_use]
    pub fn translate(&self, event: &KeyEvent) -> Input {
        if !matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return Input::Ignored;
        }
        if event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(event.code, KeyCode::Char('c' | 'q'))
        {
            return Input::Quit;
        }
        if let Some(command) = self.command(event) {
            return Input::Command(command);
        }
        if event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
        {
            return Input::Ignored;
        }
        match event.code {
            KeyCode::Esc => Input::Key(LogicalKey::Escape),
            KeyCode::Up => Input::Key(LogicalKey::Up),
            KeyCode::Down => Input::Key(LogicalKey::Down),
            KeyCode::Left => Input::Key(LogicalKey::Left),
            KeyCode::Right => Input::Key(LogicalKey::Right),
            KeyCode::Enter => Input::Key(LogicalKey::Enter),
            KeyCode::Backspace => Input::Key(LogicalKey::Backspace),
            KeyCode::Char(c) => Input::Key(LogicalKey::Char(c)),
            _ => Input::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use halo_engine::{LogicalKey, OsdAction, ShellCommand};
    use halo_types::PanelId;

    use super::{Input, KeyBinding, KeyMap};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn keymap(entries: &[(&str, &str)]) -> KeyMap {
        let table: BTreeMap<String, String> = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        KeyMap::from_config(&table)
    }

    #[test]
    fn parses_binding_names() {
        assert_eq!(
            "F1".parse::<KeyBinding>().unwrap(),
            KeyBinding::new(KeyCode::F(1), KeyModifiers::NONE)
        );
        assert_eq!(
            "ctrl+space".parse::<KeyBinding>().unwrap(),
            KeyBinding::new(KeyCode::Char(' '), KeyModifiers::CONTROL)
        );
        assert_eq!(
            "alt+shift+L".parse::<KeyBinding>().unwrap(),
            KeyBinding::new(KeyCode::Char('l'), KeyModifiers::ALT)
        );
        assert!("hyper+x".parse::<KeyBinding>().is_err());
        assert!("f99".parse::<KeyBinding>().is_err());
        assert!("ctrl+".parse::<KeyBinding>().is_err());
        assert!("xy".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn bindings_win_over_panel_keys() {
        let map = keymap(&[("f1", "launcher.toggle"), ("alt+v", "osd.volume-up")]);
        assert_eq!(
            map.translate(&press(KeyCode::F(1), KeyModifiers::NONE)),
            Input::Command(ShellCommand::Toggle(PanelId::Launcher))
        );
        assert_eq!(
            map.translate(&press(KeyCode::Char('V'), KeyModifiers::ALT | KeyModifiers::SHIFT)),
            Input::Command(ShellCommand::Osd(OsdAction::VolumeUp))
        );
        assert_eq!(
            map.translate(&press(KeyCode::Char('v'), KeyModifiers::NONE)),
            Input::Key(LogicalKey::Char('v'))
        );
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let map = keymap(&[("f1", "launcher.toggle"), ("f2", "nope.toggle"), ("bogus+k", "launcher.show")]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn ctrl_c_and_ctrl_q_quit() {
        let map = KeyMap::default();
        assert_eq!(
            map.translate(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Input::Quit
        );
        assert_eq!(
            map.translate(&press(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Input::Quit
        );
        assert_eq!(
            map.translate(&press(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            Input::Ignored
        );
    }

    #[test]
    fn releases_are_ignored() {
        let map = KeyMap::default();
        let mut event = press(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(map.translate(&event), Input::Key(LogicalKey::Enter));
        event.kind = KeyEventKind::Release;
        assert_eq!(map.translate(&event), Input::Ignored);
    }
}
