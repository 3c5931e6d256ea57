//! Named shell commands: the vocabulary of key bindings and launcher entries.

use std::fmt;
use std::str::FromStr;

use halo_types::{PanelId, ParsePanelIdError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsdAction {
    VolumeUp,
    VolumeDown,
    ToggleMute,
    BrightnessUp,
    BrightnessDown,
}

impl OsdAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OsdAction::VolumeUp => "volume-up",
            OsdAction::VolumeDown => "volume-down",
            OsdAction::ToggleMute => "mute",
            OsdAction::BrightnessUp => "brightness-up",
            OsdAction::BrightnessDown => "brightness-down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Toggle(PanelId),
    Show(PanelId),
    Hide(PanelId),
    Osd(OsdAction),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("command must look like <panel>.<verb>: {0:?}")]
    Malformed(String),
    #[error(transparent)]
    Panel(#[from] ParsePanelIdError),
    #[error("unknown verb {verb:?} for {panel}")]
    Verb { panel: PanelId, verb: String },
}

impl FromStr for ShellCommand {
    type Err = ParseCommandError;

    /// Parses `launcher.toggle`, `osd.volume-up` and friends. A trailing
    /// `()` is accepted so bindings written as calls keep working.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix("()").unwrap_or(trimmed);
        let (panel, verb) = trimmed
            .split_once('.')
            .ok_or_else(|| ParseCommandError::Malformed(s.to_string()))?;
        let panel: PanelId = panel.parse()?;
        let verb = verb.to_ascii_lowercase().replace('_', "-");

        let command = match (panel, verb.as_str()) {
            (_, "toggle") => ShellCommand::Toggle(panel),
            (_, "show") => ShellCommand::Show(panel),
            (_, "hide") => ShellCommand::Hide(panel),
            (PanelId::Osd, "volume-up") => ShellCommand::Osd(OsdAction::VolumeUp),
            (PanelId::Osd, "volume-down") => ShellCommand::Osd(OsdAction::VolumeDown),
            (PanelId::Osd, "mute" | "toggle-mute") => ShellCommand::Osd(OsdAction::ToggleMute),
            (PanelId::Osd, "brightness-up") => ShellCommand::Osd(OsdAction::BrightnessUp),
            (PanelId::Osd, "brightness-down") => ShellCommand::Osd(OsdAction::BrightnessDown),
            _ => return Err(ParseCommandError::Verb { panel, verb }),
        };
        Ok(command)
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellCommand::Toggle(panel) => write!(f, "{panel}.toggle"),
            ShellCommand::Show(panel) => write!(f, "{panel}.show"),
            ShellCommand::Hide(panel) => write!(f, "{panel}.hide"),
            ShellCommand::Osd(action) => write!(f, "osd.{}", action.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OsdAction, ParseCommandError, ShellCommand};
    use halo_types::PanelId;

    #[test]
    fn parses_panel_verbs() {
        assert_eq!(
            "launcher.toggle".parse::<ShellCommand>(),
            Ok(ShellCommand::Toggle(PanelId::Launcher))
        );
        assert_eq!(
            "wallpapers.show()".parse::<ShellCommand>(),
            Ok(ShellCommand::Show(PanelId::Wallpaper))
        );
        assert_eq!(
            " search.hide ".parse::<ShellCommand>(),
            Ok(ShellCommand::Hide(PanelId::Search))
        );
    }

    #[test]
    fn parses_osd_actions() {
        assert_eq!(
            "osd.volume_up".parse::<ShellCommand>(),
            Ok(ShellCommand::Osd(OsdAction::VolumeUp))
        );
        assert_eq!(
            "osd.mute".parse::<ShellCommand>(),
            Ok(ShellCommand::Osd(OsdAction::ToggleMute))
        );
    }

    #[test]
    fn rejects_unknown_verbs_and_panels() {
        assert!(matches!(
            "launcher.volume-up".parse::<ShellCommand>(),
            Err(ParseCommandError::Verb { .. })
        ));
        assert!(matches!(
            "dock.toggle".parse::<ShellCommand>(),
            Err(ParseCommandError::Panel(_))
        ));
        assert!(matches!(
            "toggle".parse::<ShellCommand>(),
            Err(ParseCommandError::Malformed(_))
        ));
    }

    #[test]
    fn display_parses_back() {
        for command in [
            ShellCommand::Toggle(PanelId::Clipboard),
            ShellCommand::Hide(PanelId::Power),
            ShellCommand::Osd(OsdAction::BrightnessDown),
        ] {
            assert_eq!(command.to_string().parse::<ShellCommand>(), Ok(command));
        }
    }
}
