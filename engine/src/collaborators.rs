//! Ports to the outside world.
//!
//! Everything the shell reads from or does to the system goes through one of
//! these traits. `halo-providers` implements them with subprocesses and
//! sysfs; tests plug in fakes.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use halo_types::ui::Preview;
use halo_types::{BatteryStatus, PowerProfile, ProviderError, WifiStatus};

use crate::command::ShellCommand;

/// What activating a candidate asks of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The candidate did its work (launched a program, copied an entry).
    Done,
    /// The candidate wants the shell to run a command, e.g. open a sibling
    /// panel.
    Dispatch(ShellCommand),
}

/// One selectable row: an application, a command, a clipboard entry, a
/// wallpaper.
pub trait Candidate {
    fn title(&self) -> &str;

    fn subtitle(&self) -> Option<&str> {
        None
    }

    /// Text the filter matches against: the title, followed by the subtitle
    /// when there is one.
    fn match_text(&self) -> String {
        match self.subtitle() {
            Some(subtitle) => format!("{} {subtitle}", self.title()),
            None => self.title().to_string(),
        }
    }

    /// Image to show as a thumbnail, if any.
    fn preview_path(&self) -> Option<&Path> {
        None
    }

    fn activate(&self) -> Result<Activation, ProviderError>;
}

pub type CandidateRef = Rc<dyn Candidate>;

pub trait CandidateSource {
    fn load(&mut self) -> Result<Vec<CandidateRef>, ProviderError>;
}

/// A 0..=100 level such as volume or backlight brightness.
pub trait LevelControl {
    fn read(&mut self) -> Result<u8, ProviderError>;

    /// Relative change in percentage points.
    fn nudge(&mut self, delta: i16) -> Result<(), ProviderError>;
}

pub trait AudioControl: LevelControl {
    fn read_muted(&mut self) -> Result<bool, ProviderError>;

    fn toggle_mute(&mut self) -> Result<(), ProviderError>;
}

/// Identity of the current default audio sink.
pub trait SinkProbe {
    fn current_sink(&mut self) -> Result<String, ProviderError>;
}

pub trait StatusProbe {
    fn battery(&mut self) -> Result<BatteryStatus, ProviderError>;
    fn wifi(&mut self) -> Result<WifiStatus, ProviderError>;
    fn bluetooth(&mut self) -> Result<bool, ProviderError>;
}

pub trait PowerProfileControl {
    fn active(&mut self) -> Result<PowerProfile, ProviderError>;
    fn set(&mut self, profile: PowerProfile) -> Result<(), ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Urgency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub summary: String,
    pub body: String,
    pub urgency: Urgency,
    pub icon: Option<PathBuf>,
}

impl Notification {
    #[must_use]
    pub fn new(summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            body: body.into(),
            urgency: Urgency::Normal,
            icon: None,
        }
    }

    #[must_use]
    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), ProviderError>;
}

pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<(), ProviderError>;
}

/// Decodes an image into a thumbnail. Runs on the preview worker thread.
pub trait PreviewDecoder: Send {
    fn decode(&self, path: &Path) -> Result<Preview, ProviderError>;
}

/// Wall-clock text for the status bar.
pub trait WallClock {
    /// Current local time rendered with a strftime-style format.
    fn format(&self, format: &str) -> String;
}

/// Local time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl WallClock for LocalClock {
    fn format(&self, format: &str) -> String {
        format_time(&chrono::Local::now(), format)
    }
}

/// Render `time` with `format`, falling back to `%H:%M` when the format
/// string is invalid.
pub fn format_time<Tz>(time: &chrono::DateTime<Tz>, format: &str) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    use std::fmt::Write;

    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_ok() {
        return out;
    }
    tracing::warn!(format, "invalid clock format, using %H:%M");
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::{Activation, Candidate, format_time};
    use chrono::{TimeZone, Utc};
    use halo_types::ProviderError;

    struct App;

    impl Candidate for App {
        fn title(&self) -> &str {
            "Firefox"
        }

        fn subtitle(&self) -> Option<&str> {
            Some("Web Browser")
        }

        fn activate(&self) -> Result<Activation, ProviderError> {
            Ok(Activation::Done)
        }
    }

    #[test]
    fn match_text_joins_title_and_subtitle() {
        assert_eq!(App.match_text(), "Firefox Web Browser");
    }

    #[test]
    fn clock_format_falls_back_when_invalid() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 9, 7, 0).single().expect("valid");
        assert_eq!(format_time(&time, "%H:%M"), "09:07");
        assert_eq!(format_time(&time, "%Q"), "09:07");
    }
}
