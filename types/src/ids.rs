use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identity of an overlay panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Launcher,
    Clipboard,
    Wallpaper,
    Osd,
    Power,
    Search,
}

impl PanelId {
    pub const ALL: [PanelId; 6] = [
        PanelId::Launcher,
        PanelId::Clipboard,
        PanelId::Wallpaper,
        PanelId::Osd,
        PanelId::Power,
        PanelId::Search,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PanelId::Launcher => "launcher",
            PanelId::Clipboard => "clipboard",
            PanelId::Wallpaper => "wallpaper",
            PanelId::Osd => "osd",
            PanelId::Power => "power",
            PanelId::Search => "search",
        }
    }

    /// Whether the panel grabs keyboard focus when shown.
    ///
    /// The OSD is a passive indicator and never takes focus, so it is also
    /// never subject to focus-loss hiding.
    #[must_use]
    pub const fn takes_focus(self) -> bool {
        !matches!(self, PanelId::Osd)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown panel: {0}")]
pub struct ParsePanelIdError(pub String);

impl FromStr for PanelId {
    type Err = ParsePanelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "launcher" => Ok(PanelId::Launcher),
            "clipboard" => Ok(PanelId::Clipboard),
            "wallpaper" | "wallpapers" => Ok(PanelId::Wallpaper),
            "osd" => Ok(PanelId::Osd),
            "power" | "battery-profile" => Ok(PanelId::Power),
            "search" | "browser" => Ok(PanelId::Search),
            other => Err(ParsePanelIdError(other.to_string())),
        }
    }
}

/// Opaque cancellation handle for a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// What a fired timer means. The shell dispatches on this tag instead of
/// storing callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Animation driver step for a panel.
    Animation(PanelId),
    /// Debounced list rebuild.
    Rebuild(PanelId),
    /// Delayed hide after the last activity.
    AutoHide(PanelId),
    /// Delayed clear of the filter text after an item was activated.
    ClearFilter(PanelId),
    /// Audio sink change poll.
    DevicePoll,
    /// Status bar clock.
    ClockTick,
    /// Status bar battery / network / bluetooth poll.
    StatusPoll,
}

impl TimerKind {
    #[must_use]
    pub fn panel(self) -> Option<PanelId> {
        match self {
            TimerKind::Animation(panel)
            | TimerKind::Rebuild(panel)
            | TimerKind::AutoHide(panel)
            | TimerKind::ClearFilter(panel) => Some(panel),
            TimerKind::DevicePoll | TimerKind::ClockTick | TimerKind::StatusPoll => None,
        }
    }
}

/// Handle the render sink returns for an item it added to a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(u64);

impl ItemHandle {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}
