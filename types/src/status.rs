//! Status bar and power-profile data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Battery reading. Machines without a battery report 0% unplugged,
/// the same default the status probe uses on read failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryStatus {
    pub percent: u8,
    pub plugged: bool,
}

impl BatteryStatus {
    /// Ten-percent bucket used for icon selection (0..=10).
    #[must_use]
    pub fn level_bucket(self) -> u8 {
        self.percent.min(100) / 10
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WifiStatus {
    Connected(String),
    Disconnected,
    #[default]
    Unavailable,
}

impl fmt::Display for WifiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WifiStatus::Connected(ssid) => f.write_str(ssid),
            WifiStatus::Disconnected => f.write_str("No Wi-Fi"),
            WifiStatus::Unavailable => f.write_str("Wi-Fi N/A"),
        }
    }
}

/// Everything the status bar shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub clock: String,
    pub battery: BatteryStatus,
    pub wifi: WifiStatus,
    pub bluetooth: bool,
}

/// Platform power profile as understood by power-profiles-daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerProfile {
    PowerSaver,
    Balanced,
    Performance,
}

impl PowerProfile {
    /// Display order in the popup, left to right.
    pub const ALL: [PowerProfile; 3] = [
        PowerProfile::PowerSaver,
        PowerProfile::Balanced,
        PowerProfile::Performance,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PowerProfile::PowerSaver => "power-saver",
            PowerProfile::Balanced => "balanced",
            PowerProfile::Performance => "performance",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PowerProfile::PowerSaver => "Power Save",
            PowerProfile::Balanced => "Balanced",
            PowerProfile::Performance => "Performance",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name.trim())
    }
}
