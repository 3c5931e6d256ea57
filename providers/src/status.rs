//! Status bar readings: battery from sysfs, Wi-Fi from `nmcli`, Bluetooth
//! from `bluetoothctl`.

use std::fs;
use std::path::{Path, PathBuf};

use halo_engine::StatusProbe;
use halo_types::{BatteryStatus, ProviderError, WifiStatus};

use crate::process;

const POWER_SUPPLY: &str = "/sys/class/power_supply";
const NMCLI: &str = "nmcli";
const BLUETOOTHCTL: &str = "bluetoothctl";

pub struct SystemStatus {
    power_supply: PathBuf,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self::new(POWER_SUPPLY)
    }
}

impl SystemStatus {
    /// Read batteries and adapters from `power_supply` instead of sysfs.
    pub fn new(power_supply: impl Into<PathBuf>) -> Self {
        Self {
            power_supply: power_supply.into(),
        }
    }
}

impl StatusProbe for SystemStatus {
    fn battery(&mut self) -> Result<BatteryStatus, ProviderError> {
        read_battery(&self.power_supply)
    }

    fn wifi(&mut self) -> Result<WifiStatus, ProviderError> {
        let out = process::output(NMCLI, &["-t", "-f", "ACTIVE,SSID", "dev", "wifi"])?;
        Ok(parse_wifi(&out))
    }

    fn bluetooth(&mut self) -> Result<bool, ProviderError> {
        let out = process::output(BLUETOOTHCTL, &["show"])?;
        parse_powered(&out).ok_or_else(|| ProviderError::parse(BLUETOOTHCTL, out.trim()))
    }
}

fn read_attr(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|value| value.trim().to_string())
}

/// First battery under `root`, plugged if any mains adapter is online or the
/// battery itself reports charging/full.
///
/// A machine without a battery is `Unavailable`, not 0%.
fn read_battery(root: &Path) -> Result<BatteryStatus, ProviderError> {
    let entries = fs::read_dir(root).map_err(|source| ProviderError::Io {
        path: root.display().to_string(),
        source,
    })?;
    let mut supplies: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    supplies.sort();

    let mut battery = None;
    let mut adapter_online = false;
    for supply in &supplies {
        match read_attr(supply, "type").as_deref() {
            Some("Battery") if battery.is_none() => battery = Some(supply),
            Some("Mains" | "USB") => {
                adapter_online |= read_attr(supply, "online").as_deref() == Some("1");
            }
            _ => {}
        }
    }

    let Some(battery) = battery else {
        return Err(ProviderError::Unavailable("battery".to_string()));
    };
    let capacity = read_attr(battery, "capacity").unwrap_or_default();
    let percent: u8 = capacity
        .parse()
        .map_err(|_| ProviderError::parse("power_supply", capacity.clone()))?;
    let charging = matches!(
        read_attr(battery, "status").as_deref(),
        Some("Charging" | "Full" | "Not charging")
    );
    Ok(BatteryStatus {
        percent: percent.min(100),
        plugged: adapter_online || charging,
    })
}

/// `nmcli -t -f ACTIVE,SSID dev wifi` lines look like `yes:home`; colons
/// inside the SSID are escaped as `\:`.
fn parse_wifi(out: &str) -> WifiStatus {
    out.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(active, _)| *active == "yes")
        .map_or(WifiStatus::Disconnected, |(_, ssid)| {
            WifiStatus::Connected(ssid.replace("\\:", ":"))
        })
}

fn parse_powered(out: &str) -> Option<bool> {
    out.lines().find_map(|line| {
        let value = line.trim().strip_prefix("Powered:")?;
        Some(value.trim() == "yes")
    })
}
