//! Configuration for the halo shell.
//!
//! Every component receives the section it needs at construction time; there
//! is no process-wide config lookup. All fields have documented defaults, so a
//! missing file, a missing section, or a missing key all mean "use the default".
//!
//! ```toml
//! [animation]
//! tick_ms = 8
//! easing = 0.15
//!
//! [launcher]
//! prefix = ">"
//!
//! [bindings]
//! f1 = "launcher.toggle"
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub use halo_types::ui::Edge;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "HALO_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub animation: AnimationConfig,
    pub list: ListConfig,
    pub launcher: LauncherConfig,
    pub osd: OsdConfig,
    pub power: PowerConfig,
    pub bar: BarConfig,
    pub clipboard: ClipboardConfig,
    pub wallpaper: WallpaperConfig,
    pub web_search: WebSearchConfig,
    pub ui: UiConfig,
    /// Launcher custom commands. Absent means the built-in set.
    pub commands: Option<Vec<CommandConfig>>,
    /// Terminal key name -> shell command. A `[bindings]` table replaces the
    /// defaults entirely.
    pub bindings: BTreeMap<String, String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            animation: AnimationConfig::default(),
            list: ListConfig::default(),
            launcher: LauncherConfig::default(),
            osd: OsdConfig::default(),
            power: PowerConfig::default(),
            bar: BarConfig::default(),
            clipboard: ClipboardConfig::default(),
            wallpaper: WallpaperConfig::default(),
            web_search: WebSearchConfig::default(),
            ui: UiConfig::default(),
            commands: None,
            bindings: default_bindings(),
        }
    }
}

/// Animation driver tuning.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Tick interval of the driver loop. Default: 8.
    pub tick_ms: u64,
    /// Fraction of the remaining distance covered per tick. Default: 0.15.
    pub easing: f32,
    /// Edge margin of a fully shown panel, in pixels. Default: -40.
    pub rest_offset: f32,
    /// Settle every animation on its first tick.
    pub reduced_motion: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_ms: 8,
            easing: 0.15,
            rest_offset: -40.0,
            reduced_motion: false,
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Easing with `reduced_motion` applied.
    #[must_use]
    pub fn effective_easing(&self) -> f32 {
        if self.reduced_motion { 1.0 } else { self.easing }
    }
}

/// Filterable list behaviour shared by launcher, clipboard and wallpaper panels.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Delay after the last filter change before the list is rebuilt. Default: 150.
    pub debounce_ms: u64,
    /// Maximum number of rendered items. Default: 20.
    pub render_cap: usize,
    /// Default: 40.
    pub item_height: f32,
    /// Default: 4.
    pub spacing: f32,
    /// Cap on the computed container height. Default: 400.
    pub max_height: f32,
    /// Delay before the filter text is cleared after an activation. Default: 500.
    pub clear_filter_delay_ms: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            render_cap: 20,
            item_height: 40.0,
            spacing: 4.0,
            max_height: 400.0,
            clear_filter_delay_ms: 500,
        }
    }
}

impl ListConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn clear_filter_delay(&self) -> Duration {
        Duration::from_millis(self.clear_filter_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Filter prefix that switches the launcher to custom commands. Default: ">".
    pub prefix: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            prefix: ">".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct OsdConfig {
    /// Auto-hide delay after the last value change. Default: 1000.
    pub hide_after_ms: u64,
    /// Percent per nudge. Default: 5.
    pub step: u8,
    /// Audio sink poll interval. Default: 1000.
    pub sink_poll_ms: u64,
    /// Edge the OSD slides from. Default: right.
    pub edge: Edge,
}

impl Default for OsdConfig {
    fn default() -> Self {
        Self {
            hide_after_ms: 1000,
            step: 5,
            sink_poll_ms: 1000,
            edge: Edge::Right,
        }
    }
}

impl OsdConfig {
    #[must_use]
    pub fn hide_after(&self) -> Duration {
        Duration::from_millis(self.hide_after_ms)
    }

    #[must_use]
    pub fn sink_poll(&self) -> Duration {
        Duration::from_millis(self.sink_poll_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Auto-hide delay of the power-profile popup. Default: 2000.
    pub hide_after_ms: u64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            hide_after_ms: 2000,
        }
    }
}

impl PowerConfig {
    #[must_use]
    pub fn hide_after(&self) -> Duration {
        Duration::from_millis(self.hide_after_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// chrono format string. Default: "%H:%M".
    pub clock_format: String,
    /// Battery / Wi-Fi / Bluetooth poll interval. Default: 5000.
    pub status_poll_ms: u64,
    /// Notify once when the battery drops below this while unplugged. Default: 10.
    pub low_battery_percent: u8,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            clock_format: "%H:%M".to_string(),
            status_poll_ms: 5000,
            low_battery_percent: 10,
        }
    }
}

impl BarConfig {
    #[must_use]
    pub fn status_poll(&self) -> Duration {
        Duration::from_millis(self.status_poll_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Number of history entries loaded on show. Default: 50.
    pub history_limit: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self { history_limit: 50 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WallpaperConfig {
    /// Wallpaper directory. `~` and `${VAR}` are expanded.
    pub path: String,
    /// Preview raster width in pixels. Default: 24.
    pub preview_width: u16,
    /// Preview raster height in pixels. Default: 12.
    pub preview_height: u16,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            path: "~/.local/share/wallpapers".to_string(),
            preview_width: 24,
            preview_height: 12,
        }
    }
}

impl WallpaperConfig {
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        expand_path(&self.path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    /// Search endpoint; the query is appended as `q`.
    pub url: String,
    pub browser: String,
    pub browser_args: Vec<String>,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            url: "https://www.google.com/search".to_string(),
            browser: "firefox".to_string(),
            browser_args: vec!["--new-window".to_string()],
        }
    }
}

/// Presentation options for the terminal front-end.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Use ASCII-only glyphs for icons.
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    pub high_contrast: bool,
}

/// A launcher custom command.
///
/// Exactly one of `exec` (run through `sh -c`) or `action` (a shell command
/// such as `"clipboard.toggle"`) is expected; `action` wins if both are set.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommandConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exec: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl CommandConfig {
    fn exec(name: &str, description: &str, exec: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            exec: Some(exec.to_string()),
            action: None,
        }
    }

    fn action(name: &str, description: &str, action: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            exec: None,
            action: Some(action.to_string()),
        }
    }
}

/// Built-in launcher commands used when the config has no `[[commands]]`.
///
/// "Color Picker" is special-cased by the providers by its `action`.
#[must_use]
pub fn default_commands() -> Vec<CommandConfig> {
    vec![
        CommandConfig::action("Search in Browser", "Search in Firefox Browser", "search.toggle"),
        CommandConfig::action("Clipboard", "Clipboard Manager", "clipboard.toggle"),
        CommandConfig::action("Wallpaper Changer", "Wallpaper Changer", "wallpaper.toggle"),
        CommandConfig::action("Color Picker", "Color Picker", "color-picker"),
        CommandConfig::exec("Lock Screen", "Hyprlock Screen", "hyprlock"),
        CommandConfig::exec("Shutdown", "Shutdown System", "systemctl poweroff"),
        CommandConfig::exec("Logout", "Logout from system", "pkill niri"),
        CommandConfig::exec("Reboot", "Reboot system", "systemctl reboot"),
    ]
}

fn default_bindings() -> BTreeMap<String, String> {
    [
        ("f1", "launcher.toggle"),
        ("f2", "clipboard.toggle"),
        ("f3", "wallpaper.toggle"),
        ("f4", "search.toggle"),
        ("f5", "power.toggle"),
        ("f6", "osd.volume-down"),
        ("f7", "osd.volume-up"),
        ("f8", "osd.mute"),
        ("f9", "osd.brightness-down"),
        ("f10", "osd.brightness-up"),
    ]
    .into_iter()
    .map(|(key, command)| (key.to_string(), command.to_string()))
    .collect()
}

impl ShellConfig {
    /// Load from the default location.
    ///
    /// `Ok(None)` means there is no config file; callers use defaults.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Custom commands with the built-in set as fallback.
    #[must_use]
    pub fn commands(&self) -> Vec<CommandConfig> {
        self.commands.clone().unwrap_or_else(default_commands)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV)
        && !path.trim().is_empty()
    {
        return Some(expand_path(&path));
    }
    dirs::config_dir().map(|dir| dir.join("halo").join("config.toml"))
}

/// Expand `${VAR}` references. Unset variables expand to the empty string.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}

/// Expand `${VAR}` and a leading `~`.
#[must_use]
pub fn expand_path(value: &str) -> PathBuf {
    let expanded = expand_env_vars(value.trim());
    if expanded == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(expanded));
    }
    if let Some(rest) = expanded.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ShellConfig::default();
        assert_eq!(config.list.debounce_ms, 150);
        assert_eq!(config.list.render_cap, 20);
        assert_eq!(config.launcher.prefix, ">");
        assert_eq!(config.osd.hide_after(), Duration::from_secs(1));
        assert_eq!(config.animation.tick(), Duration::from_millis(8));
        assert_eq!(config.commands().len(), 8);
        assert_eq!(config.bindings.len(), 10);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: ShellConfig = toml::from_str(
            r#"
            [launcher]
            prefix = "!"

            [list]
            debounce_ms = 100
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.launcher.prefix, "!");
        assert_eq!(config.list.debounce_ms, 100);
        assert_eq!(config.list.render_cap, 20);
        assert_eq!(config.osd.step, 5);
        assert_eq!(
            config.bindings.get("f1").map(String::as_str),
            Some("launcher.toggle")
        );
    }

    #[test]
    fn bindings_table_replaces_defaults() {
        let config: ShellConfig = toml::from_str(
            r#"
            [bindings]
            f12 = "launcher.toggle"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.bindings.len(), 1);
    }

    #[test]
    fn custom_commands_override_builtins() {
        let config: ShellConfig = toml::from_str(
            r#"
            [[commands]]
            name = "Terminal"
            exec = "foot"
            "#,
        )
        .expect("valid toml");
        let commands = config.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name, "Terminal");
        assert_eq!(commands[0].description, None);
    }

    #[test]
    fn osd_edge_parses_lowercase() {
        let config: ShellConfig = toml::from_str(
            r#"
            [osd]
            edge = "left"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.osd.edge, Edge::Left);
    }

    #[test]
    fn reduced_motion_forces_full_easing() {
        let anim = AnimationConfig {
            reduced_motion: true,
            ..AnimationConfig::default()
        };
        assert_eq!(anim.effective_easing(), 1.0);
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[list\ndebounce_ms = ").expect("write");
        let err = ShellConfig::load_from(&path).expect_err("invalid toml");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn load_from_missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope.toml");
        let err = ShellConfig::load_from(&path).expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("hello world"), "hello world");
    }

    #[test]
    fn expand_env_vars_single_var() {
        unsafe {
            env::set_var("HALO_TEST_CONFIG_VAR", "replaced");
        }
        let result = expand_env_vars("prefix ${HALO_TEST_CONFIG_VAR} suffix");
        assert_eq!(result, "prefix replaced suffix");
        unsafe {
            env::remove_var("HALO_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn expand_env_vars_unterminated_is_literal() {
        assert_eq!(expand_env_vars("a ${B"), "a ${B");
    }

    #[test]
    fn expand_path_absolute_untouched() {
        assert_eq!(
            expand_path("/srv/walls"),
            PathBuf::from("/srv/walls")
        );
    }

    #[test]
    fn expand_path_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/walls"), home.join("walls"));
        }
    }
}
