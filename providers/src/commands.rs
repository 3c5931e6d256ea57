//! Launcher custom commands built from `[[commands]]`.

use std::rc::Rc;
use std::str::FromStr;

use halo_config::CommandConfig;
use halo_engine::{
    Activation, Candidate, CandidateRef, CandidateSource, Notification, Notifier, ShellCommand,
    Urgency,
};
use halo_types::ProviderError;

use crate::notify::{CommandNotifier, color_swatch, parse_hex_color};
use crate::process;

/// Action name that runs the built-in color picker.
pub const COLOR_PICKER: &str = "color-picker";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Dispatch(ShellCommand),
    ColorPicker,
    Exec(String),
}

pub struct CustomCommand {
    name: String,
    description: Option<String>,
    kind: Kind,
    notifier: CommandNotifier,
}

impl CustomCommand {
    fn from_config(config: &CommandConfig, notifier: &CommandNotifier) -> Result<Self, ProviderError> {
        let kind = match (&config.action, &config.exec) {
            (Some(action), _) if action == COLOR_PICKER => Kind::ColorPicker,
            (Some(action), _) => ShellCommand::from_str(action)
                .map(Kind::Dispatch)
                .map_err(|err| ProviderError::parse("commands", format!("{action}: {err}")))?,
            (None, Some(exec)) => Kind::Exec(exec.clone()),
            (None, None) => {
                return Err(ProviderError::parse(
                    "commands",
                    format!("{} has neither exec nor action", config.name),
                ));
            }
        };
        Ok(Self {
            name: config.name.clone(),
            description: config.description.clone(),
            kind,
            notifier: notifier.clone(),
        })
    }
}

impl Candidate for CustomCommand {
    fn title(&self) -> &str {
        &self.name
    }

    fn subtitle(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn activate(&self) -> Result<Activation, ProviderError> {
        match &self.kind {
            Kind::Dispatch(command) => Ok(Activation::Dispatch(*command)),
            Kind::ColorPicker => {
                process::resolve("hyprpicker")?;
                let notifier = self.notifier.clone();
                process::detach("color-picker", move || pick_color(&notifier))?;
                Ok(Activation::Done)
            }
            Kind::Exec(exec) => {
                tracing::info!(command = %self.name, "running custom command");
                process::shell_detached(exec)?;
                Ok(Activation::Done)
            }
        }
    }
}

/// Pick a color, copy it, and show a notification with a swatch.
///
/// Cancelling the picker prints nothing and is not an error.
fn pick_color(notifier: &CommandNotifier) -> Result<(), ProviderError> {
    let picked = process::output("hyprpicker", &["-a"])?;
    let color = picked.trim();
    if color.is_empty() {
        return Ok(());
    }
    process::run_with_input("wl-copy", &[], color.as_bytes())?;

    let mut notification =
        Notification::new("Color Picker", "Color copied to clipboard").urgency(Urgency::Low);
    if let Some(rgb) = parse_hex_color(color) {
        match color_swatch(rgb, &std::env::temp_dir()) {
            Ok(icon) => notification = notification.icon(icon),
            Err(err) => tracing::debug!("no swatch icon: {err}"),
        }
    }
    notifier.notify(&notification)
}

pub struct CustomCommands {
    configs: Vec<CommandConfig>,
    notifier: CommandNotifier,
}

impl CustomCommands {
    pub fn new(configs: Vec<CommandConfig>, notifier: CommandNotifier) -> Self {
        Self { configs, notifier }
    }
}

impl CandidateSource for CustomCommands {
    /// Invalid entries are logged and skipped; the rest still load.
    fn load(&mut self) -> Result<Vec<CandidateRef>, ProviderError> {
        Ok(self
            .configs
            .iter()
            .filter_map(|config| match CustomCommand::from_config(config, &self.notifier) {
                Ok(command) => Some(Rc::new(command) as CandidateRef),
                Err(err) => {
                    tracing::warn!("ignoring custom command: {err}");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{CustomCommand, CustomCommands, Kind};
    use crate::notify::CommandNotifier;
    use halo_config::{CommandConfig, default_commands};
    use halo_engine::{Activation, Candidate, CandidateSource, ShellCommand};
    use halo_types::PanelId;

    fn notifier() -> CommandNotifier {
        CommandNotifier::detect()
    }

    fn config(name: &str, exec: Option<&str>, action: Option<&str>) -> CommandConfig {
        CommandConfig {
            name: name.to_string(),
            description: None,
            exec: exec.map(str::to_string),
            action: action.map(str::to_string),
        }
    }

    #[test]
    fn defaults_map_to_expected_kinds() {
        let notifier = notifier();
        let kinds: Vec<Kind> = default_commands()
            .iter()
            .map(|c| CustomCommand::from_config(c, &notifier).unwrap().kind)
            .collect();
        assert_eq!(kinds[0], Kind::Dispatch(ShellCommand::Toggle(PanelId::Search)));
        assert_eq!(kinds[1], Kind::Dispatch(ShellCommand::Toggle(PanelId::Clipboard)));
        assert_eq!(kinds[3], Kind::ColorPicker);
        assert_eq!(kinds[4], Kind::Exec("hyprlock".to_string()));
    }

    #[test]
    fn panel_actions_dispatch_without_spawning() {
        let command =
            CustomCommand::from_config(&config("Walls", None, Some("wallpaper.toggle")), &notifier())
                .unwrap();
        assert_eq!(
            command.activate().unwrap(),
            Activation::Dispatch(ShellCommand::Toggle(PanelId::Wallpaper))
        );
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let mut source = CustomCommands::new(
            vec![
                config("Bad action", None, Some("launcher.explode")),
                config("Nothing", None, None),
                config("Lock Screen", Some("hyprlock"), None),
            ],
            notifier(),
        );
        let titles: Vec<String> = source
            .load()
            .unwrap()
            .iter()
            .map(|c| c.title().to_string())
            .collect();
        assert_eq!(titles, ["Lock Screen"]);
    }
}
