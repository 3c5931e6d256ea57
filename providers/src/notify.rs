//! Desktop notifications via `dunstify`, falling back to `notify-send`.

use std::path::PathBuf;

use halo_engine::{Notification, Notifier};
use halo_types::ProviderError;

use crate::process;

const APP_NAME: &str = "halo";
const BACKENDS: [&str; 2] = ["dunstify", "notify-send"];

/// Sends notifications through whichever client is installed.
///
/// Cheap to clone and `Send`, so detached jobs can report back.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: Option<&'static str>,
}

impl CommandNotifier {
    /// Pick the first available client on `PATH`.
    #[must_use]
    pub fn detect() -> Self {
        let program = BACKENDS
            .into_iter()
            .find(|program| process::resolve(program).is_ok());
        match program {
            Some(program) => tracing::debug!(program, "notifications enabled"),
            None => tracing::warn!("no notification client found; notifications disabled"),
        }
        Self { program }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), ProviderError> {
        let program = self
            .program
            .ok_or_else(|| ProviderError::Unavailable(BACKENDS.join("/")))?;
        process::spawn_detached(program, &notification_args(notification))
    }
}

fn notification_args(notification: &Notification) -> Vec<String> {
    let mut args = vec![
        "-a".to_string(),
        APP_NAME.to_string(),
        "-u".to_string(),
        notification.urgency.as_str().to_string(),
    ];
    if let Some(icon) = &notification.icon {
        args.push("-i".to_string());
        args.push(icon.display().to_string());
    }
    args.push(notification.summary.clone());
    args.push(notification.body.clone());
    args
}

/// Parse `#rrggbb` (the `#` is optional).
pub(crate) fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Write a small solid-color PNG to use as a notification icon.
pub(crate) fn color_swatch(color: [u8; 3], dir: &std::path::Path) -> Result<PathBuf, ProviderError> {
    let [r, g, b] = color;
    let path = dir.join(format!("halo-color-{r:02x}{g:02x}{b:02x}.png"));
    image::RgbImage::from_pixel(16, 16, image::Rgb(color))
        .save(&path)
        .map_err(|err| ProviderError::Io {
            path: path.display().to_string(),
            source: std::io::Error::other(err),
        })?;
    Ok(path)
}
