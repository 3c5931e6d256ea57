//! System collaborators for the halo engine.
//!
//! Each module wraps one tool (`wpctl`, `brightnessctl`, `cliphist`, `swww`,
//! `powerprofilesctl`, `nmcli`, `bluetoothctl`, a notification client) or a
//! filesystem source. Slow actions run detached so the control thread never
//! waits on them.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod audio;
mod backlight;
mod browser;
mod clipboard;
mod commands;
mod desktop;
mod notify;
mod power;
mod preview;
mod process;
mod status;
mod wallpaper;

use std::rc::Rc;

pub use audio::Wpctl;
pub use backlight::Brightnessctl;
pub use browser::BrowserOpener;
pub use clipboard::{ClipEntry, Cliphist};
pub use commands::{COLOR_PICKER, CustomCommand, CustomCommands};
pub use desktop::{DesktopApps, DesktopEntry, application_dirs, parse_desktop_entry};
pub use notify::CommandNotifier;
pub use power::PowerProfilesCtl;
pub use preview::ImagePreviews;
pub use status::SystemStatus;
pub use wallpaper::{Wallpaper, WallpaperDir};

use halo_config::ShellConfig;
use halo_engine::{Collaborators, LocalClock, SinkWatcher};

/// Wire every collaborator to the real system.
pub fn system(config: &ShellConfig) -> Collaborators {
    let notifier = CommandNotifier::detect();
    Collaborators {
        apps: Box::new(DesktopApps::default()),
        commands: Box::new(CustomCommands::new(config.commands(), notifier.clone())),
        clipboard: Box::new(Cliphist::new(config.clipboard.history_limit)),
        wallpapers: Box::new(WallpaperDir::new(
            config.wallpaper.resolved_path(),
            notifier.clone(),
        )),
        audio: Box::new(Wpctl),
        backlight: Box::new(Brightnessctl),
        device_changes: Box::new(SinkWatcher::new(Wpctl)),
        status: Box::new(SystemStatus::default()),
        power: Box::new(PowerProfilesCtl),
        notifier: Rc::new(notifier),
        browser: Box::new(BrowserOpener::new(&config.web_search)),
        clock: Box::new(LocalClock),
        previews: Some(Box::new(ImagePreviews::new(
            config.wallpaper.preview_width,
            config.wallpaper.preview_height,
        ))),
    }
}
