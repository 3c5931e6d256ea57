//! The concrete panels.

mod clipboard;
mod launcher;
mod osd;
mod power;
mod search;
mod wallpaper;

pub use clipboard::ClipboardPanel;
pub use launcher::LauncherPanel;
pub use osd::OsdPanel;
pub use power::PowerPanel;
pub use search::SearchPanel;
pub use wallpaper::WallpaperPanel;

use halo_config::AnimationConfig;
use halo_types::PanelId;
use halo_types::ui::{LogicalKey, PanelState};

use crate::anim::AnimationDriver;
use crate::command::ShellCommand;
use crate::lifecycle::PanelCx;
use crate::timer::Fired;

/// Operations the shell routes to any panel.
pub trait Panel {
    fn id(&self) -> PanelId;

    fn state(&self) -> PanelState;

    fn show(&mut self, cx: &mut PanelCx<'_>);

    fn hide(&mut self, cx: &mut PanelCx<'_>);

    fn toggle(&mut self, cx: &mut PanelCx<'_>) {
        if self.state().is_shown() {
            self.hide(cx);
        } else {
            self.show(cx);
        }
    }

    /// Key from the input collaborator while this panel has focus.
    fn handle_key(&mut self, key: LogicalKey, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        let _ = (key, cx);
        None
    }

    /// Keyboard focus moved elsewhere.
    fn focus_lost(&mut self, cx: &mut PanelCx<'_>) {
        self.hide(cx);
    }

    fn on_timer(&mut self, fired: Fired, cx: &mut PanelCx<'_>) -> Option<ShellCommand>;
}

fn driver(panel: PanelId, config: &AnimationConfig) -> AnimationDriver {
    AnimationDriver::new(panel, config.tick(), config.effective_easing())
}
