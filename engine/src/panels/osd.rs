//! On-screen display for volume and brightness.

use halo_config::ShellConfig;
use halo_types::ui::{PanelState, PropertyId};
use halo_types::{PanelId, ProviderError, TimerKind};

use crate::anim::Role;
use crate::autohide::AutoHide;
use crate::collaborators::{AudioControl, LevelControl};
use crate::command::{OsdAction, ShellCommand};
use crate::lifecycle::{PanelCx, PanelLifecycle};
use crate::timer::Fired;

use super::Panel;

pub struct OsdPanel {
    lifecycle: PanelLifecycle,
    auto_hide: AutoHide,
    audio: Box<dyn AudioControl>,
    backlight: Box<dyn LevelControl>,
    step: i16,
    volume: u8,
    muted: bool,
    brightness: u8,
}

impl OsdPanel {
    #[must_use]
    pub fn new(
        config: &ShellConfig,
        audio: Box<dyn AudioControl>,
        backlight: Box<dyn LevelControl>,
    ) -> Self {
        let driver = super::driver(PanelId::Osd, &config.animation)
            .with(PropertyId::Opacity, Role::Fade, 0.0)
            .with(PropertyId::Offset, Role::Slide(config.osd.edge), 0.0)
            .with(PropertyId::Volume, Role::Free, 0.0)
            .with(PropertyId::Brightness, Role::Free, 0.0);
        let mut osd = Self {
            lifecycle: PanelLifecycle::new(driver, config.animation.rest_offset),
            auto_hide: AutoHide::new(PanelId::Osd, config.osd.hide_after()),
            audio,
            backlight,
            step: i16::from(config.osd.step),
            volume: 0,
            muted: false,
            brightness: 0,
        };
        osd.refresh();
        osd.lifecycle
            .rest_at(PropertyId::Volume, f32::from(osd.volume) / 100.0);
        osd.lifecycle
            .rest_at(PropertyId::Brightness, f32::from(osd.brightness) / 100.0);
        osd
    }

    #[must_use]
    pub fn volume(&self) -> u8 {
        self.volume
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    #[must_use]
    pub fn lifecycle(&self) -> &PanelLifecycle {
        &self.lifecycle
    }

    pub fn apply(&mut self, action: OsdAction, cx: &mut PanelCx<'_>) {
        match action {
            OsdAction::VolumeUp => {
                self.volume = nudge(self.audio.as_mut(), "volume", self.volume, self.step);
            }
            OsdAction::VolumeDown => {
                self.volume = nudge(self.audio.as_mut(), "volume", self.volume, -self.step);
            }
            OsdAction::BrightnessUp => {
                self.brightness = nudge(
                    self.backlight.as_mut(),
                    "brightness",
                    self.brightness,
                    self.step,
                );
            }
            OsdAction::BrightnessDown => {
                self.brightness = nudge(
                    self.backlight.as_mut(),
                    "brightness",
                    self.brightness,
                    -self.step,
                );
            }
            OsdAction::ToggleMute => {
                if let Err(err) = self.audio.toggle_mute() {
                    tracing::warn!("mute toggle failed: {err}");
                }
                self.muted = read_or(self.audio.read_muted(), "mute state", self.muted);
            }
        }
        self.present(cx);
    }

    /// The default audio sink changed: re-read everything and show.
    pub fn on_device_changed(&mut self, cx: &mut PanelCx<'_>) {
        self.refresh();
        self.present(cx);
    }

    fn refresh(&mut self) {
        self.volume = read_or(self.audio.read(), "volume", self.volume);
        self.muted = read_or(self.audio.read_muted(), "mute state", self.muted);
        self.brightness = read_or(self.backlight.read(), "brightness", self.brightness);
    }

    /// Show (or keep showing), move the bars, restart the auto-hide.
    fn present(&mut self, cx: &mut PanelCx<'_>) {
        self.lifecycle.show(cx);
        self.lifecycle
            .set_target(PropertyId::Volume, f32::from(self.volume) / 100.0, cx);
        self.lifecycle.set_target(
            PropertyId::Brightness,
            f32::from(self.brightness) / 100.0,
            cx,
        );
        cx.sink.set_muted(self.muted);
        self.auto_hide.reschedule(cx.timers);
    }
}

fn read_or<T: Copy>(result: Result<T, ProviderError>, what: &str, last: T) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!("{what} read failed, keeping last value: {err}");
        last
    })
}

/// Move a level by `delta`, clamped to 0..=100. The control is only asked
/// to move when the clamped level actually changes.
fn nudge(control: &mut dyn LevelControl, what: &str, last: u8, delta: i16) -> u8 {
    let current = read_or(control.read(), what, last).min(100);
    let target = (i16::from(current) + delta).clamp(0, 100);
    let moved = target - i16::from(current);
    if moved == 0 {
        return current;
    }
    if let Err(err) = control.nudge(moved) {
        tracing::warn!("{what} change failed: {err}");
        return current;
    }
    u8::try_from(target).unwrap_or(current)
}

impl Panel for OsdPanel {
    fn id(&self) -> PanelId {
        PanelId::Osd
    }

    fn state(&self) -> PanelState {
        self.lifecycle.state()
    }

    fn show(&mut self, cx: &mut PanelCx<'_>) {
        self.refresh();
        self.present(cx);
    }

    fn hide(&mut self, cx: &mut PanelCx<'_>) {
        self.auto_hide.cancel(cx.timers);
        self.lifecycle.hide(cx);
    }

    /// Passive indicator: focus changes never hide it.
    fn focus_lost(&mut self, _cx: &mut PanelCx<'_>) {}

    fn on_timer(&mut self, fired: Fired, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        match fired.kind {
            TimerKind::Animation(_) => {
                self.lifecycle.on_tick(fired, cx);
            }
            TimerKind::AutoHide(_) if self.auto_hide.take(&fired) => {
                self.lifecycle.hide(cx);
            }
            _ => {}
        }
        None
    }
}
