//! Power-profile popup.

use halo_config::ShellConfig;
use halo_types::ui::{Edge, FocusCursor, LogicalKey, Orientation, PanelState, PropertyId};
use halo_types::{ItemHandle, PanelId, PowerProfile, TimerKind};

use crate::anim::Role;
use crate::autohide::AutoHide;
use crate::collaborators::PowerProfileControl;
use crate::command::ShellCommand;
use crate::focus::{FocusNavigator, NavAction};
use crate::lifecycle::{PanelCx, PanelLifecycle};
use crate::sink::RenderedItem;
use crate::timer::Fired;

use super::Panel;

pub struct PowerPanel {
    lifecycle: PanelLifecycle,
    nav: FocusNavigator,
    auto_hide: AutoHide,
    control: Box<dyn PowerProfileControl>,
    active: Option<PowerProfile>,
    items: Vec<ItemHandle>,
}

impl PowerPanel {
    #[must_use]
    pub fn new(config: &ShellConfig, control: Box<dyn PowerProfileControl>) -> Self {
        let driver = super::driver(PanelId::Power, &config.animation)
            .with(PropertyId::Opacity, Role::Fade, 0.0)
            .with(PropertyId::Offset, Role::Slide(Edge::Top), 0.0);
        Self {
            lifecycle: PanelLifecycle::new(driver, config.animation.rest_offset),
            nav: FocusNavigator::new(Orientation::Horizontal),
            auto_hide: AutoHide::new(PanelId::Power, config.power.hide_after()),
            control,
            active: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<PowerProfile> {
        self.active
    }

    #[must_use]
    pub fn cursor(&self) -> FocusCursor {
        self.nav.cursor()
    }

    fn read_active(&mut self, cx: &mut PanelCx<'_>) {
        match self.control.active() {
            Ok(profile) => self.active = Some(profile),
            Err(err) => tracing::warn!("power profile read failed: {err}"),
        }
        cx.sink.set_active_profile(self.active);
    }

    fn select(&mut self, profile: PowerProfile, cx: &mut PanelCx<'_>) {
        match self.control.set(profile) {
            Ok(()) => tracing::info!(profile = profile.as_str(), "power profile set"),
            Err(err) => tracing::warn!(profile = profile.as_str(), "power profile change failed: {err}"),
        }
        self.read_active(cx);
    }
}

impl Panel for PowerPanel {
    fn id(&self) -> PanelId {
        PanelId::Power
    }

    fn state(&self) -> PanelState {
        self.lifecycle.state()
    }

    fn show(&mut self, cx: &mut PanelCx<'_>) {
        if self.items.is_empty() {
            self.items = PowerProfile::ALL
                .iter()
                .map(|profile| cx.sink.add_item(PanelId::Power, RenderedItem::new(profile.label())))
                .collect();
        }
        if self.lifecycle.state() == PanelState::Hidden {
            self.nav.reset();
        }
        self.read_active(cx);
        self.lifecycle.show(cx);
        self.auto_hide.reschedule(cx.timers);
    }

    fn hide(&mut self, cx: &mut PanelCx<'_>) {
        self.auto_hide.cancel(cx.timers);
        self.lifecycle.hide(cx);
    }

    fn handle_key(&mut self, key: LogicalKey, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        if key == LogicalKey::Escape {
            self.hide(cx);
            return None;
        }
        self.auto_hide.reschedule(cx.timers);
        match self.nav.handle(key, self.items.len()) {
            NavAction::Focus(index) => {
                if let Some(&handle) = self.items.get(index) {
                    cx.sink.focus_item(PanelId::Power, handle);
                }
            }
            NavAction::Activate(index) => {
                if let Some(&profile) = PowerProfile::ALL.get(index) {
                    self.select(profile, cx);
                }
            }
            NavAction::ReturnToInput | NavAction::PassThrough | NavAction::Consumed => {}
        }
        None
    }

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
