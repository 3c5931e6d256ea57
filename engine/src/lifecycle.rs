//! Show/hide state machine shared by every panel.
//!
//! ```text
//!   Hidden --show--> Showing --settled--> Visible
//!      ^                |  ^                 |
//!      |              hide show             hide
//!      |                v  |                 |
//!      +--settled--- Hiding <----------------+
//! ```
//!
//! The surface is mapped on entering `Showing` and unmapped only when the
//! hide animation has converged with opacity at zero.

use halo_types::PanelId;
use halo_types::ui::{PanelState, PropertyId};

use crate::anim::{AnimationDriver, Role, Step};
use crate::sink::RenderSink;
use crate::timer::{Fired, Timers};

/// Borrowed services a panel needs for one operation.
pub struct PanelCx<'a> {
    pub timers: &'a mut dyn Timers,
    pub sink: &'a mut dyn RenderSink,
}

/// What an animation tick did to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not this panel's live timer.
    Stale,
    Running,
    /// Show animation finished; the panel is `Visible`.
    Shown,
    /// Hide animation finished; the surface is unmapped.
    Hidden,
    /// Content animation finished without a state change.
    Idle,
}

#[derive(Debug, Clone)]
pub struct PanelLifecycle {
    panel: PanelId,
    state: PanelState,
    driver: AnimationDriver,
    rest_offset: f32,
}

impl PanelLifecycle {
    #[must_use]
    pub fn new(driver: AnimationDriver, rest_offset: f32) -> Self {
        Self {
            panel: driver.panel(),
            state: PanelState::Hidden,
            driver,
            rest_offset,
        }
    }

    #[must_use]
    pub fn panel(&self) -> PanelId {
        self.panel
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    #[must_use]
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    #[must_use]
    pub fn value(&self, id: PropertyId) -> Option<f32> {
        self.driver.value(id)
    }

    pub fn show(&mut self, cx: &mut PanelCx<'_>) {
        match self.state {
            PanelState::Hidden => {
                cx.sink.set_surface_visible(self.panel, true);
                let size = cx.sink.measure(self.panel);
                self.driver.begin_show(size, self.rest_offset);
                self.driver.apply(cx.sink);
                tracing::debug!(panel = %self.panel, "showing");
            }
            PanelState::Hiding => {
                self.driver.target_shown(self.rest_offset);
                tracing::debug!(panel = %self.panel, "hide reversed");
            }
            PanelState::Showing | PanelState::Visible => {
                self.driver.target_shown(self.rest_offset);
            }
        }
        if self.state != PanelState::Visible {
            self.state = PanelState::Showing;
        }
        self.kick(cx);
    }

    /// Start the hide animation. No-op if already hidden or hiding.
    pub fn hide(&mut self, cx: &mut PanelCx<'_>) {
        if !self.state.is_shown() {
            return;
        }
        let size = cx.sink.measure(self.panel);
        self.driver.target_hidden(size);
        self.state = PanelState::Hiding;
        tracing::debug!(panel = %self.panel, "hiding");
        self.kick(cx);
    }

    pub fn toggle(&mut self, cx: &mut PanelCx<'_>) {
        if self.state.is_shown() {
            self.hide(cx);
        } else {
            self.show(cx);
        }
    }

    /// Retarget a content-driven property (list height, progress bar).
    ///
    /// While hidden the value is taken immediately without starting a tick;
    /// a collapsing property only remembers the value until the next show.
    pub fn set_target(&mut self, id: PropertyId, value: f32, cx: &mut PanelCx<'_>) {
        self.driver.set_expanded(id, value);
        let collapsing = matches!(self.driver.role(id), Some(Role::Collapse { .. }));
        match self.state {
            PanelState::Hidden => {
                if !collapsing {
                    self.driver.rest_at(id, value);
                }
            }
            PanelState::Hiding if collapsing => {}
            _ => {
                self.driver.set_target(id, value);
                self.kick(cx);
            }
        }
    }

    /// Seed a property's resting value. Only takes effect while hidden.
    pub fn rest_at(&mut self, id: PropertyId, value: f32) {
        if self.state == PanelState::Hidden {
            self.driver.rest_at(id, value);
        }
    }

    /// Handle an animation timer.
    pub fn on_tick(&mut self, fired: Fired, cx: &mut PanelCx<'_>) -> TickOutcome {
        if !self.driver.owns(fired.id) {
            return TickOutcome::Stale;
        }
        let step = self.driver.step(cx.timers);
        self.driver.apply(cx.sink);
        match step {
            Step::Running => TickOutcome::Running,
            Step::Settled => self.finish(cx),
        }
    }

    fn kick(&mut self, cx: &mut PanelCx<'_>) {
        if !self.driver.ensure_running(cx.timers) {
            // Nothing to animate; land the transition now.
            self.driver.settle(cx.timers);
            self.driver.apply(cx.sink);
            self.finish(cx);
        }
    }

    fn finish(&mut self, cx: &mut PanelCx<'_>) -> TickOutcome {
        match self.state {
            PanelState::Showing => {
                self.state = PanelState::Visible;
                tracing::debug!(panel = %self.panel, "visible");
                TickOutcome::Shown
            }
            PanelState::Hiding => {
                let opacity = self.driver.value(PropertyId::Opacity).unwrap_or(0.0);
                if opacity > 0.0 {
                    return TickOutcome::Idle;
                }
                self.state = PanelState::Hidden;
                cx.sink.set_surface_visible(self.panel, false);
                tracing::debug!(panel = %self.panel, "hidden");
                TickOutcome::Hidden
            }
            PanelState::Visible | PanelState::Hidden => TickOutcome::Idle,
        }
    }
}
