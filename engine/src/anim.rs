//! Frame-driven animation of a panel's named properties.
//!
//! One driver per panel. It owns every [`AnimatableProperty`] the panel
//! animates and a single repeating tick timer that is alive only while some
//! property is still moving.

use std::time::Duration;

use halo_types::ui::{AnimatableProperty, Edge, PanelSize, PropertyId};
use halo_types::{PanelId, TimerId, TimerKind};

use crate::sink::RenderSink;
use crate::timer::{Repeat, Timers};

/// How a property behaves when the panel shows or hides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    /// 0 when hidden, 1 when shown.
    Fade,
    /// Slides in from an edge: half the panel's extent off-screen when
    /// hidden, the configured rest offset when shown.
    Slide(Edge),
    /// Collapses to 0 when hidden, grows back to the last requested value.
    Collapse { expanded: f32 },
    /// Content driven; showing and hiding leave it alone.
    Free,
}

/// Result of one animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Running,
    /// Every property reached its target; the tick timer was cancelled.
    Settled,
}

#[derive(Debug, Clone)]
struct Track {
    id: PropertyId,
    role: Role,
    prop: AnimatableProperty,
}

#[derive(Debug, Clone)]
pub struct AnimationDriver {
    panel: PanelId,
    tick: Duration,
    easing: f32,
    tracks: Vec<Track>,
    running: Option<TimerId>,
}

impl AnimationDriver {
    #[must_use]
    pub fn new(panel: PanelId, tick: Duration, easing: f32) -> Self {
        Self {
            panel,
            tick,
            easing,
            tracks: Vec::new(),
            running: None,
        }
    }

    /// Add a property resting at `initial`.
    #[must_use]
    pub fn with(mut self, id: PropertyId, role: Role, initial: f32) -> Self {
        self.tracks.push(Track {
            id,
            role,
            prop: AnimatableProperty::for_property(id, initial, self.easing),
        });
        self
    }

    #[must_use]
    pub fn panel(&self) -> PanelId {
        self.panel
    }

    #[must_use]
    pub fn property(&self, id: PropertyId) -> Option<&AnimatableProperty> {
        self.tracks.iter().find(|t| t.id == id).map(|t| &t.prop)
    }

    #[must_use]
    pub fn value(&self, id: PropertyId) -> Option<f32> {
        self.property(id).map(AnimatableProperty::current)
    }

    #[must_use]
    pub fn target(&self, id: PropertyId) -> Option<f32> {
        self.property(id).map(AnimatableProperty::target)
    }

    #[must_use]
    pub fn role(&self, id: PropertyId) -> Option<Role> {
        self.tracks.iter().find(|t| t.id == id).map(|t| t.role)
    }

    #[must_use]
    pub fn has(&self, id: PropertyId) -> bool {
        self.property(id).is_some()
    }

    fn track_mut(&mut self, id: PropertyId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    /// Retarget a property. Unknown ids are ignored.
    pub fn set_target(&mut self, id: PropertyId, target: f32) {
        if let Some(track) = self.track_mut(id) {
            track.prop.set_target(target);
        }
    }

    /// Place a property at `value` and make that its target too.
    pub fn rest_at(&mut self, id: PropertyId, value: f32) {
        if let Some(track) = self.track_mut(id) {
            track.prop.jump_to(value);
            track.prop.set_target(value);
        }
    }

    /// Remember the shown value of a collapsing property.
    pub fn set_expanded(&mut self, id: PropertyId, value: f32) {
        if let Some(track) = self.track_mut(id)
            && let Role::Collapse { expanded } = &mut track.role
        {
            *expanded = value;
        }
    }

    /// Jump every role-driven property to its hidden value and aim it at
    /// its shown value.
    pub fn begin_show(&mut self, size: PanelSize, rest_offset: f32) {
        for track in &mut self.tracks {
            let (from, to) = match track.role {
                Role::Fade => (0.0, 1.0),
                Role::Slide(edge) => (-(size.along(edge) / 2.0), rest_offset),
                Role::Collapse { expanded } => (0.0, expanded),
                Role::Free => continue,
            };
            track.prop.jump_to(from);
            track.prop.set_target(to);
        }
    }

    /// Aim role-driven properties at their shown values from wherever they are.
    pub fn target_shown(&mut self, rest_offset: f32) {
        for track in &mut self.tracks {
            let to = match track.role {
                Role::Fade => 1.0,
                Role::Slide(_) => rest_offset,
                Role::Collapse { expanded } => expanded,
                Role::Free => continue,
            };
            track.prop.set_target(to);
        }
    }

    /// Aim role-driven properties at their hidden values.
    pub fn target_hidden(&mut self, size: PanelSize) {
        for track in &mut self.tracks {
            let to = match track.role {
                Role::Fade | Role::Collapse { .. } => 0.0,
                Role::Slide(edge) => -(size.along(edge) / 2.0),
                Role::Free => continue,
            };
            track.prop.set_target(to);
        }
    }

    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.tracks.iter().all(|t| t.prop.is_converged())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Whether `id` is this driver's live tick timer.
    #[must_use]
    pub fn owns(&self, id: TimerId) -> bool {
        self.running == Some(id)
    }

    /// Start ticking unless already ticking or nothing has to move.
    ///
    /// Returns whether a tick timer is live afterwards.
    pub fn ensure_running(&mut self, timers: &mut dyn Timers) -> bool {
        if self.running.is_some() {
            return true;
        }
        if self.is_converged() {
            return false;
        }
        let id = timers.schedule(
            TimerKind::Animation(self.panel),
            self.tick,
            Repeat::Every(self.tick),
        );
        tracing::trace!(panel = %self.panel, %id, "animation started");
        self.running = Some(id);
        true
    }

    /// Advance every property one step. Once all have converged they are
    /// snapped onto their targets and the tick timer is cancelled.
    pub fn step(&mut self, timers: &mut dyn Timers) -> Step {
        for track in &mut self.tracks {
            track.prop.step();
        }
        if !self.is_converged() {
            return Step::Running;
        }
        self.settle(timers);
        Step::Settled
    }

    /// Snap everything onto its target and stop ticking.
    pub fn settle(&mut self, timers: &mut dyn Timers) {
        for track in &mut self.tracks {
            track.prop.snap();
        }
        if let Some(id) = self.running.take() {
            timers.cancel(id);
            tracing::trace!(panel = %self.panel, %id, "animation settled");
        }
    }

    /// Push every current value to the sink.
    pub fn apply(&self, sink: &mut dyn RenderSink) {
        for track in &self.tracks {
            sink.apply(self.panel, track.id, track.prop.current());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationDriver, Role, Step};
    use crate::timer::{Scheduler, Timers};
    use halo_types::ui::{Edge, PanelSize, PropertyId};
    use halo_types::{PanelId, TimerKind};
    use std::time::Duration;

    const TICK: Duration = Duration::from_millis(8);

    fn driver() -> AnimationDriver {
        AnimationDriver::new(PanelId::Launcher, TICK, 0.15)
            .with(PropertyId::Opacity, Role::Fade, 0.0)
            .with(PropertyId::Offset, Role::Slide(Edge::Top), -200.0)
            .with(
                PropertyId::ContentHeight,
                Role::Collapse { expanded: 0.0 },
                0.0,
            )
    }

    fn run(driver: &mut AnimationDriver, timers: &mut Scheduler) -> usize {
        let mut ticks = 0;
        while let Some(fired) = timers.pop_due(timers.now() + Duration::from_secs(10)) {
            assert!(driver.owns(fired.id));
            ticks += 1;
            if driver.step(timers) == Step::Settled {
                break;
            }
        }
        ticks
    }

    #[test]
    fn converged_driver_does_not_start() {
        let mut timers = Scheduler::new();
        let mut driver = driver();
        assert!(!driver.ensure_running(&mut timers));
        assert!(timers.is_empty());
    }

    #[test]
    fn ensure_running_is_single_flight() {
        let mut timers = Scheduler::new();
        let mut driver = driver();
        driver.set_target(PropertyId::Opacity, 1.0);
        assert!(driver.ensure_running(&mut timers));
        assert!(driver.ensure_running(&mut timers));
        assert_eq!(
            timers.active_count(TimerKind::Animation(PanelId::Launcher)),
            1
        );
    }

    #[test]
    fn show_targets_follow_roles() {
        let mut driver = driver();
        driver.set_expanded(PropertyId::ContentHeight, 132.0);
        driver.begin_show(PanelSize::new(600.0, 300.0), -40.0);

        assert_eq!(driver.value(PropertyId::Offset), Some(-150.0));
        assert_eq!(driver.target(PropertyId::Offset), Some(-40.0));
        assert_eq!(driver.value(PropertyId::Opacity), Some(0.0));
        assert_eq!(driver.target(PropertyId::Opacity), Some(1.0));
        assert_eq!(driver.target(PropertyId::ContentHeight), Some(132.0));

        driver.target_hidden(PanelSize::new(600.0, 300.0));
        assert_eq!(driver.target(PropertyId::Offset), Some(-150.0));
        assert_eq!(driver.target(PropertyId::ContentHeight), Some(0.0));
    }

    #[test]
    fn settles_exactly_and_cancels_tick() {
        let mut timers = Scheduler::new();
        let mut driver = driver();
        driver.begin_show(PanelSize::new(600.0, 300.0), -40.0);
        assert!(driver.ensure_running(&mut timers));

        let ticks = run(&mut driver, &mut timers);
        assert!(ticks > 1);
        assert!(!driver.is_running());
        assert!(timers.is_empty());
        assert_eq!(driver.value(PropertyId::Opacity), Some(1.0));
        assert_eq!(driver.value(PropertyId::Offset), Some(-40.0));
    }

    #[test]
    fn retarget_mid_flight_keeps_one_timer() {
        let mut timers = Scheduler::new();
        let mut driver = driver();
        driver.set_target(PropertyId::Opacity, 1.0);
        driver.ensure_running(&mut timers);
        timers.pop_due(TICK);
        driver.step(&mut timers);

        driver.set_target(PropertyId::Opacity, 0.0);
        driver.ensure_running(&mut timers);
        assert_eq!(timers.len(), 1);
        run(&mut driver, &mut timers);
        assert_eq!(driver.value(PropertyId::Opacity), Some(0.0));
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let mut driver = driver();
        driver.set_target(PropertyId::Volume, 1.0);
        assert!(driver.is_converged());
        assert!(!driver.has(PropertyId::Volume));
    }

    #[test]
    fn rest_at_snaps_without_motion() {
        let mut driver = driver();
        driver.rest_at(PropertyId::ContentHeight, 88.0);
        assert!(driver.is_converged());
        assert_eq!(driver.value(PropertyId::ContentHeight), Some(88.0));
    }
}
