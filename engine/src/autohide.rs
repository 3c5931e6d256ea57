//! Rescheduling auto-hide timer.

use std::time::Duration;

use halo_types::{PanelId, TimerId, TimerKind};

use crate::timer::{Fired, Repeat, Timers};

/// Hides a panel a fixed delay after its last activity. Every reschedule
/// cancels the previous timer, so only the latest one can fire.
#[derive(Debug, Clone)]
pub struct AutoHide {
    panel: PanelId,
    delay: Duration,
    pending: Option<TimerId>,
}

impl AutoHide {
    #[must_use]
    pub fn new(panel: PanelId, delay: Duration) -> Self {
        Self {
            panel,
            delay,
            pending: None,
        }
    }

    pub fn reschedule(&mut self, timers: &mut dyn Timers) {
        self.cancel(timers);
        self.pending = Some(timers.schedule(
            TimerKind::AutoHide(self.panel),
            self.delay,
            Repeat::Once,
        ));
    }

    pub fn cancel(&mut self, timers: &mut dyn Timers) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }

    /// Whether `fired` is the live timer; consumes it if so.
    pub fn take(&mut self, fired: &Fired) -> bool {
        if self.pending == Some(fired.id) {
            self.pending = None;
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::AutoHide;
    use crate::timer::{Scheduler, Timers};
    use halo_types::PanelId;
    use std::time::Duration;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn only_latest_reschedule_fires() {
        let mut timers = Scheduler::new();
        let mut hide = AutoHide::new(PanelId::Osd, MS * 1000);
        hide.reschedule(&mut timers);
        timers.settle(MS * 600);
        hide.reschedule(&mut timers);

        assert!(timers.pop_due(MS * 1599).is_none());
        let fired = timers.pop_due(MS * 1600).expect("due");
        assert!(hide.take(&fired));
        assert!(!hide.is_pending());
        assert!(!hide.take(&fired));
    }

    #[test]
    fn cancel_clears_pending() {
        let mut timers = Scheduler::new();
        let mut hide = AutoHide::new(PanelId::Power, MS * 2000);
        hide.reschedule(&mut timers);
        hide.cancel(&mut timers);
        assert!(timers.is_empty());
        assert_eq!(timers.now(), std::time::Duration::ZERO);
    }
}
