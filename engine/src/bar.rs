//! Status bar: clock, battery, Wi-Fi and Bluetooth.

use std::rc::Rc;
use std::time::Duration;

use halo_config::BarConfig;
use halo_types::{StatusSnapshot, TimerId, TimerKind};

use crate::collaborators::{Notification, Notifier, StatusProbe, Urgency, WallClock};
use crate::sink::RenderSink;
use crate::timer::{Fired, Repeat, Timers};

const CLOCK_TICK: Duration = Duration::from_secs(1);

pub struct StatusBar {
    probe: Box<dyn StatusProbe>,
    clock: Box<dyn WallClock>,
    notifier: Rc<dyn Notifier>,
    clock_format: String,
    poll_every: Duration,
    low_battery: u8,
    warned: bool,
    snapshot: StatusSnapshot,
    clock_timer: Option<TimerId>,
    poll_timer: Option<TimerId>,
}

impl StatusBar {
    #[must_use]
    pub fn new(
        config: &BarConfig,
        probe: Box<dyn StatusProbe>,
        clock: Box<dyn WallClock>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            probe,
            clock,
            notifier,
            clock_format: config.clock_format.clone(),
            poll_every: config.status_poll(),
            low_battery: config.low_battery_percent,
            warned: false,
            snapshot: StatusSnapshot::default(),
            clock_timer: None,
            poll_timer: None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    /// Read everything once and start both refresh timers.
    pub fn start(&mut self, timers: &mut dyn Timers, sink: &mut dyn RenderSink) {
        self.snapshot.clock = self.clock.format(&self.clock_format);
        self.poll();
        sink.set_status(&self.snapshot);
        if self.clock_timer.is_none() {
            self.clock_timer = Some(timers.schedule(
                TimerKind::ClockTick,
                CLOCK_TICK,
                Repeat::Every(CLOCK_TICK),
            ));
        }
        if self.poll_timer.is_none() {
            self.poll_timer = Some(timers.schedule(
                TimerKind::StatusPoll,
                self.poll_every,
                Repeat::Every(self.poll_every),
            ));
        }
    }

    pub fn on_timer(&mut self, fired: Fired, sink: &mut dyn RenderSink) {
        if Some(fired.id) == self.clock_timer {
            let clock = self.clock.format(&self.clock_format);
            if clock == self.snapshot.clock {
                return;
            }
            self.snapshot.clock = clock;
        } else if Some(fired.id) == self.poll_timer {
            self.poll();
        } else {
            return;
        }
        sink.set_status(&self.snapshot);
    }

    fn poll(&mut self) {
        match self.probe.battery() {
            Ok(battery) => {
                self.snapshot.battery = battery;
                self.check_battery();
            }
            Err(err) => tracing::warn!("battery read failed: {err}"),
        }
        match self.probe.wifi() {
            Ok(wifi) => self.snapshot.wifi = wifi,
            Err(err) => tracing::warn!("wifi read failed: {err}"),
        }
        match self.probe.bluetooth() {
            Ok(powered) => self.snapshot.bluetooth = powered,
            Err(err) => tracing::warn!("bluetooth read failed: {err}"),
        }
    }

    /// Warn once per discharge below the threshold.
    fn check_battery(&mut self) {
        let battery = self.snapshot.battery;
        if battery.plugged || battery.percent >= self.low_battery {
            self.warned = false;
            return;
        }
        if self.warned {
            return;
        }
        self.warned = true;
        let notification = Notification::new(
            "Low battery",
            format!("Battery at {}%. Plug in your charger.", battery.percent),
        )
        .urgency(Urgency::Critical);
        if let Err(err) = self.notifier.notify(&notification) {
            tracing::warn!("low battery notification failed: {err}");
        }
    }
}
