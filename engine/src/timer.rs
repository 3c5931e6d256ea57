//! Cancellable one-shot and repeating timers on a virtual clock.
//!
//! Components never store callbacks. They ask for a [`TimerKind`] to be
//! delivered after a delay and keep the returned [`TimerId`] as their
//! cancellation token. The shell drains due timers on the control thread and
//! dispatches on the kind.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use halo_types::{TimerId, TimerKind};

/// Shortest period a repeating timer may have; guards against a zero
/// interval firing forever within one `advance`.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Every(Duration),
}

/// Timer service as seen by panels.
pub trait Timers {
    /// Current virtual time.
    fn now(&self) -> Duration;

    fn schedule(&mut self, kind: TimerKind, delay: Duration, repeat: Repeat) -> TimerId;

    /// Cancel a timer. Cancelling a fired or already-cancelled timer is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    /// Virtual time the timer was due at.
    pub at: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    kind: TimerKind,
    deadline: Duration,
    period: Option<Duration>,
}

/// Deadline-ordered timer queue.
///
/// Time only moves forward through [`Scheduler::pop_due`] and
/// [`Scheduler::settle`]. While draining, the clock is set to each timer's
/// deadline before it is returned, so timers scheduled from a handler are
/// relative to the moment that handler logically ran.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    entries: HashMap<TimerId, Entry>,
    queue: BTreeSet<(Duration, TimerId)>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// Repeating timers are re-armed one period after their deadline, so a
    /// long `until` jump delivers every elapsed interval.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired> {
        loop {
            let &(deadline, id) = self.queue.first()?;
            if deadline > until {
                return None;
            }
            self.queue.remove(&(deadline, id));
            self.now = self.now.max(deadline);

            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            let kind = entry.kind;
            match entry.period {
                Some(period) => {
                    entry.deadline = deadline + period;
                    self.queue.insert((entry.deadline, id));
                }
                None => {
                    self.entries.remove(&id);
                }
            }
            return Some(Fired {
                id,
                kind,
                at: deadline,
            });
        }
    }

    /// Move the clock to `until` once nothing else is due.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.first().map(|&(deadline, _)| deadline)
    }

    #[must_use]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of live timers of a kind.
    #[must_use]
    pub fn active_count(&self, kind: TimerKind) -> usize {
        self.entries.values().filter(|e| e.kind == kind).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Timers for Scheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, kind: TimerKind, delay: Duration, repeat: Repeat) -> TimerId {
        self.next_id += 1;
        let id = TimerId::new(self.next_id);
        let period = match repeat {
            Repeat::Once => None,
            Repeat::Every(period) => Some(period.max(MIN_PERIOD)),
        };
        let deadline = self.now + delay;
        self.entries.insert(
            id,
            Entry {
                kind,
                deadline,
                period,
            },
        );
        self.queue.insert((deadline, id));
        tracing::trace!(%id, ?kind, ?delay, "timer scheduled");
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(entry) = self.entries.remove(&id) {
            self.queue.remove(&(entry.deadline, id));
            tracing::trace!(%id, kind = ?entry.kind, "timer cancelled");
        }
    }
}
