//! Change detection for polled system state.

use crate::collaborators::SinkProbe;

/// A change observed between two polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceChange {
    pub previous: String,
    pub current: String,
}

/// Something that can be polled for changes.
pub trait ChangeSource {
    /// Read once; report a change relative to the previous successful read.
    fn poll(&mut self) -> Option<DeviceChange>;
}

/// Watches the default audio sink.
///
/// The first successful read only records a baseline. Failed reads are
/// logged and leave the baseline untouched.
pub struct SinkWatcher<P> {
    probe: P,
    last: Option<String>,
}

impl<P: SinkProbe> SinkWatcher<P> {
    pub fn new(probe: P) -> Self {
        Self { probe, last: None }
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl<P: SinkProbe> ChangeSource for SinkWatcher<P> {
    fn poll(&mut self) -> Option<DeviceChange> {
        let current = match self.probe.current_sink() {
            Ok(sink) => sink,
            Err(err) => {
                tracing::warn!("audio sink poll failed: {err}");
                return None;
            }
        };
        match self.last.replace(current.clone()) {
            Some(previous) if previous != current => {
                tracing::info!(%previous, %current, "default audio sink changed");
                Some(DeviceChange { previous, current })
            }
            _ => None,
        }
    }
}
