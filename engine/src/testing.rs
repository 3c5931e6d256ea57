//! Recording render sink and in-memory collaborators.
//!
//! Compiled for unit tests and, with the `test-support` feature, for the
//! workspace integration tests.

use std::cell::{Cell, RefCell, RefMut};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use halo_types::ui::{PanelSize, PropertyId};
use halo_types::{
    BatteryStatus, ItemHandle, PanelId, PowerProfile, ProviderError, StatusSnapshot, WifiStatus,
};

use crate::collaborators::{
    Activation, AudioControl, Candidate, CandidateRef, CandidateSource, LevelControl,
    Notification, Notifier, PowerProfileControl, SinkProbe, StatusProbe, UrlOpener, WallClock,
};
use crate::command::ShellCommand;
use crate::lifecycle::PanelCx;
use crate::panels::Panel;
use crate::poller::SinkWatcher;
use crate::shell::Collaborators;
use crate::sink::{Fade, RenderSink, RenderedItem};
use crate::timer::{Scheduler, Timers};

/// Size `measure` reports for panels without an explicit size.
pub const DEFAULT_PANEL_SIZE: PanelSize = PanelSize {
    width: 600.0,
    height: 400.0,
};

/// A [`RenderSink`] that remembers everything it was told.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sizes: HashMap<PanelId, PanelSize>,
    visible: HashMap<PanelId, bool>,
    visibility: Vec<(PanelId, bool)>,
    values: Vec<(PanelId, PropertyId, f32)>,
    items: HashMap<PanelId, Vec<(ItemHandle, RenderedItem)>>,
    fades: HashMap<ItemHandle, Vec<Fade>>,
    next_item: u64,
    placeholders: HashMap<PanelId, String>,
    focused_item: Option<(PanelId, ItemHandle)>,
    filter_focus: Vec<PanelId>,
    filter_text: HashMap<PanelId, String>,
    status: Option<StatusSnapshot>,
    active_profile: Option<PowerProfile>,
    muted: Option<bool>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_size(&mut self, panel: PanelId, size: PanelSize) {
        self.sizes.insert(panel, size);
    }

    #[must_use]
    pub fn is_surface_visible(&self, panel: PanelId) -> bool {
        self.visible.get(&panel).copied().unwrap_or(false)
    }

    /// Every map/unmap in order.
    #[must_use]
    pub fn visibility_log(&self) -> &[(PanelId, bool)] {
        &self.visibility
    }

    #[must_use]
    pub fn last_value(&self, panel: PanelId, property: PropertyId) -> Option<f32> {
        self.values(panel, property).last().copied()
    }

    /// Every value applied to a property, oldest first.
    #[must_use]
    pub fn values(&self, panel: PanelId, property: PropertyId) -> Vec<f32> {
        self.values
            .iter()
            .filter(|(p, id, _)| *p == panel && *id == property)
            .map(|(_, _, value)| *value)
            .collect()
    }

    #[must_use]
    pub fn items(&self, panel: PanelId) -> Vec<RenderedItem> {
        self.items
            .get(&panel)
            .map(|items| items.iter().map(|(_, item)| item.clone()).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn item_titles(&self, panel: PanelId) -> Vec<String> {
        self.items(panel).into_iter().map(|item| item.title).collect()
    }

    #[must_use]
    pub fn item_handles(&self, panel: PanelId) -> Vec<ItemHandle> {
        self.items
            .get(&panel)
            .map(|items| items.iter().map(|(handle, _)| *handle).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn fade_events(&self, item: ItemHandle) -> Vec<Fade> {
        self.fades.get(&item).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn placeholder(&self, panel: PanelId) -> Option<&str> {
        self.placeholders.get(&panel).map(String::as_str)
    }

    #[must_use]
    pub fn focused_item(&self) -> Option<(PanelId, ItemHandle)> {
        self.focused_item
    }

    /// Panels whose text field was given focus, in order.
    #[must_use]
    pub fn filter_focus_log(&self) -> &[PanelId] {
        &self.filter_focus
    }

    #[must_use]
    pub fn filter_text(&self, panel: PanelId) -> Option<&str> {
        self.filter_text.get(&panel).map(String::as_str)
    }

    #[must_use]
    pub fn status(&self) -> Option<&StatusSnapshot> {
        self.status.as_ref()
    }

    #[must_use]
    pub fn active_profile(&self) -> Option<PowerProfile> {
        self.active_profile
    }

    #[must_use]
    pub fn muted(&self) -> Option<bool> {
        self.muted
    }
}

impl RenderSink for RecordingSink {
    fn set_surface_visible(&mut self, panel: PanelId, visible: bool) {
        self.visible.insert(panel, visible);
        self.visibility.push((panel, visible));
    }

    fn measure(&self, panel: PanelId) -> PanelSize {
        self.sizes.get(&panel).copied().unwrap_or(DEFAULT_PANEL_SIZE)
    }

    fn apply(&mut self, panel: PanelId, property: PropertyId, value: f32) {
        self.values.push((panel, property, value));
    }

    fn add_item(&mut self, panel: PanelId, item: RenderedItem) -> ItemHandle {
        self.next_item += 1;
        let handle = ItemHandle::new(self.next_item);
        self.items.entry(panel).or_default().push((handle, item));
        handle
    }

    fn set_item_fade(&mut self, _panel: PanelId, item: ItemHandle, fade: Fade) {
        self.fades.entry(item).or_default().push(fade);
    }

    fn remove_item(&mut self, panel: PanelId, item: ItemHandle) {
        if let Some(items) = self.items.get_mut(&panel) {
            items.retain(|(handle, _)| *handle != item);
        }
        if self.focused_item == Some((panel, item)) {
            self.focused_item = None;
        }
    }

    fn set_placeholder(&mut self, panel: PanelId, text: Option<&str>) {
        match text {
            Some(text) => {
                self.placeholders.insert(panel, text.to_string());
            }
            None => {
                self.placeholders.remove(&panel);
            }
        }
    }

    fn focus_item(&mut self, panel: PanelId, item: ItemHandle) {
        self.focused_item = Some((panel, item));
    }

    fn focus_filter(&mut self, panel: PanelId) {
        self.focused_item = None;
        self.filter_focus.push(panel);
    }

    fn set_filter_text(&mut self, panel: PanelId, text: &str) {
        self.filter_text.insert(panel, text.to_string());
    }

    fn set_status(&mut self, status: &StatusSnapshot) {
        self.status = Some(status.clone());
    }

    fn set_active_profile(&mut self, profile: Option<PowerProfile>) {
        self.active_profile = profile;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = Some(muted);
    }
}

/// Timers plus a recording sink for driving one panel by hand.
#[derive(Debug, Default)]
pub struct PanelHarness {
    pub timers: Scheduler,
    pub sink: RecordingSink,
}

impl PanelHarness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cx(&mut self) -> PanelCx<'_> {
        PanelCx {
            timers: &mut self.timers,
            sink: &mut self.sink,
        }
    }

    /// Advance virtual time by `by`, routing due timers to `panel`.
    /// Returns the commands the panel asked for.
    pub fn run(&mut self, panel: &mut dyn Panel, by: Duration) -> Vec<ShellCommand> {
        let until = self.timers.now() + by;
        let mut commands = Vec::new();
        while let Some(fired) = self.timers.pop_due(until) {
            let mut cx = PanelCx {
                timers: &mut self.timers,
                sink: &mut self.sink,
            };
            commands.extend(panel.on_timer(fired, &mut cx));
        }
        self.timers.settle(until);
        commands
    }
}

pub type ActivationLog = Rc<RefCell<Vec<String>>>;

/// A candidate with a scripted activation.
#[derive(Debug, Clone)]
pub struct FakeCandidate {
    title: String,
    subtitle: Option<String>,
    preview: Option<PathBuf>,
    outcome: Activation,
    fail: bool,
    log: Option<ActivationLog>,
}

impl FakeCandidate {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            preview: None,
            outcome: Activation::Done,
            fail: false,
            log: None,
        }
    }

    #[must_use]
    pub fn log() -> ActivationLog {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[must_use]
    pub fn logging_to(mut self, log: &ActivationLog) -> Self {
        self.log = Some(Rc::clone(log));
        self
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn with_preview(mut self, path: impl Into<PathBuf>) -> Self {
        self.preview = Some(path.into());
        self
    }

    #[must_use]
    pub fn dispatching(mut self, command: ShellCommand) -> Self {
        self.outcome = Activation::Dispatch(command);
        self
    }

    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Candidate for FakeCandidate {
    fn title(&self) -> &str {
        &self.title
    }

    fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    fn preview_path(&self) -> Option<&Path> {
        self.preview.as_deref()
    }

    fn activate(&self) -> Result<Activation, ProviderError> {
        if let Some(log) = &self.log {
            log.borrow_mut().push(self.title.clone());
        }
        if self.fail {
            return Err(ProviderError::Unavailable(self.title.clone()));
        }
        Ok(self.outcome)
    }
}

/// Plain candidates with the given titles.
#[must_use]
pub fn candidates(titles: &[&str]) -> Vec<CandidateRef> {
    titles
        .iter()
        .map(|title| Rc::new(FakeCandidate::new(*title)) as CandidateRef)
        .collect()
}

/// A candidate source whose contents tests can swap between loads.
pub struct VecSource {
    items: Rc<RefCell<Vec<CandidateRef>>>,
    fail: Rc<Cell<bool>>,
}

impl VecSource {
    #[must_use]
    pub fn new(items: Vec<CandidateRef>) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
            fail: Rc::new(Cell::new(false)),
        }
    }

    #[must_use]
    pub fn handle(&self) -> Rc<RefCell<Vec<CandidateRef>>> {
        Rc::clone(&self.items)
    }

    #[must_use]
    pub fn fail_handle(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.fail)
    }
}

impl CandidateSource for VecSource {
    fn load(&mut self) -> Result<Vec<CandidateRef>, ProviderError> {
        if self.fail.get() {
            return Err(ProviderError::Unavailable("source".into()));
        }
        Ok(self.items.borrow().clone())
    }
}

/// Mutable machine state behind every fake collaborator.
#[derive(Debug, Clone)]
pub struct SystemState {
    pub volume: u8,
    pub muted: bool,
    pub brightness: u8,
    pub sink: String,
    /// Make every read fail.
    pub fail_reads: bool,
    /// `(control, delta)` for every nudge that reached a control.
    pub nudges: Vec<(&'static str, i16)>,
    pub battery: BatteryStatus,
    pub wifi: WifiStatus,
    pub bluetooth: bool,
    pub profile: PowerProfile,
    pub notifications: Vec<Notification>,
    pub opened: Vec<String>,
    pub clock: String,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            volume: 50,
            muted: false,
            brightness: 50,
            sink: "alsa_output.pci-0000_00_1f.3.analog-stereo".to_string(),
            fail_reads: false,
            nudges: Vec::new(),
            battery: BatteryStatus {
                percent: 100,
                plugged: true,
            },
            wifi: WifiStatus::Disconnected,
            bluetooth: false,
            profile: PowerProfile::Balanced,
            notifications: Vec::new(),
            opened: Vec::new(),
            clock: "12:00".to_string(),
        }
    }
}

/// Shared handle to a fake machine; every collaborator it hands out reads
/// and writes the same [`SystemState`].
#[derive(Debug, Clone, Default)]
pub struct FakeSystem {
    state: Rc<RefCell<SystemState>>,
}

impl FakeSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the state. Do not hold across calls into the shell.
    pub fn state(&self) -> RefMut<'_, SystemState> {
        self.state.borrow_mut()
    }

    fn read<T>(&self, f: impl FnOnce(&SystemState) -> T) -> Result<T, ProviderError> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(ProviderError::Unavailable("fake".into()));
        }
        Ok(f(&state))
    }

    #[must_use]
    pub fn audio(&self) -> Box<dyn AudioControl> {
        Box::new(FakeAudio(self.clone()))
    }

    #[must_use]
    pub fn backlight(&self) -> Box<dyn LevelControl> {
        Box::new(FakeBacklight(self.clone()))
    }

    #[must_use]
    pub fn sink_probe(&self) -> FakeSinkProbe {
        FakeSinkProbe(self.clone())
    }

    #[must_use]
    pub fn status_probe(&self) -> Box<dyn StatusProbe> {
        Box::new(FakeStatus(self.clone()))
    }

    #[must_use]
    pub fn power(&self) -> Box<dyn PowerProfileControl> {
        Box::new(FakePower(self.clone()))
    }

    #[must_use]
    pub fn notifier(&self) -> Rc<dyn Notifier> {
        Rc::new(FakeNotifier(self.clone()))
    }

    #[must_use]
    pub fn opener(&self) -> Box<dyn UrlOpener> {
        Box::new(FakeOpener(self.clone()))
    }

    #[must_use]
    pub fn clock(&self) -> Box<dyn WallClock> {
        Box::new(FakeClock(self.clone()))
    }

    /// A full collaborator set backed by this machine. Previews are off.
    #[must_use]
    pub fn collaborators(
        &self,
        apps: Vec<CandidateRef>,
        commands: Vec<CandidateRef>,
        clipboard: Vec<CandidateRef>,
        wallpapers: Vec<CandidateRef>,
    ) -> Collaborators {
        Collaborators {
            apps: Box::new(VecSource::new(apps)),
            commands: Box::new(VecSource::new(commands)),
            clipboard: Box::new(VecSource::new(clipboard)),
            wallpapers: Box::new(VecSource::new(wallpapers)),
            audio: self.audio(),
            backlight: self.backlight(),
            device_changes: Box::new(SinkWatcher::new(self.sink_probe())),
            status: self.status_probe(),
            power: self.power(),
            notifier: self.notifier(),
            browser: self.opener(),
            clock: self.clock(),
            previews: None,
        }
    }
}

fn nudge_level(level: u8, delta: i16) -> u8 {
    u8::try_from((i16::from(level) + delta).clamp(0, 100)).unwrap_or(level)
}

struct FakeAudio(FakeSystem);

impl LevelControl for FakeAudio {
    fn read(&mut self) -> Result<u8, ProviderError> {
        self.0.read(|s| s.volume)
    }

    fn nudge(&mut self, delta: i16) -> Result<(), ProviderError> {
        let mut state = self.0.state();
        state.volume = nudge_level(state.volume, delta);
        state.nudges.push(("volume", delta));
        Ok(())
    }
}

impl AudioControl for FakeAudio {
    fn read_muted(&mut self) -> Result<bool, ProviderError> {
        self.0.read(|s| s.muted)
    }

    fn toggle_mute(&mut self) -> Result<(), ProviderError> {
        let mut state = self.0.state();
        state.muted = !state.muted;
        Ok(())
    }
}

struct FakeBacklight(FakeSystem);

impl LevelControl for FakeBacklight {
    fn read(&mut self) -> Result<u8, ProviderError> {
        self.0.read(|s| s.brightness)
    }

    fn nudge(&mut self, delta: i16) -> Result<(), ProviderError> {
        let mut state = self.0.state();
        state.brightness = nudge_level(state.brightness, delta);
        state.nudges.push(("brightness", delta));
        Ok(())
    }
}

pub struct FakeSinkProbe(FakeSystem);

impl SinkProbe for FakeSinkProbe {
    fn current_sink(&mut self) -> Result<String, ProviderError> {
        self.0.read(|s| s.sink.clone())
    }
}

struct FakeStatus(FakeSystem);

impl StatusProbe for FakeStatus {
    fn battery(&mut self) -> Result<BatteryStatus, ProviderError> {
        self.0.read(|s| s.battery)
    }

    fn wifi(&mut self) -> Result<WifiStatus, ProviderError> {
        self.0.read(|s| s.wifi.clone())
    }

    fn bluetooth(&mut self) -> Result<bool, ProviderError> {
        self.0.read(|s| s.bluetooth)
    }
}

struct FakePower(FakeSystem);

impl PowerProfileControl for FakePower {
    fn active(&mut self) -> Result<PowerProfile, ProviderError> {
        self.0.read(|s| s.profile)
    }

    fn set(&mut self, profile: PowerProfile) -> Result<(), ProviderError> {
        self.0.state().profile = profile;
        Ok(())
    }
}

struct FakeNotifier(FakeSystem);

impl Notifier for FakeNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), ProviderError> {
        self.0.state().notifications.push(notification.clone());
        Ok(())
    }
}

struct FakeOpener(FakeSystem);

impl UrlOpener for FakeOpener {
    fn open(&mut self, url: &str) -> Result<(), ProviderError> {
        self.0.state().opened.push(url.to_string());
        Ok(())
    }
}

struct FakeClock(FakeSystem);

impl WallClock for FakeClock {
    fn format(&self, _format: &str) -> String {
        self.0.state.borrow().clock.clone()
    }
}
