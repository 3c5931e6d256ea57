//! The shell: every panel, the status bar, and the timer queue they share.
//!
//! All state lives on the control thread. Front-ends feed it keys, commands
//! and the current time; it pushes everything visible into its [`RenderSink`].

use std::rc::Rc;
use std::time::Duration;

use halo_config::ShellConfig;
use halo_types::ui::{LogicalKey, PanelState};
use halo_types::{PanelId, TimerId, TimerKind};

use crate::bar::StatusBar;
use crate::collaborators::{
    AudioControl, CandidateRef, CandidateSource, LevelControl, Notifier, PowerProfileControl,
    PreviewDecoder, StatusProbe, UrlOpener, WallClock,
};
use crate::command::ShellCommand;
use crate::lifecycle::PanelCx;
use crate::panels::{
    ClipboardPanel, LauncherPanel, OsdPanel, Panel, PowerPanel, SearchPanel, WallpaperPanel,
};
use crate::poller::ChangeSource;
use crate::sink::RenderSink;
use crate::timer::{Fired, Repeat, Scheduler, Timers};
use crate::worker::PreviewWorker;

/// Everything the shell talks to outside itself.
pub struct Collaborators {
    pub apps: Box<dyn CandidateSource>,
    pub commands: Box<dyn CandidateSource>,
    pub clipboard: Box<dyn CandidateSource>,
    pub wallpapers: Box<dyn CandidateSource>,
    pub audio: Box<dyn AudioControl>,
    pub backlight: Box<dyn LevelControl>,
    pub device_changes: Box<dyn ChangeSource>,
    pub status: Box<dyn StatusProbe>,
    pub power: Box<dyn PowerProfileControl>,
    pub notifier: Rc<dyn Notifier>,
    pub browser: Box<dyn UrlOpener>,
    pub clock: Box<dyn WallClock>,
    /// Thumbnail decoder; `None` disables wallpaper previews.
    pub previews: Option<Box<dyn PreviewDecoder>>,
}

pub struct Shell<S> {
    timers: Scheduler,
    sink: S,
    launcher: LauncherPanel,
    clipboard: ClipboardPanel,
    wallpaper: WallpaperPanel,
    osd: OsdPanel,
    power: PowerPanel,
    search: SearchPanel,
    bar: StatusBar,
    device_changes: Box<dyn ChangeSource>,
    device_poll: Option<TimerId>,
    previews: Option<PreviewWorker>,
    focused: Option<PanelId>,
}

fn load(source: &mut dyn CandidateSource, what: &str) -> Vec<CandidateRef> {
    source.load().unwrap_or_else(|err| {
        tracing::warn!("could not load {what}: {err}");
        Vec::new()
    })
}

impl<S: RenderSink> Shell<S> {
    pub fn new(config: &ShellConfig, collaborators: Collaborators, sink: S) -> Self {
        let Collaborators {
            mut apps,
            mut commands,
            clipboard,
            wallpapers,
            audio,
            backlight,
            mut device_changes,
            status,
            power,
            notifier,
            browser,
            clock,
            previews,
        } = collaborators;

        let launcher = LauncherPanel::new(
            config,
            load(apps.as_mut(), "applications"),
            load(commands.as_mut(), "commands"),
        );
        let wallpaper = WallpaperPanel::new(config, wallpapers);

        // First read is the baseline for change detection.
        let _ = device_changes.poll();

        let previews = previews.and_then(|decoder| match PreviewWorker::spawn(decoder) {
            Ok(worker) => Some(worker),
            Err(err) => {
                tracing::warn!("preview worker failed to start: {err}");
                None
            }
        });
        if let Some(worker) = &previews {
            for path in wallpaper.preview_paths() {
                worker.request(path.to_path_buf());
            }
        }

        let mut shell = Self {
            timers: Scheduler::new(),
            sink,
            launcher,
            clipboard: ClipboardPanel::new(config, clipboard),
            wallpaper,
            osd: OsdPanel::new(config, audio, backlight),
            power: PowerPanel::new(config, power),
            search: SearchPanel::new(config, browser),
            bar: StatusBar::new(&config.bar, status, clock, notifier),
            device_changes,
            device_poll: None,
            previews,
            focused: None,
        };
        shell.bar.start(&mut shell.timers, &mut shell.sink);
        let poll = config.osd.sink_poll();
        shell.device_poll = Some(
            shell
                .timers
                .schedule(TimerKind::DevicePoll, poll, Repeat::Every(poll)),
        );
        tracing::info!("shell ready");
        shell
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub fn timers(&self) -> &Scheduler {
        &self.timers
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Panel currently holding keyboard focus.
    #[must_use]
    pub fn focused(&self) -> Option<PanelId> {
        self.focused
    }

    #[must_use]
    pub fn panel(&self, panel: PanelId) -> &dyn Panel {
        match panel {
            PanelId::Launcher => &self.launcher,
            PanelId::Clipboard => &self.clipboard,
            PanelId::Wallpaper => &self.wallpaper,
            PanelId::Osd => &self.osd,
            PanelId::Power => &self.power,
            PanelId::Search => &self.search,
        }
    }

    #[must_use]
    pub fn state(&self, panel: PanelId) -> PanelState {
        self.panel(panel).state()
    }

    #[must_use]
    pub fn launcher(&self) -> &LauncherPanel {
        &self.launcher
    }

    #[must_use]
    pub fn clipboard(&self) -> &ClipboardPanel {
        &self.clipboard
    }

    #[must_use]
    pub fn wallpaper(&self) -> &WallpaperPanel {
        &self.wallpaper
    }

    #[must_use]
    pub fn osd(&self) -> &OsdPanel {
        &self.osd
    }

    #[must_use]
    pub fn power(&self) -> &PowerPanel {
        &self.power
    }

    #[must_use]
    pub fn search(&self) -> &SearchPanel {
        &self.search
    }

    #[must_use]
    pub fn bar(&self) -> &StatusBar {
        &self.bar
    }

    fn with_panel<R>(
        &mut self,
        panel: PanelId,
        f: impl FnOnce(&mut dyn Panel, &mut PanelCx<'_>) -> R,
    ) -> R {
        let mut cx = PanelCx {
            timers: &mut self.timers,
            sink: &mut self.sink,
        };
        let target: &mut dyn Panel = match panel {
            PanelId::Launcher => &mut self.launcher,
            PanelId::Clipboard => &mut self.clipboard,
            PanelId::Wallpaper => &mut self.wallpaper,
            PanelId::Osd => &mut self.osd,
            PanelId::Power => &mut self.power,
            PanelId::Search => &mut self.search,
        };
        f(target, &mut cx)
    }

    pub fn execute(&mut self, command: ShellCommand) {
        tracing::debug!(%command, "execute");
        match command {
            ShellCommand::Toggle(panel) => {
                if self.state(panel).is_shown() {
                    self.hide(panel);
                } else {
                    self.show(panel);
                }
            }
            ShellCommand::Show(panel) => self.show(panel),
            ShellCommand::Hide(panel) => self.hide(panel),
            ShellCommand::Osd(action) => {
                let mut cx = PanelCx {
                    timers: &mut self.timers,
                    sink: &mut self.sink,
                };
                self.osd.apply(action, &mut cx);
            }
        }
    }

    /// Show a panel, moving keyboard focus to it if it takes focus.
    pub fn show(&mut self, panel: PanelId) {
        if panel.takes_focus() {
            if let Some(previous) = self.focused.filter(|p| *p != panel) {
                tracing::debug!(from = %previous, to = %panel, "focus moved");
                self.with_panel(previous, |p, cx| p.focus_lost(cx));
            }
            self.focused = Some(panel);
        }
        self.with_panel(panel, |p, cx| p.show(cx));
    }

    pub fn hide(&mut self, panel: PanelId) {
        self.with_panel(panel, |p, cx| p.hide(cx));
        self.release_focus();
    }

    /// Deliver a key to the focused panel. Keys with no focused panel are
    /// dropped.
    pub fn handle_key(&mut self, key: LogicalKey) {
        let Some(panel) = self.focused else {
            return;
        };
        let command = self.with_panel(panel, |p, cx| p.handle_key(key, cx));
        self.release_focus();
        if let Some(command) = command {
            self.execute(command);
        }
    }

    /// The shell's surface lost keyboard focus.
    pub fn focus_lost(&mut self) {
        if let Some(panel) = self.focused.take() {
            self.with_panel(panel, |p, cx| p.focus_lost(cx));
        }
    }

    fn release_focus(&mut self) {
        if let Some(panel) = self.focused
            && !self.state(panel).is_shown()
        {
            self.focused = None;
        }
    }

    /// Fire every timer due by `now`, in deadline order.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.dispatch(fired);
        }
        self.timers.settle(now);
        self.release_focus();
    }

    fn dispatch(&mut self, fired: Fired) {
        match fired.kind {
            TimerKind::DevicePoll => {
                if Some(fired.id) == self.device_poll && self.device_changes.poll().is_some() {
                    let mut cx = PanelCx {
                        timers: &mut self.timers,
                        sink: &mut self.sink,
                    };
                    self.osd.on_device_changed(&mut cx);
                }
            }
            TimerKind::ClockTick | TimerKind::StatusPoll => {
                self.bar.on_timer(fired, &mut self.sink);
            }
            TimerKind::Animation(panel)
            | TimerKind::Rebuild(panel)
            | TimerKind::AutoHide(panel)
            | TimerKind::ClearFilter(panel) => {
                if let Some(command) = self.with_panel(panel, |p, cx| p.on_timer(fired, cx)) {
                    self.execute(command);
                }
            }
        }
    }

    /// Hand finished thumbnails to the wallpaper panel. Returns how many
    /// arrived.
    pub fn drain_previews(&mut self) -> usize {
        let Some(worker) = self.previews.as_mut() else {
            return 0;
        };
        let mut count = 0;
        while let Some(result) = worker.try_recv() {
            match result.preview {
                Ok(preview) => {
                    let mut cx = PanelCx {
                        timers: &mut self.timers,
                        sink: &mut self.sink,
                    };
                    self.wallpaper.on_preview(result.path, preview, &mut cx);
                    count += 1;
                }
                Err(err) => {
                    tracing::warn!(path = %result.path.display(), "preview failed: {err}");
                }
            }
        }
        count
    }
}
