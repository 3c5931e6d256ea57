//! Application launcher with a `>` command mode.

use halo_config::ShellConfig;
use halo_types::PanelId;
use halo_types::ui::{Edge, LogicalKey, Orientation, PanelState, PropertyId};

use crate::anim::Role;
use crate::collaborators::CandidateRef;
use crate::command::ShellCommand;
use crate::lifecycle::{PanelCx, PanelLifecycle};
use crate::list_panel::{ListEvent, ListPanel};
use crate::refresher::{ListRefresher, plain_item};
use crate::timer::Fired;

use super::Panel;

pub struct LauncherPanel {
    list: ListPanel,
    apps: Vec<CandidateRef>,
    commands: Vec<CandidateRef>,
    prefix: String,
}

impl LauncherPanel {
    #[must_use]
    pub fn new(config: &ShellConfig, apps: Vec<CandidateRef>, commands: Vec<CandidateRef>) -> Self {
        let driver = super::driver(PanelId::Launcher, &config.animation)
            .with(PropertyId::Opacity, Role::Fade, 0.0)
            .with(PropertyId::Offset, Role::Slide(Edge::Top), 0.0)
            .with(PropertyId::ContentHeight, Role::Free, 0.0);
        let list = ListPanel::new(
            PanelLifecycle::new(driver, config.animation.rest_offset),
            ListRefresher::new(PanelId::Launcher, &config.list, "No results"),
            Orientation::Vertical,
            config.list.clear_filter_delay(),
        );
        tracing::info!(
            apps = apps.len(),
            commands = commands.len(),
            "launcher ready"
        );
        Self {
            list,
            apps,
            commands,
            prefix: config.launcher.prefix.clone(),
        }
    }

    #[must_use]
    pub fn list(&self) -> &ListPanel {
        &self.list
    }

    /// Set the filter text as if typed.
    pub fn set_filter(&mut self, text: &str, cx: &mut PanelCx<'_>) {
        if self.list.set_filter(text, cx) {
            self.refilter(cx);
        }
    }

    fn refilter(&mut self, cx: &mut PanelCx<'_>) {
        let text = self.list.filter().to_string();
        let (all, query) = select(&self.apps, &self.commands, &self.prefix, &text);
        self.list.refresh(all, query, cx);
    }
}

/// Pick the candidate set for `text`: custom commands when it starts with
/// the prefix (which is then dropped from the query), applications otherwise.
fn select<'a>(
    apps: &'a [CandidateRef],
    commands: &'a [CandidateRef],
    prefix: &str,
    text: &'a str,
) -> (&'a [CandidateRef], &'a str) {
    let trimmed = text.trim_start();
    match trimmed.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() => (commands, rest),
        _ => (apps, text),
    }
}

impl Panel for LauncherPanel {
    fn id(&self) -> PanelId {
        PanelId::Launcher
    }

    fn state(&self) -> PanelState {
        self.list.state()
    }

    fn show(&mut self, cx: &mut PanelCx<'_>) {
        let text = self.list.filter().to_string();
        let (all, query) = select(&self.apps, &self.commands, &self.prefix, &text);
        self.list.show(all, query, cx, &plain_item);
    }

    fn hide(&mut self, cx: &mut PanelCx<'_>) {
        self.list.hide(cx);
    }

    fn handle_key(&mut self, key: LogicalKey, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        match self.list.handle_key(key, cx) {
            ListEvent::FilterChanged => {
                self.refilter(cx);
                None
            }
            ListEvent::Activate(candidate) => self.list.activate(&candidate, cx),
            ListEvent::None => None,
        }
    }

    fn on_timer(&mut self, fired: Fired, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        if self.list.on_timer(fired, cx, &plain_item).is_filter_changed() {
            self.refilter(cx);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::LauncherPanel;
    use crate::collaborators::CandidateRef;
    use crate::command::ShellCommand;
    use crate::panels::Panel;
    use crate::testing::{FakeCandidate, PanelHarness, candidates};
    use halo_config::ShellConfig;
    use halo_types::PanelId;
    use halo_types::ui::{FocusCursor, LogicalKey, PanelState, PropertyId};
    use std::rc::Rc;
    use std::time::Duration;

    const MS: Duration = Duration::from_millis(1);

    fn launcher(apps: Vec<CandidateRef>, commands: Vec<CandidateRef>) -> LauncherPanel {
        LauncherPanel::new(&ShellConfig::default(), apps, commands)
    }

    fn type_text(h: &mut PanelHarness, panel: &mut LauncherPanel, text: &str) {
        for c in text.chars() {
            panel.handle_key(LogicalKey::Char(c), &mut h.cx());
        }
    }

    #[test]
    fn show_opens_with_rows_and_height() {
        let mut h = PanelHarness::new();
        let mut panel = launcher(candidates(&["Firefox", "Files", "Terminal"]), Vec::new());
        panel.show(&mut h.cx());
        assert_eq!(h.sink.item_titles(PanelId::Launcher).len(), 3);
        assert_eq!(
            panel.list().lifecycle().value(PropertyId::ContentHeight),
            Some(132.0)
        );
        h.run(&mut panel, MS * 2000);
        assert_eq!(panel.state(), PanelState::Visible);
    }

    #[test]
    fn typing_rebuilds_once_after_last_key() {
        let mut h = PanelHarness::new();
        let mut panel = launcher(candidates(&["Firefox", "Files", "Terminal", "Fish"]), Vec::new());
        panel.show(&mut h.cx());
        h.run(&mut panel, MS * 500);
        let before = panel.list().refresher().rebuild_count();

        panel.handle_key(LogicalKey::Char('f'), &mut h.cx());
        h.run(&mut panel, MS * 50);
        panel.handle_key(LogicalKey::Char('i'), &mut h.cx());
        h.run(&mut panel, MS * 149);
        assert_eq!(panel.list().refresher().rebuild_count(), before);

        h.run(&mut panel, MS);
        assert_eq!(panel.list().refresher().rebuild_count(), before + 1);
        assert_eq!(h.sink.item_titles(PanelId::Launcher), [
            "Firefox", "Files", "Fish"
        ]);
    }

    #[test]
    fn prefix_switches_to_commands() {
        let mut h = PanelHarness::new();
        let mut panel = launcher(
            candidates(&["Firefox"]),
            candidates(&["Lock Screen", "Logout", "Reboot"]),
        );
        panel.show(&mut h.cx());
        type_text(&mut h, &mut panel, ">loc");
        h.run(&mut panel, MS * 200);
        assert_eq!(h.sink.item_titles(PanelId::Launcher), ["Lock Screen"]);

        panel.set_filter(">", &mut h.cx());
        h.run(&mut panel, MS * 200);
        assert_eq!(h.sink.item_titles(PanelId::Launcher).len(), 3);
    }

    #[test]
    fn enter_activates_hides_and_clears_filter() {
        let mut h = PanelHarness::new();
        let log = FakeCandidate::log();
        let apps: Vec<CandidateRef> = vec![
            Rc::new(FakeCandidate::new("Firefox").logging_to(&log)),
            Rc::new(FakeCandidate::new("Files").logging_to(&log)),
        ];
        let mut panel = launcher(apps, Vec::new());
        panel.show(&mut h.cx());
        h.run(&mut panel, MS * 500);
        type_text(&mut h, &mut panel, "fi");
        h.run(&mut panel, MS * 200);

        panel.handle_key(LogicalKey::Down, &mut h.cx());
        panel.handle_key(LogicalKey::Down, &mut h.cx());
        assert_eq!(panel.list().cursor(), FocusCursor::List { index: 1 });
        panel.handle_key(LogicalKey::Enter, &mut h.cx());
        assert_eq!(*log.borrow(), ["Files"]);
        assert_eq!(panel.state(), PanelState::Hiding);
        assert_eq!(panel.list().cursor(), FocusCursor::List { index: 1 });

        h.run(&mut panel, MS * 600);
        assert_eq!(panel.list().filter(), "");
        assert_eq!(h.sink.filter_text(PanelId::Launcher), Some(""));
        assert_eq!(panel.state(), PanelState::Hidden);
    }

    #[test]
    fn failing_activation_still_hides() {
        let mut h = PanelHarness::new();
        let apps: Vec<CandidateRef> = vec![Rc::new(FakeCandidate::new("Broken").failing())];
        let mut panel = launcher(apps, Vec::new());
        panel.show(&mut h.cx());
        h.run(&mut panel, MS * 500);
        panel.handle_key(LogicalKey::Down, &mut h.cx());
        let dispatched = panel.handle_key(LogicalKey::Enter, &mut h.cx());
        assert_eq!(dispatched, None);
        assert_eq!(panel.state(), PanelState::Hiding);
    }

    #[test]
    fn command_activation_dispatches() {
        let mut h = PanelHarness::new();
        let commands: Vec<CandidateRef> = vec![Rc::new(
            FakeCandidate::new("Clipboard").dispatching(ShellCommand::Toggle(PanelId::Clipboard)),
        )];
        let mut panel = launcher(Vec::new(), commands);
        panel.show(&mut h.cx());
        type_text(&mut h, &mut panel, ">");
        h.run(&mut panel, MS * 200);
        panel.handle_key(LogicalKey::Down, &mut h.cx());
        assert_eq!(
            panel.handle_key(LogicalKey::Enter, &mut h.cx()),
            Some(ShellCommand::Toggle(PanelId::Clipboard))
        );
    }

    #[test]
    fn shrinking_list_resets_cursor() {
        let mut h = PanelHarness::new();
        let mut panel = launcher(
            candidates(&["alpha", "beta", "gamma", "delta", "epsilon"]),
            Vec::new(),
        );
        panel.show(&mut h.cx());
        h.run(&mut panel, MS * 500);
        for _ in 0..5 {
            panel.handle_key(LogicalKey::Down, &mut h.cx());
        }
        assert_eq!(panel.list().cursor(), FocusCursor::List { index: 4 });

        panel.set_filter("ta", &mut h.cx());
        h.run(&mut panel, MS * 200);
        assert_eq!(h.sink.item_titles(PanelId::Launcher), ["beta", "delta"]);
        assert_eq!(panel.list().cursor(), FocusCursor::TextInput);
    }

    #[test]
    fn escape_hides_and_empty_list_swallows_down() {
        let mut h = PanelHarness::new();
        let mut panel = launcher(Vec::new(), Vec::new());
        panel.show(&mut h.cx());
        assert_eq!(h.sink.placeholder(PanelId::Launcher), Some("No results"));
        panel.handle_key(LogicalKey::Down, &mut h.cx());
        assert_eq!(panel.list().cursor(), FocusCursor::TextInput);
        panel.handle_key(LogicalKey::Escape, &mut h.cx());
        assert_eq!(panel.state(), PanelState::Hiding);
    }
}
