//! Clipboard history picker.

use halo_config::ShellConfig;
use halo_types::PanelId;
use halo_types::ui::{LogicalKey, Orientation, PanelState, PropertyId};

use crate::anim::Role;
use crate::collaborators::{CandidateRef, CandidateSource};
use crate::command::ShellCommand;
use crate::lifecycle::{PanelCx, PanelLifecycle};
use crate::list_panel::{ListEvent, ListPanel};
use crate::refresher::{ListRefresher, plain_item};
use crate::timer::Fired;

use super::Panel;

pub struct ClipboardPanel {
    list: ListPanel,
    source: Box<dyn CandidateSource>,
    entries: Vec<CandidateRef>,
}

impl ClipboardPanel {
    #[must_use]
    pub fn new(config: &ShellConfig, source: Box<dyn CandidateSource>) -> Self {
        let driver = super::driver(PanelId::Clipboard, &config.animation)
            .with(PropertyId::Opacity, Role::Fade, 0.0)
            .with(PropertyId::SearchOpacity, Role::Fade, 0.0)
            .with(
                PropertyId::ContentHeight,
                Role::Collapse { expanded: 0.0 },
                0.0,
            );
        let list = ListPanel::new(
            PanelLifecycle::new(driver, config.animation.rest_offset),
            ListRefresher::new(PanelId::Clipboard, &config.list, "No clipboard history"),
            Orientation::Vertical,
            config.list.clear_filter_delay(),
        );
        Self {
            list,
            source,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn list(&self) -> &ListPanel {
        &self.list
    }

    fn reload(&mut self) {
        match self.source.load() {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "clipboard history loaded");
                self.entries = entries;
            }
            Err(err) => tracing::warn!("clipboard history unavailable: {err}"),
        }
    }

    fn refilter(&mut self, cx: &mut PanelCx<'_>) {
        let text = self.list.filter().to_string();
        self.list.refresh(&self.entries, &text, cx);
    }
}

impl Panel for ClipboardPanel {
    fn id(&self) -> PanelId {
        PanelId::Clipboard
    }

    fn state(&self) -> PanelState {
        self.list.state()
    }

    /// History is re-read on every show.
    fn show(&mut self, cx: &mut PanelCx<'_>) {
        if !self.list.state().is_shown() {
            self.reload();
        }
        let text = self.list.filter().to_string();
        self.list.show(&self.entries, &text, cx, &plain_item);
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
