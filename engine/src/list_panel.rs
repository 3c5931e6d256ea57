//! A filterable list panel: text field, debounced list, keyboard focus.
//!
//! Launcher, clipboard and wallpaper panels are thin wrappers that decide
//! which candidates feed the list and how rows are rendered.

use std::time::Duration;

use halo_types::ui::{FocusCursor, LogicalKey, Orientation, PanelState, PropertyId};
use halo_types::{PanelId, TimerId, TimerKind};
use unicode_segmentation::UnicodeSegmentation;

use crate::collaborators::{Activation, Candidate, CandidateRef};
use crate::command::ShellCommand;
use crate::focus::{FocusNavigator, NavAction};
use crate::lifecycle::{PanelCx, PanelLifecycle};
use crate::refresher::{ListRefresher, Rebuilt};
use crate::sink::RenderedItem;
use crate::timer::{Fired, Repeat};

/// What a key or timer asks of the owning panel.
#[derive(Clone)]
pub enum ListEvent {
    None,
    /// The filter text changed; the panel should recompute its visible set.
    FilterChanged,
    Activate(CandidateRef),
}

impl ListEvent {
    #[must_use]
    pub fn is_filter_changed(&self) -> bool {
        matches!(self, ListEvent::FilterChanged)
    }
}

pub struct ListPanel {
    lifecycle: PanelLifecycle,
    refresher: ListRefresher,
    nav: FocusNavigator,
    filter: String,
    clear_delay: Duration,
    clear_pending: Option<TimerId>,
}

impl ListPanel {
    #[must_use]
    pub fn new(
        lifecycle: PanelLifecycle,
        refresher: ListRefresher,
        orientation: Orientation,
        clear_delay: Duration,
    ) -> Self {
        Self {
            lifecycle,
            refresher,
            nav: FocusNavigator::new(orientation),
            filter: String::new(),
            clear_delay,
            clear_pending: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> PanelId {
        self.lifecycle.panel()
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.lifecycle.state()
    }

    #[must_use]
    pub fn lifecycle(&self) -> &PanelLifecycle {
        &self.lifecycle
    }

    #[must_use]
    pub fn refresher(&self) -> &ListRefresher {
        &self.refresher
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub fn cursor(&self) -> FocusCursor {
        self.nav.cursor()
    }

    /// Show the panel with a fresh visible set.
    ///
    /// Coming from `Hidden` the rows are built right away so the panel opens
    /// with its content; otherwise the usual debounced rebuild applies.
    pub fn show(
        &mut self,
        all: &[CandidateRef],
        query: &str,
        cx: &mut PanelCx<'_>,
        render: &dyn Fn(&dyn Candidate) -> RenderedItem,
    ) {
        self.refresher.filter_changed(all, query, cx);
        if self.state() == PanelState::Hidden {
            let rebuilt = self.refresher.rebuild(cx, render);
            self.rebuilt(rebuilt, cx);
            cx.sink.set_filter_text(self.id(), &self.filter);
        }
        self.lifecycle.show(cx);
    }

    pub fn hide(&mut self, cx: &mut PanelCx<'_>) {
        self.lifecycle.hide(cx);
    }

    /// Recompute the visible set and schedule a rebuild.
    pub fn refresh(&mut self, all: &[CandidateRef], query: &str, cx: &mut PanelCx<'_>) {
        self.refresher.filter_changed(all, query, cx);
    }

    /// Re-render the current visible set after the debounce delay.
    pub fn rerender(&mut self, cx: &mut PanelCx<'_>) {
        self.refresher.schedule(cx);
    }

    pub fn handle_key(&mut self, key: LogicalKey, cx: &mut PanelCx<'_>) -> ListEvent {
        if key == LogicalKey::Escape {
            self.lifecycle.hide(cx);
            return ListEvent::None;
        }
        match self.nav.handle(key, self.refresher.rendered_len()) {
            NavAction::Focus(index) => {
                if let Some(handle) = self.refresher.rendered_handle(index) {
                    cx.sink.focus_item(self.id(), handle);
                }
                ListEvent::None
            }
            NavAction::Activate(index) => self
                .refresher
                .rendered_candidate(index)
                .cloned()
                .map_or(ListEvent::None, ListEvent::Activate),
            NavAction::Consumed => ListEvent::None,
            NavAction::ReturnToInput => {
                cx.sink.focus_filter(self.id());
                self.edit(key, cx)
            }
            NavAction::PassThrough => self.edit(key, cx),
        }
    }

    fn edit(&mut self, key: LogicalKey, cx: &mut PanelCx<'_>) -> ListEvent {
        let changed = match key {
            LogicalKey::Char(c) => {
                self.filter.push(c);
                true
            }
            LogicalKey::Backspace => pop_grapheme(&mut self.filter),
            _ => false,
        };
        if !changed {
            return ListEvent::None;
        }
        cx.sink.set_filter_text(self.id(), &self.filter);
        ListEvent::FilterChanged
    }

    /// Replace the filter text. Returns whether it changed.
    pub fn set_filter(&mut self, text: &str, cx: &mut PanelCx<'_>) -> bool {
        if self.filter == text {
            return false;
        }
        self.filter = text.to_string();
        cx.sink.set_filter_text(self.id(), &self.filter);
        true
    }

    /// Run a candidate's action, hide, and clear the filter shortly after.
    ///
    /// A failing action is logged; the panel still hides.
    pub fn activate(
        &mut self,
        candidate: &CandidateRef,
        cx: &mut PanelCx<'_>,
    ) -> Option<ShellCommand> {
        let result = candidate.activate();
        self.lifecycle.hide(cx);
        if let Some(id) = self.clear_pending.take() {
            cx.timers.cancel(id);
        }
        self.clear_pending = Some(cx.timers.schedule(
            TimerKind::ClearFilter(self.id()),
            self.clear_delay,
            Repeat::Once,
        ));
        match result {
            Ok(Activation::Done) => None,
            Ok(Activation::Dispatch(command)) => Some(command),
            Err(err) => {
                tracing::warn!(panel = %self.id(), item = candidate.title(), "activation failed: {err}");
                None
            }
        }
    }

    /// Route a timer owned by this panel.
    pub fn on_timer(
        &mut self,
        fired: Fired,
        cx: &mut PanelCx<'_>,
        render: &dyn Fn(&dyn Candidate) -> RenderedItem,
    ) -> ListEvent {
        match fired.kind {
            TimerKind::Animation(_) => {
                self.lifecycle.on_tick(fired, cx);
            }
            TimerKind::Rebuild(_) => {
                if let Some(rebuilt) = self.refresher.on_timer(fired, cx, render) {
                    self.rebuilt(rebuilt, cx);
                }
            }
            TimerKind::ClearFilter(_) if self.clear_pending == Some(fired.id) => {
                self.clear_pending = None;
                if self.set_filter("", cx) {
                    return ListEvent::FilterChanged;
                }
            }
            _ => {}
        }
        ListEvent::None
    }

    fn rebuilt(&mut self, rebuilt: Rebuilt, cx: &mut PanelCx<'_>) {
        self.lifecycle
            .set_target(PropertyId::ContentHeight, rebuilt.content_height, cx);
        if self.nav.cursor() != FocusCursor::TextInput {
            self.nav.reset();
            cx.sink.focus_filter(self.id());
        }
    }
}

/// Remove the last user-perceived character. Returns false on empty text.
pub(crate) fn pop_grapheme(text: &mut String) -> bool {
    match text.grapheme_indices(true).next_back() {
        Some((index, _)) => {
            text.truncate(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::pop_grapheme;

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut text = "cafe\u{301}".to_string();
        assert!(pop_grapheme(&mut text));
        assert_eq!(text, "caf");

        let mut flag = "hi\u{1F1EF}\u{1F1F5}".to_string();
        assert!(pop_grapheme(&mut flag));
        assert_eq!(flag, "hi");
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut text = String::new();
        assert!(!pop_grapheme(&mut text));
    }
}
