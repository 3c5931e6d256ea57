//! Debounced, capped rebuild of a panel's candidate list.
//!
//! A filter change never touches the rendered rows directly. The rows are
//! marked as fading out, and a single rebuild is scheduled after the debounce
//! delay; a newer change cancels the pending one. The rebuild swaps the rows
//! in one go and reports the height the list container should animate to.

use std::time::Duration;

use halo_config::ListConfig;
use halo_types::{ItemHandle, PanelId, TimerId, TimerKind};

use crate::collaborators::{Candidate, CandidateRef};
use crate::lifecycle::PanelCx;
use crate::sink::{Fade, RenderedItem};
use crate::timer::{Fired, Repeat};

/// Case-insensitive substring filter over `match_text`, in source order,
/// keeping at most `cap` entries. An all-whitespace query matches everything.
#[must_use]
pub fn filter_candidates(all: &[CandidateRef], query: &str, cap: usize) -> Vec<CandidateRef> {
    let needle = query.trim().to_lowercase();
    all.iter()
        .filter(|c| needle.is_empty() || c.match_text().to_lowercase().contains(&needle))
        .take(cap)
        .cloned()
        .collect()
}

/// Row geometry used to size the list container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLayout {
    pub item_height: f32,
    pub spacing: f32,
    pub max_height: f32,
}

impl ListLayout {
    #[must_use]
    pub fn from_config(config: &ListConfig) -> Self {
        Self {
            item_height: config.item_height,
            spacing: config.spacing,
            max_height: config.max_height,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn content_height(&self, rows: usize) -> f32 {
        (rows as f32 * (self.item_height + self.spacing)).min(self.max_height)
    }
}

/// Result of a completed rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rebuilt {
    /// Number of candidate rows now rendered (the placeholder is not counted).
    pub count: usize,
    pub content_height: f32,
}

struct Row {
    handle: ItemHandle,
    candidate: CandidateRef,
}

pub struct ListRefresher {
    panel: PanelId,
    cap: usize,
    debounce: Duration,
    layout: ListLayout,
    placeholder: String,
    visible: Vec<CandidateRef>,
    rows: Vec<Row>,
    fading_out: bool,
    placeholder_shown: bool,
    pending: Option<TimerId>,
    rebuilds: u64,
}

impl ListRefresher {
    #[must_use]
    pub fn new(panel: PanelId, config: &ListConfig, placeholder: impl Into<String>) -> Self {
        Self {
            panel,
            cap: config.render_cap,
            debounce: config.debounce(),
            layout: ListLayout::from_config(config),
            placeholder: placeholder.into(),
            visible: Vec::new(),
            rows: Vec::new(),
            fading_out: false,
            placeholder_shown: false,
            pending: None,
            rebuilds: 0,
        }
    }

    /// Candidates matching the current filter, capped.
    #[must_use]
    pub fn visible(&self) -> &[CandidateRef] {
        &self.visible
    }

    #[must_use]
    pub fn rendered_len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rendered_handle(&self, index: usize) -> Option<ItemHandle> {
        self.rows.get(index).map(|row| row.handle)
    }

    #[must_use]
    pub fn rendered_candidate(&self, index: usize) -> Option<&CandidateRef> {
        self.rows.get(index).map(|row| &row.candidate)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Completed rebuilds so far.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    #[must_use]
    pub fn layout(&self) -> ListLayout {
        self.layout
    }

    /// Recompute the visible set and schedule a rebuild.
    pub fn filter_changed(&mut self, all: &[CandidateRef], query: &str, cx: &mut PanelCx<'_>) {
        self.visible = filter_candidates(all, query, self.cap);
        self.schedule(cx);
    }

    /// Fade the current rows out (once) and (re)arm the debounce timer.
    pub fn schedule(&mut self, cx: &mut PanelCx<'_>) {
        if !self.fading_out {
            for row in &self.rows {
                cx.sink.set_item_fade(self.panel, row.handle, Fade::Out);
            }
            self.fading_out = true;
        }
        if let Some(id) = self.pending.take() {
            cx.timers.cancel(id);
        }
        self.pending = Some(cx.timers.schedule(
            TimerKind::Rebuild(self.panel),
            self.debounce,
            Repeat::Once,
        ));
    }

    /// Handle a rebuild timer. Returns `None` for timers this refresher no
    /// longer owns.
    pub fn on_timer(
        &mut self,
        fired: Fired,
        cx: &mut PanelCx<'_>,
        render: &dyn Fn(&dyn Candidate) -> RenderedItem,
    ) -> Option<Rebuilt> {
        if self.pending != Some(fired.id) {
            return None;
        }
        self.pending = None;
        Some(self.rebuild(cx, render))
    }

    /// Replace the rendered rows with the visible set right away.
    pub fn rebuild(
        &mut self,
        cx: &mut PanelCx<'_>,
        render: &dyn Fn(&dyn Candidate) -> RenderedItem,
    ) -> Rebuilt {
        if let Some(id) = self.pending.take() {
            cx.timers.cancel(id);
        }
        for row in self.rows.drain(..) {
            cx.sink.remove_item(self.panel, row.handle);
        }
        self.fading_out = false;

        for candidate in &self.visible {
            let handle = cx.sink.add_item(self.panel, render(candidate.as_ref()));
            cx.sink.set_item_fade(self.panel, handle, Fade::In);
            self.rows.push(Row {
                handle,
                candidate: candidate.clone(),
            });
        }

        if self.rows.is_empty() {
            cx.sink.set_placeholder(self.panel, Some(&self.placeholder));
            self.placeholder_shown = true;
        } else if self.placeholder_shown {
            cx.sink.set_placeholder(self.panel, None);
            self.placeholder_shown = false;
        }

        self.rebuilds += 1;
        let rebuilt = Rebuilt {
            count: self.rows.len(),
            content_height: self.layout.content_height(self.rows.len().max(1)),
        };
        tracing::debug!(panel = %self.panel, count = rebuilt.count, "list rebuilt");
        rebuilt
    }
}

/// Default row rendering: title and subtitle, no preview.
#[must_use]
pub fn plain_item(candidate: &dyn Candidate) -> RenderedItem {
    RenderedItem::new(candidate.title()).with_subtitle(candidate.subtitle().map(str::to_string))
}
