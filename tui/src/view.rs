//! The engine's render sink, backed by plain view models.
//!
//! The engine pushes state in; [`crate::draw`] reads it out each frame.
//! Pixel quantities from the engine become cells through [`ROW_PX`] and
//! [`COL_PX`].

use std::collections::HashMap;

use halo_engine::{Fade, RenderSink, RenderedItem};
use halo_types::ui::{Edge, PanelSize, PropertyId};
use halo_types::{ItemHandle, PanelId, PowerProfile, StatusSnapshot};
use ratatui::layout::Rect;

use crate::layout;

/// Pixels per terminal row: one list item plus spacing.
pub const ROW_PX: f32 = 44.0;
/// Pixels per terminal column.
pub const COL_PX: f32 = 10.0;

/// Convert an engine pixel distance to whole rows.
#[must_use]
pub fn px_to_rows(px: f32) -> i32 {
    (px / ROW_PX).round() as i32
}

#[must_use]
pub fn px_to_cols(px: f32) -> i32 {
    (px / COL_PX).round() as i32
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub handle: ItemHandle,
    pub item: RenderedItem,
    /// Marked for removal; drawn dimmed until the engine removes it.
    pub fading_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Filter,
    Item(ItemHandle),
}

/// Everything one panel shows.
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    visible: bool,
    values: HashMap<PropertyId, f32>,
    items: Vec<ItemView>,
    placeholder: Option<String>,
    focus: FocusTarget,
    filter: String,
}

impl PanelView {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Last applied value of `property`, 0 if never applied.
    #[must_use]
    pub fn value(&self, property: PropertyId) -> f32 {
        self.values.get(&property).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn items(&self) -> &[ItemView] {
        &self.items
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    #[must_use]
    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Index of the focused item, if an item has focus.
    #[must_use]
    pub fn focused_index(&self) -> Option<usize> {
        match self.focus {
            FocusTarget::Item(handle) => self.items.iter().position(|i| i.handle == handle),
            FocusTarget::Filter => None,
        }
    }

    /// Rows the list area occupies right now, following the animated height.
    #[must_use]
    pub fn list_rows(&self) -> u16 {
        px_to_rows(self.value(PropertyId::ContentHeight)).max(0) as u16
    }
}

/// [`RenderSink`] for the terminal.
#[derive(Debug)]
pub struct TerminalSink {
    panels: HashMap<PanelId, PanelView>,
    next_handle: u64,
    status: StatusSnapshot,
    active_profile: Option<PowerProfile>,
    muted: bool,
    area: Rect,
    osd_edge: Edge,
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            panels: PanelId::ALL
                .into_iter()
                .map(|panel| (panel, PanelView::default()))
                .collect(),
            next_handle: 0,
            status: StatusSnapshot::default(),
            active_profile: None,
            muted: false,
            area: Rect::new(0, 0, 80, 24),
            osd_edge: Edge::Right,
        }
    }

    /// Edge the OSD slides from; must match the engine's configuration.
    #[must_use]
    pub fn with_osd_edge(mut self, edge: Edge) -> Self {
        self.osd_edge = edge;
        self
    }

    #[must_use]
    pub fn osd_edge(&self) -> Edge {
        self.osd_edge
    }

    /// Where `panel` is drawn this frame, `None` if off-screen.
    #[must_use]
    pub fn current_rect(&self, panel: PanelId) -> Option<Rect> {
        layout::current_rect(panel, self.panel(panel), self.area, self.osd_edge)
    }

    /// Track the terminal size so `measure` reports real panel extents.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
    }

    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    #[must_use]
    pub fn panel(&self, panel: PanelId) -> &PanelView {
        // Every id is inserted in `new`.
        &self.panels[&panel]
    }

    fn view_mut(&mut self, panel: PanelId) -> &mut PanelView {
        self.panels.entry(panel).or_default()
    }

    #[must_use]
    pub fn status(&self) -> &StatusSnapshot {
        &self.status
    }

    #[must_use]
    pub fn active_profile(&self) -> Option<PowerProfile> {
        self.active_profile
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.muted
    }
}

impl RenderSink for TerminalSink {
    fn set_surface_visible(&mut self, panel: PanelId, visible: bool) {
        self.view_mut(panel).visible = visible;
    }

    fn measure(&self, panel: PanelId) -> PanelSize {
        let rest = layout::panel_rect(panel, self.panel(panel), self.area);
        PanelSize::new(
            f32::from(rest.width) * COL_PX,
            f32::from(rest.height) * ROW_PX,
        )
    }

    fn apply(&mut self, panel: PanelId, property: PropertyId, value: f32) {
        self.view_mut(panel).values.insert(property, value);
    }

    fn add_item(&mut self, panel: PanelId, item: RenderedItem) -> ItemHandle {
        self.next_handle += 1;
        let handle = ItemHandle::new(self.next_handle);
        self.view_mut(panel).items.push(ItemView {
            handle,
            item,
            fading_out: false,
        });
        handle
    }

    fn set_item_fade(&mut self, panel: PanelId, item: ItemHandle, fade: Fade) {
        if let Some(view) = self
            .view_mut(panel)
            .items
            .iter_mut()
            .find(|view| view.handle == item)
        {
            view.fading_out = fade == Fade::Out;
        }
    }

    fn remove_item(&mut self, panel: PanelId, item: ItemHandle) {
        let view = self.view_mut(panel);
        view.items.retain(|view| view.handle != item);
        if view.focus == FocusTarget::Item(item) {
            view.focus = FocusTarget::Filter;
        }
    }

    fn set_placeholder(&mut self, panel: PanelId, text: Option<&str>) {
        self.view_mut(panel).placeholder = text.map(str::to_string);
    }

    fn focus_item(&mut self, panel: PanelId, item: ItemHandle) {
        self.view_mut(panel).focus = FocusTarget::Item(item);
    }

    fn focus_filter(&mut self, panel: PanelId) {
        self.view_mut(panel).focus = FocusTarget::Filter;
    }

    fn set_filter_text(&mut self, panel: PanelId, text: &str) {
        text.clone_into(&mut self.view_mut(panel).filter);
    }

    fn set_status(&mut self, status: &StatusSnapshot) {
        self.status.clone_from(status);
    }

    fn set_active_profile(&mut self, profile: Option<PowerProfile>) {
        self.active_profile = profile;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
