//! The render side of a panel, as seen by the engine.
//!
//! The engine decides *what* is on screen and which value every animated
//! property has; a [`RenderSink`] owns the actual surfaces. The terminal
//! front-end implements it for real, tests record into it.

use std::rc::Rc;

use halo_types::ui::{PanelSize, Preview, PropertyId};
use halo_types::{ItemHandle, PanelId, PowerProfile, StatusSnapshot};

/// Per-item fade direction. The sink animates these on its own; the engine
/// only flips the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    In,
    Out,
}

/// What a list row looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem {
    pub title: String,
    pub subtitle: Option<String>,
    pub preview: Option<Rc<Preview>>,
}

impl RenderedItem {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            preview: None,
        }
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle;
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview: Option<Rc<Preview>>) -> Self {
        self.preview = preview;
        self
    }
}

pub trait RenderSink {
    /// Map or unmap a panel surface.
    fn set_surface_visible(&mut self, panel: PanelId, visible: bool);

    /// Natural size of a panel at its current content.
    fn measure(&self, panel: PanelId) -> PanelSize;

    /// Push one animated property value.
    fn apply(&mut self, panel: PanelId, property: PropertyId, value: f32);

    fn add_item(&mut self, panel: PanelId, item: RenderedItem) -> ItemHandle;

    fn set_item_fade(&mut self, panel: PanelId, item: ItemHandle, fade: Fade);

    fn remove_item(&mut self, panel: PanelId, item: ItemHandle);

    /// Show a placeholder row, or clear it with `None`.
    fn set_placeholder(&mut self, panel: PanelId, text: Option<&str>);

    fn focus_item(&mut self, panel: PanelId, item: ItemHandle);

    /// Give keyboard focus back to the panel's text field.
    fn focus_filter(&mut self, panel: PanelId);

    fn set_filter_text(&mut self, panel: PanelId, text: &str);

    fn set_status(&mut self, status: &StatusSnapshot);

    /// Highlight the active power profile; `None` when it could not be read.
    fn set_active_profile(&mut self, profile: Option<PowerProfile>);

    fn set_muted(&mut self, muted: bool);
}
