//! Panel visibility state and geometry.

use serde::Deserialize;

/// Visibility lifecycle of an overlay panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    Showing,
    Visible,
    Hiding,
}

impl PanelState {
    /// Whether the backing surface is mapped (anything but fully hidden).
    #[must_use]
    pub fn is_mapped(self) -> bool {
        !matches!(self, PanelState::Hidden)
    }

    /// Whether the panel is shown or on its way to being shown.
    #[must_use]
    pub fn is_shown(self) -> bool {
        matches!(self, PanelState::Showing | PanelState::Visible)
    }
}

/// Screen edge a panel slides from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Whether motion along this edge is vertical.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

/// Measured size of a panel surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelSize {
    pub width: f32,
    pub height: f32,
}

impl PanelSize {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The dimension that matters when sliding from `edge`.
    #[must_use]
    pub fn along(self, edge: Edge) -> f32 {
        if edge.is_vertical() {
            self.height
        } else {
            self.width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Edge, PanelSize, PanelState};

    #[test]
    fn mapped_and_shown() {
        assert!(!PanelState::Hidden.is_mapped());
        assert!(PanelState::Hiding.is_mapped());
        assert!(!PanelState::Hiding.is_shown());
        assert!(PanelState::Showing.is_shown());
    }

    #[test]
    fn size_along_edge() {
        let size = PanelSize::new(700.0, 460.0);
        assert_eq!(size.along(Edge::Bottom), 460.0);
        assert_eq!(size.along(Edge::Right), 700.0);
    }
}
