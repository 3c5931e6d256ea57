//! Where each panel sits on screen.

use halo_types::PanelId;
use halo_types::ui::{Edge, PropertyId};
use ratatui::layout::Rect;

use crate::view::{PanelView, px_to_cols, px_to_rows};

/// Rows taken by the status bar at the top of the screen.
pub const STATUS_ROWS: u16 = 1;
/// Preview raster shown per wallpaper card, in cells.
pub const PREVIEW_COLS: u16 = 24;
pub const PREVIEW_ROWS: u16 = 6;
/// Card width including the gap to the next card.
pub const CARD_COLS: u16 = PREVIEW_COLS + 2;

fn centered_x(area: Rect, width: u16) -> u16 {
    area.x + area.width.saturating_sub(width) / 2
}

/// Panel rectangle at rest, before any slide offset.
#[must_use]
pub fn panel_rect(panel: PanelId, view: &PanelView, area: Rect) -> Rect {
    let top = area.y + STATUS_ROWS + 1;
    let rect = match panel {
        PanelId::Launcher => {
            let width = 60.min(area.width.saturating_sub(4));
            // border, filter, separator, list, border
            let height = 4 + view.list_rows();
            Rect::new(centered_x(area, width), top, width, height)
        }
        PanelId::Clipboard => {
            let width = 70.min(area.width.saturating_sub(4));
            let height = 4 + view.list_rows();
            let y = (area.y + area.height.saturating_sub(height) / 2).max(top);
            Rect::new(centered_x(area, width), y, width, height)
        }
        PanelId::Wallpaper => {
            let width = area.width.saturating_sub(4);
            // border, filter, preview, title, border
            let height = 4 + PREVIEW_ROWS;
            let y = (area.y + area.height)
                .saturating_sub(height + 1)
                .max(top);
            Rect::new(area.x + 2, y, width, height)
        }
        PanelId::Search => {
            let width = 50.min(area.width.saturating_sub(4));
            Rect::new(centered_x(area, width), top, width, 3)
        }
        PanelId::Power => {
            let width = 50.min(area.width.saturating_sub(4));
            Rect::new(centered_x(area, width), top, width, 3)
        }
        PanelId::Osd => {
            let width = 32.min(area.width.saturating_sub(2));
            let height = 4;
            let x = (area.x + area.width).saturating_sub(width + 1);
            let y = area.y + area.height.saturating_sub(height) / 2;
            Rect::new(x, y, width, height)
        }
    };
    rect.intersection(area)
}

/// Apply the slide offset toward `edge` and clip to the screen.
///
/// Returns `None` once the panel has slid fully out of view.
#[must_use]
pub fn placed_rect(rest: Rect, edge: Option<Edge>, offset_px: f32, area: Rect) -> Option<Rect> {
    let (mut x, mut y) = (i32::from(rest.x), i32::from(rest.y));
    match edge {
        Some(Edge::Top) => y -= px_to_rows(offset_px),
        Some(Edge::Bottom) => y += px_to_rows(offset_px),
        Some(Edge::Left) => x -= px_to_cols(offset_px),
        Some(Edge::Right) => x += px_to_cols(offset_px),
        None => {}
    }
    let left = x.max(i32::from(area.x));
    let top = y.max(i32::from(area.y));
    let right = (x + i32::from(rest.width)).min(i32::from(area.right()));
    let bottom = (y + i32::from(rest.height)).min(i32::from(area.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Edge each panel slides from; the OSD edge is configurable.
#[must_use]
pub fn slide_edge(panel: PanelId, osd_edge: Edge) -> Option<Edge> {
    match panel {
        PanelId::Launcher | PanelId::Power | PanelId::Search => Some(Edge::Top),
        PanelId::Wallpaper => Some(Edge::Bottom),
        PanelId::Osd => Some(osd_edge),
        PanelId::Clipboard => None,
    }
}

/// Where `panel` is drawn this frame.
#[must_use]
pub fn current_rect(panel: PanelId, view: &PanelView, area: Rect, osd_edge: Edge) -> Option<Rect> {
    let rest = panel_rect(panel, view, area);
    placed_rect(
        rest,
        slide_edge(panel, osd_edge),
        view.value(PropertyId::Offset),
        area,
    )
}
