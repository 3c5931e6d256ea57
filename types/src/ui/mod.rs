//! UI state types shared by the engine and the front-end.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

mod animation;
mod focus;
mod key;
mod panel;
mod preview;

pub use animation::{AnimatableProperty, NORMALIZED_EPSILON, PIXEL_EPSILON, PropertyId};
pub use focus::{FocusCursor, FocusMode, Orientation};
pub use key::LogicalKey;
pub use panel::{Edge, PanelSize, PanelState};
pub use preview::Preview;
