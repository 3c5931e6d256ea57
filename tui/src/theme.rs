//! Color theme and glyphs for the halo terminal front-end.
//!
//! Uses Kanagawa Wave palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use halo_config::UiConfig;

/// Kanagawa Wave color palette constants.
mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    // === Primary/Brand ===
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet

    // === Accent Colors ===
    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::PRIMARY,
            accent: colors::CYAN,
            success: colors::GREEN,
            warning: colors::YELLOW,
            error: colors::RED,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            primary: Color::White,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

#[must_use]
pub fn palette(options: UiConfig) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for panel and status icons.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub search: &'static str,
    pub selected: &'static str,
    pub volume: &'static str,
    pub volume_muted: &'static str,
    pub brightness: &'static str,
    pub battery: &'static str,
    pub charging: &'static str,
    pub wifi: &'static str,
    pub wifi_off: &'static str,
    pub bluetooth_on: &'static str,
    pub bluetooth_off: &'static str,
    pub bar_full: &'static str,
    pub bar_empty: &'static str,
    pub ellipsis: &'static str,
    /// Upper half block for two-pixels-per-cell previews.
    pub half_block: &'static str,
}

#[must_use]
pub fn glyphs(options: UiConfig) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            search: ">",
            selected: ">",
            volume: "VOL",
            volume_muted: "MUT",
            brightness: "BRI",
            battery: "BAT",
            charging: "+",
            wifi: "W",
            wifi_off: "W!",
            bluetooth_on: "BT",
            bluetooth_off: "bt",
            bar_full: "#",
            bar_empty: "-",
            ellipsis: "...",
            half_block: "#",
        }
    } else {
        Glyphs {
            search: "",
            selected: "▸",
            volume: "󰕾",
            volume_muted: "󰖁",
            brightness: "󰃠",
            battery: "󰁹",
            charging: "󰂄",
            wifi: "󰖩",
            wifi_off: "󰖪",
            bluetooth_on: "󰂯",
            bluetooth_off: "󰂲",
            bar_full: "█",
            bar_empty: "░",
            ellipsis: "…",
            half_block: "▀",
        }
    }
}

/// Everything the draw functions need to pick colors and icons.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub palette: Palette,
    pub glyphs: Glyphs,
}

impl Theme {
    #[must_use]
    pub fn new(options: UiConfig) -> Self {
        Self {
            palette: palette(options),
            glyphs: glyphs(options),
        }
    }
}

/// Mix `fg` over `bg` at `alpha` (0 = all background, 1 = all foreground).
///
/// Named terminal colors cannot be mixed; they switch at the halfway point.
#[must_use]
pub fn blend(fg: Color, bg: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            let mix = |f: u8, b: u8| (f32::from(b) + (f32::from(f) - f32::from(b)) * alpha).round() as u8;
            Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
        }
        _ if alpha >= 0.5 => fg,
        _ => bg,
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn selected(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .bg(palette.bg_highlight)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn placeholder(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::ITALIC)
    }

    #[must_use]
    pub fn subtitle(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }
}
