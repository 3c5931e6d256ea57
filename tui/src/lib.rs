//! Terminal front-end for halo using ratatui.
//!
//! The engine renders into a [`TerminalSink`]; [`draw`] paints that state
//! every frame. Panels fade by blending their palette toward the screen
//! background and slide by whole cells.

mod input;
mod keys;
mod layout;
mod theme;
mod view;

pub use input::{InputPump, apply_event, handle_events};
pub use keys::{Input, KeyBinding, KeyMap, ParseBindingError};
pub use layout::{current_rect, panel_rect, placed_rect, slide_edge};
pub use theme::{Glyphs, Palette, Theme, blend, glyphs, palette, styles};
pub use view::{COL_PX, FocusTarget, ItemView, PanelView, ROW_PX, TerminalSink};

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use halo_engine::PropertyId;
use halo_types::ui::Preview;
use halo_types::{PanelId, WifiStatus};

use self::layout::{CARD_COLS, PREVIEW_COLS, PREVIEW_ROWS, STATUS_ROWS};

/// Bottom to top.
const STACKING: [PanelId; 6] = [
    PanelId::Wallpaper,
    PanelId::Clipboard,
    PanelId::Launcher,
    PanelId::Search,
    PanelId::Power,
    PanelId::Osd,
];

/// Below this a panel is invisible and is not drawn at all.
const MIN_OPACITY: f32 = 0.01;

const LOW_BATTERY_PERCENT: u8 = 10;

/// Main draw function
pub fn draw(frame: &mut Frame, sink: &mut TerminalSink, theme: &Theme) {
    let area = frame.area();
    sink.resize(area);

    let bg_block = Block::default().style(Style::default().bg(theme.palette.bg_dark));
    frame.render_widget(bg_block, area);

    let status_area = Rect {
        height: STATUS_ROWS.min(area.height),
        ..area
    };
    draw_status_bar(frame, sink, status_area, theme);

    for panel in STACKING {
        draw_panel(frame, sink, panel, theme);
    }
}

fn draw_status_bar(frame: &mut Frame, sink: &TerminalSink, area: Rect, theme: &Theme) {
    let palette = &theme.palette;
    let glyphs = &theme.glyphs;
    let status = sink.status();
    let bar_style = Style::default().bg(palette.bg_panel);

    let clock = Line::from(Span::styled(
        format!(" {}", status.clock),
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(clock).style(bar_style), area);

    let (wifi_glyph, wifi_style) = match status.wifi {
        WifiStatus::Connected(_) => (glyphs.wifi, Style::default().fg(palette.accent)),
        WifiStatus::Disconnected | WifiStatus::Unavailable => {
            (glyphs.wifi_off, Style::default().fg(palette.text_muted))
        }
    };
    let (bt_glyph, bt_style) = if status.bluetooth {
        (glyphs.bluetooth_on, Style::default().fg(palette.accent))
    } else {
        (glyphs.bluetooth_off, Style::default().fg(palette.text_muted))
    };
    let battery = status.battery;
    let battery_style = if battery.plugged {
        Style::default().fg(palette.success)
    } else if battery.percent < LOW_BATTERY_PERCENT {
        Style::default()
            .fg(palette.error)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.text_secondary)
    };
    let battery_glyph = if battery.plugged {
        glyphs.charging
    } else {
        glyphs.battery
    };

    let right = Line::from(vec![
        Span::styled(format!("{wifi_glyph} {}", status.wifi), wifi_style),
        Span::raw("  "),
        Span::styled(bt_glyph, bt_style),
        Span::raw("  "),
        Span::styled(format!("{battery_glyph} {}%", battery.percent), battery_style),
        Span::raw(" "),
    ]);
    frame.render_widget(
        Paragraph::new(right)
            .style(Style::default().fg(palette.text_secondary))
            .alignment(Alignment::Right),
        area,
    );
}

fn panel_title(panel: PanelId) -> Option<&'static str> {
    match panel {
        PanelId::Launcher => Some(" Launcher "),
        PanelId::Clipboard => Some(" Clipboard "),
        PanelId::Wallpaper => Some(" Wallpaper "),
        PanelId::Search => Some(" Web Search "),
        PanelId::Power => Some(" Power Profile "),
        PanelId::Osd => None,
    }
}

/// The palette as seen through a panel at `opacity`.
fn faded(palette: &Palette, opacity: f32) -> Palette {
    let bg = palette.bg_dark;
    let fade = |color: Color| blend(color, bg, opacity);
    Palette {
        bg_dark: bg,
        bg_panel: fade(palette.bg_panel),
        bg_highlight: fade(palette.bg_highlight),
        bg_border: fade(palette.bg_border),
        text_primary: fade(palette.text_primary),
        text_secondary: fade(palette.text_secondary),
        text_muted: fade(palette.text_muted),
        primary: fade(palette.primary),
        accent: fade(palette.accent),
        success: fade(palette.success),
        warning: fade(palette.warning),
        error: fade(palette.error),
    }
}

fn draw_panel(frame: &mut Frame, sink: &TerminalSink, panel: PanelId, theme: &Theme) {
    let view = sink.panel(panel);
    let opacity = view.value(PropertyId::Opacity);
    if !view.is_visible() || opacity <= MIN_OPACITY {
        return;
    }
    let Some(rect) = sink.current_rect(panel) else {
        return;
    };
    let palette = faded(&theme.palette, opacity);
    let glyphs = &theme.glyphs;

    frame.render_widget(Clear, rect);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_panel));
    if let Some(title) = panel_title(panel) {
        block = block.title(Line::from(Span::styled(title, styles::title(&palette))));
    }
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    match panel {
        PanelId::Launcher => draw_list(frame, view, inner, &palette, glyphs, 1.0),
        PanelId::Clipboard => draw_list(
            frame,
            view,
            inner,
            &palette,
            glyphs,
            view.value(PropertyId::SearchOpacity),
        ),
        PanelId::Wallpaper => draw_wallpapers(frame, view, inner, &palette, glyphs, opacity),
        PanelId::Search => draw_search(frame, view, inner, &palette, glyphs),
        PanelId::Power => draw_power(frame, sink, inner, &palette, glyphs),
        PanelId::Osd => draw_osd(frame, sink, inner, &palette, glyphs),
    }
}

fn filter_line(
    view: &PanelView,
    width: u16,
    palette: &Palette,
    glyphs: &Glyphs,
    alpha: f32,
) -> Line<'static> {
    let fg = |color: Color| blend(color, palette.bg_panel, alpha);
    let prefix = format!(" {} ", glyphs.search);
    let room = usize::from(width).saturating_sub(prefix.width() + 1);
    let mut spans = vec![Span::styled(prefix, Style::default().fg(fg(palette.accent)))];
    if view.filter().is_empty() {
        spans.push(Span::styled(
            "Type to filter",
            styles::placeholder(palette).fg(fg(palette.text_muted)),
        ));
    } else {
        spans.push(Span::styled(
            truncate_with_ellipsis(view.filter(), room, glyphs.ellipsis),
            Style::default().fg(fg(palette.text_primary)),
        ));
    }
    if view.focus() == FocusTarget::Filter {
        spans.push(Span::styled("_", Style::default().fg(fg(palette.accent))));
    }
    Line::from(spans)
}

fn separator(width: u16, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        "─".repeat(usize::from(width)),
        Style::default().fg(palette.bg_border),
    ))
}

/// First index to draw so `focused` stays within `rows` visible rows.
fn scroll_start(focused: Option<usize>, rows: usize) -> usize {
    match focused {
        Some(index) if rows > 0 && index >= rows => index + 1 - rows,
        _ => 0,
    }
}

fn draw_list(
    frame: &mut Frame,
    view: &PanelView,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    filter_alpha: f32,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let width = usize::from(area.width);
    let mut lines = vec![filter_line(view, area.width, palette, glyphs, filter_alpha)];
    if area.height > 1 {
        lines.push(separator(area.width, palette));
    }
    let rows = usize::from(area.height.saturating_sub(2));

    if view.items().is_empty() {
        if let Some(text) = view.placeholder() {
            lines.push(Line::from(Span::styled(
                format!("   {}", truncate_with_ellipsis(text, width.saturating_sub(3), glyphs.ellipsis)),
                styles::placeholder(palette),
            )));
        }
    } else {
        let focused = view.focused_index();
        let start = scroll_start(focused, rows);
        for (index, item) in view.items().iter().enumerate().skip(start).take(rows) {
            lines.push(list_row(item, focused == Some(index), width, palette, glyphs));
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn list_row(
    item: &ItemView,
    selected: bool,
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'static> {
    let prefix = if selected { glyphs.selected } else { " " };
    let title = single_line(&item.item.title);
    let left = format!(" {prefix} ");
    let room = width.saturating_sub(left.width());
    let title = truncate_with_ellipsis(&title, room, glyphs.ellipsis);

    let (title_style, subtitle_style) = if item.fading_out {
        let muted = Style::default().fg(palette.text_muted);
        (muted, muted)
    } else if selected {
        (styles::selected(palette), styles::subtitle(palette).bg(palette.bg_highlight))
    } else {
        (
            Style::default().fg(palette.text_secondary),
            styles::subtitle(palette),
        )
    };

    let mut used = left.width() + title.width();
    let mut spans = vec![Span::styled(left, title_style), Span::styled(title, title_style)];
    if let Some(subtitle) = &item.item.subtitle {
        let room = width.saturating_sub(used + 2);
        if room > glyphs.ellipsis.width() {
            let subtitle = truncate_with_ellipsis(&single_line(subtitle), room, glyphs.ellipsis);
            used += 2 + subtitle.width();
            spans.push(Span::styled("  ", subtitle_style));
            spans.push(Span::styled(subtitle, subtitle_style));
        }
    }
    if selected && used < width {
        spans.push(Span::styled(" ".repeat(width - used), title_style));
    }
    Line::from(spans)
}

fn draw_wallpapers(
    frame: &mut Frame,
    view: &PanelView,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    opacity: f32,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let filter_area = Rect { height: 1, ..area };
    frame.render_widget(
        Paragraph::new(filter_line(view, area.width, palette, glyphs, 1.0)),
        filter_area,
    );

    if view.items().is_empty() {
        if let Some(text) = view.placeholder() {
            let rest = Rect {
                y: area.y + 1,
                height: area.height.saturating_sub(1),
                ..area
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text.to_string(), styles::placeholder(palette)))
                    .alignment(Alignment::Center),
                rest,
            );
        }
        return;
    }

    let cards = usize::from((area.width / CARD_COLS).max(1));
    let focused = view.focused_index();
    let start = scroll_start(focused, cards);
    for (slot, (index, item)) in view
        .items()
        .iter()
        .enumerate()
        .skip(start)
        .take(cards)
        .enumerate()
    {
        let Ok(slot) = u16::try_from(slot) else {
            break;
        };
        let card = Rect {
            x: area.x + 1 + slot * CARD_COLS,
            y: area.y + 1,
            width: PREVIEW_COLS,
            height: PREVIEW_ROWS + 1,
        }
        .intersection(area);
        if card.is_empty() {
            continue;
        }
        let selected = focused == Some(index);
        let item_opacity = if item.fading_out { opacity * 0.5 } else { opacity };

        let preview_area = Rect {
            height: card.height.min(PREVIEW_ROWS),
            ..card
        };
        match &item.item.preview {
            Some(preview) => paint_preview(
                frame.buffer_mut(),
                preview,
                preview_area,
                palette.bg_dark,
                item_opacity,
                glyphs,
            ),
            None => frame.render_widget(
                Block::default().style(Style::default().bg(palette.bg_highlight)),
                preview_area,
            ),
        }

        if card.height > PREVIEW_ROWS {
            let title_area = Rect {
                y: card.y + PREVIEW_ROWS,
                height: 1,
                ..card
            };
            let style = if selected {
                styles::selected(palette)
            } else if item.fading_out {
                Style::default().fg(palette.text_muted)
            } else {
                Style::default().fg(palette.text_secondary)
            };
            let prefix = if selected { glyphs.selected } else { " " };
            let room = usize::from(card.width).saturating_sub(2);
            let title = truncate_with_ellipsis(&item.item.title, room, glyphs.ellipsis);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(format!("{prefix} {title}"), style))),
                title_area,
            );
        }
    }
}

/// Paint `preview` into `area` at two pixel rows per cell: the glyph's
/// foreground is the upper pixel and its background the lower one.
fn paint_preview(
    buf: &mut Buffer,
    preview: &Preview,
    area: Rect,
    bg: Color,
    opacity: f32,
    glyphs: &Glyphs,
) {
    if preview.width() == 0 || preview.height() == 0 || area.is_empty() {
        return;
    }
    let sample = |cx: u16, py: u32| {
        let x = u32::from(cx) * u32::from(preview.width()) / u32::from(area.width);
        let y = py * u32::from(preview.height()) / (u32::from(area.height) * 2);
        let (x, y) = (
            u16::try_from(x).unwrap_or(u16::MAX),
            u16::try_from(y).unwrap_or(u16::MAX),
        );
        preview
            .pixel(x, y)
            .map_or(bg, |[r, g, b]| blend(Color::Rgb(r, g, b), bg, opacity))
    };
    for cy in 0..area.height {
        for cx in 0..area.width {
            let top = sample(cx, u32::from(cy) * 2);
            let bottom = sample(cx, u32::from(cy) * 2 + 1);
            if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                cell.set_symbol(glyphs.half_block).set_fg(top).set_bg(bottom);
            }
        }
    }
}

fn draw_search(frame: &mut Frame, view: &PanelView, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let prefix = format!(" {} ", glyphs.search);
    let room = usize::from(area.width).saturating_sub(prefix.width() + 1);
    let mut spans = vec![Span::styled(prefix, Style::default().fg(palette.accent))];
    if view.filter().is_empty() {
        spans.push(Span::styled("Search the web", styles::placeholder(palette)));
    } else {
        // Keep the tail visible while typing past the edge.
        spans.push(Span::styled(
            tail_with_ellipsis(view.filter(), room, glyphs.ellipsis),
            Style::default().fg(palette.text_primary),
        ));
    }
    spans.push(Span::styled("_", Style::default().fg(palette.accent)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_power(frame: &mut Frame, sink: &TerminalSink, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let view = sink.panel(PanelId::Power);
    let active = sink.active_profile().map(|profile| profile.label());
    let focused = view.focused_index();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (index, (item, column)) in view.items().iter().zip(columns.iter()).enumerate() {
        let is_active = active == Some(item.item.title.as_str());
        let mut style = if is_active {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        if focused == Some(index) {
            style = style.bg(palette.bg_highlight);
        }
        let label = if is_active {
            format!("{} {}", glyphs.selected, item.item.title)
        } else {
            item.item.title.clone()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(label, style))
                .style(style)
                .alignment(Alignment::Center),
            *column,
        );
    }
}

fn draw_osd(frame: &mut Frame, sink: &TerminalSink, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let view = sink.panel(PanelId::Osd);
    let volume_glyph = if sink.muted() {
        glyphs.volume_muted
    } else {
        glyphs.volume
    };
    let volume_color = if sink.muted() {
        palette.text_muted
    } else {
        palette.accent
    };
    let lines = vec![
        level_line(
            volume_glyph,
            view.value(PropertyId::Volume),
            area.width,
            volume_color,
            palette,
            glyphs,
        ),
        level_line(
            glyphs.brightness,
            view.value(PropertyId::Brightness),
            area.width,
            palette.warning,
            palette,
            glyphs,
        ),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn level_line(
    icon: &'static str,
    level: f32,
    width: u16,
    color: Color,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'static> {
    let level = level.clamp(0.0, 1.0);
    let percent = format!(" {:>3}%", (level * 100.0).round() as u8);
    let icon = format!(" {icon} ");
    let bar_width = usize::from(width).saturating_sub(icon.width() + percent.width());
    let filled = ((bar_width as f32) * level).round() as usize;
    Line::from(vec![
        Span::styled(icon, Style::default().fg(color)),
        Span::styled(glyphs.bar_full.repeat(filled), Style::default().fg(color)),
        Span::styled(
            glyphs.bar_empty.repeat(bar_width.saturating_sub(filled)),
            Style::default().fg(palette.bg_border),
        ),
        Span::styled(percent, Style::default().fg(palette.text_primary)),
    ])
}

/// Collapse line breaks and runs of whitespace so entries fit one row.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_with_ellipsis(raw: &str, max: usize, ellipsis: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.width() <= max {
        return trimmed.to_string();
    }
    let budget = max.saturating_sub(ellipsis.width());
    let mut out = String::new();
    let mut used = 0;
    for grapheme in trimmed.graphemes(true) {
        let width = grapheme.width();
        if used + width > budget {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.push_str(ellipsis);
    out
}

fn tail_with_ellipsis(raw: &str, max: usize, ellipsis: &str) -> String {
    if raw.width() <= max {
        return raw.to_string();
    }
    let budget = max.saturating_sub(ellipsis.width());
    let mut tail: Vec<&str> = Vec::new();
    let mut used = 0;
    for grapheme in raw.graphemes(true).rev() {
        let width = grapheme.width();
        if used + width > budget {
            break;
        }
        tail.push(grapheme);
        used += width;
    }
    tail.reverse();
    format!("{ellipsis}{}", tail.concat())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use halo_config::UiConfig;
    use halo_engine::{RenderSink, RenderedItem};
    use halo_types::ui::{Preview, PropertyId};
    use halo_types::{BatteryStatus, PanelId, PowerProfile, StatusSnapshot, WifiStatus};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::style::Color;

    use super::{
        TerminalSink, Theme, draw, scroll_start, single_line, tail_with_ellipsis,
        truncate_with_ellipsis,
    };

    fn ascii_theme() -> Theme {
        Theme::new(UiConfig {
            ascii_only: true,
            high_contrast: false,
        })
    }

    fn render(sink: &mut TerminalSink) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
        let theme = ascii_theme();
        terminal.draw(|f| draw(f, sink, &theme)).expect("draw");
        terminal.backend().buffer().clone()
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    fn screen(buffer: &Buffer) -> String {
        (0..buffer.area.height)
            .map(|y| row(buffer, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn show(sink: &mut TerminalSink, panel: PanelId) {
        sink.set_surface_visible(panel, true);
        sink.apply(panel, PropertyId::Opacity, 1.0);
        sink.apply(panel, PropertyId::Offset, 0.0);
    }

    #[test]
    fn status_bar_shows_clock_and_battery() {
        let mut sink = TerminalSink::new();
        sink.set_status(&StatusSnapshot {
            clock: "Mon 12:34".to_string(),
            battery: BatteryStatus {
                percent: 80,
                plugged: false,
            },
            wifi: WifiStatus::Connected("HomeNet".to_string()),
            bluetooth: true,
        });
        let buffer = render(&mut sink);
        let top = row(&buffer, 0);
        assert!(top.contains("Mon 12:34"), "{top}");
        assert!(top.contains("W HomeNet"), "{top}");
        assert!(top.contains("BAT 80%"), "{top}");
    }

    #[test]
    fn hidden_panels_are_not_drawn() {
        let mut sink = TerminalSink::new();
        sink.add_item(PanelId::Launcher, RenderedItem::new("Firefox"));
        sink.apply(PanelId::Launcher, PropertyId::Opacity, 1.0);
        let buffer = render(&mut sink);
        assert!(!screen(&buffer).contains("Firefox"));
    }

    #[test]
    fn launcher_lists_items_and_marks_focus() {
        let mut sink = TerminalSink::new();
        show(&mut sink, PanelId::Launcher);
        sink.apply(PanelId::Launcher, PropertyId::ContentHeight, 2.0 * 44.0);
        sink.add_item(
            PanelId::Launcher,
            RenderedItem::new("Firefox").with_subtitle(Some("Web Browser".into())),
        );
        let files = sink.add_item(PanelId::Launcher, RenderedItem::new("Files"));
        sink.focus_item(PanelId::Launcher, files);
        sink.set_filter_text(PanelId::Launcher, "fi");

        let text = screen(&render(&mut sink));
        assert!(text.contains("Launcher"));
        assert!(text.contains("> fi"));
        assert!(text.contains("Firefox  Web Browser"));
        assert!(text.contains(" > Files"));
    }

    #[test]
    fn placeholder_shows_when_empty() {
        let mut sink = TerminalSink::new();
        show(&mut sink, PanelId::Clipboard);
        sink.apply(PanelId::Clipboard, PropertyId::ContentHeight, 44.0);
        sink.set_placeholder(PanelId::Clipboard, Some("No clipboard history"));
        let text = screen(&render(&mut sink));
        assert!(text.contains("No clipboard history"));
    }

    #[test]
    fn slid_out_panel_is_not_drawn() {
        let mut sink = TerminalSink::new();
        show(&mut sink, PanelId::Search);
        sink.set_filter_text(PanelId::Search, "rust lifetimes");
        assert!(screen(&render(&mut sink)).contains("rust lifetimes"));

        sink.apply(PanelId::Search, PropertyId::Offset, 10.0 * 44.0);
        assert!(!screen(&render(&mut sink)).contains("rust lifetimes"));
    }

    #[test]
    fn osd_shows_levels() {
        let mut sink = TerminalSink::new();
        show(&mut sink, PanelId::Osd);
        sink.apply(PanelId::Osd, PropertyId::Volume, 0.5);
        sink.apply(PanelId::Osd, PropertyId::Brightness, 1.0);
        sink.set_muted(true);
        let text = screen(&render(&mut sink));
        assert!(text.contains("MUT"));
        assert!(text.contains(" 50%"));
        assert!(text.contains("100%"));
    }

    #[test]
    fn power_marks_active_profile() {
        let mut sink = TerminalSink::new();
        show(&mut sink, PanelId::Power);
        for profile in PowerProfile::ALL {
            sink.add_item(PanelId::Power, RenderedItem::new(profile.label()));
        }
        sink.set_active_profile(Some(PowerProfile::Balanced));
        let text = screen(&render(&mut sink));
        assert!(text.contains("> Balanced"));
        assert!(text.contains("Performance"));
    }

    #[test]
    fn wallpaper_preview_paints_half_blocks() {
        let red = [255, 0, 0];
        let blue = [0, 0, 255];
        let preview = Preview::new(2, 2, vec![red, red, blue, blue]).expect("preview");
        let mut sink = TerminalSink::new();
        show(&mut sink, PanelId::Wallpaper);
        sink.add_item(
            PanelId::Wallpaper,
            RenderedItem::new("lake.png").with_preview(Some(Rc::new(preview))),
        );
        let buffer = render(&mut sink);
        let rect = sink.current_rect(PanelId::Wallpaper).expect("on screen");
        // border, then the filter row
        let (x, y) = (rect.x + 2, rect.y + 2);
        assert_eq!(buffer[(x, y)].fg, Color::Rgb(255, 0, 0));
        assert_eq!(buffer[(x, y + 5)].fg, Color::Rgb(0, 0, 255));
        assert!(screen(&buffer).contains("lake.png"));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_with_ellipsis("Firefox", 10, "..."), "Firefox");
        assert_eq!(truncate_with_ellipsis("Firefox Web Browser", 10, "..."), "Firefox...");
        assert_eq!(truncate_with_ellipsis("日本語テキスト", 7, "…"), "日本語…");
        assert_eq!(tail_with_ellipsis("abcdefgh", 5, "..."), "...gh");
    }

    #[test]
    fn scrolling_keeps_focus_visible() {
        assert_eq!(scroll_start(None, 5), 0);
        assert_eq!(scroll_start(Some(4), 5), 0);
        assert_eq!(scroll_start(Some(7), 5), 3);
    }

    #[test]
    fn multi_line_entries_collapse() {
        assert_eq!(single_line("first\n  second\tthird"), "first second third");
    }
}
