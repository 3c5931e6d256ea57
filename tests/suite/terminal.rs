//! The terminal front-end end to end: crossterm events in, ratatui cells out.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use halo_config::UiConfig;
use halo_engine::{Shell, ShellConfig};
use halo_tui::{KeyMap, TerminalSink, Theme, apply_event, draw};
use halo_types::PanelId;
use halo_types::ui::PanelState;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::common::{Harness, MS};

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn screen(shell: &mut Shell<TerminalSink>) -> String {
    let theme = Theme::new(UiConfig {
        ascii_only: true,
        high_contrast: false,
    });
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
    terminal
        .draw(|frame| draw(frame, shell.sink_mut(), &theme))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn bound_key_opens_the_launcher_on_screen() {
    let mut h = Harness::with_sink(&["Firefox", "Files"], TerminalSink::new());
    let keymap = KeyMap::from_config(&ShellConfig::default().bindings);
    assert!(!screen(&mut h.shell).contains("Firefox"));

    assert!(!apply_event(&mut h.shell, &keymap, &key(KeyCode::F(1))));
    h.advance(MS * 1000);
    let text = screen(&mut h.shell);
    assert!(text.contains("Launcher"), "{text}");
    assert!(text.contains("Firefox"), "{text}");
    assert!(text.contains("Files"), "{text}");

    apply_event(&mut h.shell, &keymap, &key(KeyCode::Esc));
    h.advance(MS * 1000);
    assert_eq!(h.shell.state(PanelId::Launcher), PanelState::Hidden);
    assert!(!screen(&mut h.shell).contains("Firefox"));
}

#[test]
fn typed_filter_shows_on_screen_after_rebuild() {
    let mut h = Harness::with_sink(&["Firefox", "Terminal"], TerminalSink::new());
    let keymap = KeyMap::from_config(&ShellConfig::default().bindings);
    apply_event(&mut h.shell, &keymap, &key(KeyCode::F(1)));
    for c in "term".chars() {
        apply_event(&mut h.shell, &keymap, &key(KeyCode::Char(c)));
    }
    h.advance(MS * 1000);
    let text = screen(&mut h.shell);
    assert!(text.contains("> term"), "{text}");
    assert!(text.contains("Terminal"), "{text}");
    assert!(!text.contains("Firefox"), "{text}");
}

#[test]
fn volume_key_draws_the_osd() {
    let mut h = Harness::with_sink(&[], TerminalSink::new());
    let keymap = KeyMap::from_config(&ShellConfig::default().bindings);
    apply_event(&mut h.shell, &keymap, &key(KeyCode::F(7)));
    h.advance(MS * 500);
    let text = screen(&mut h.shell);
    assert!(text.contains(" 55%"), "{text}");
    assert_eq!(h.shell.focused(), None);
}
