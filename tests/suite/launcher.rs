//! Launcher scenarios driven key by key through the shell.

use halo_engine::ShellCommand;
use halo_types::PanelId;
use halo_types::ui::{FocusCursor, LogicalKey, PanelState};

use crate::common::{Harness, MS};

#[test]
fn typing_fi_rebuilds_once_after_the_pause() {
    let mut h = Harness::new(&["Firefox", "Files", "Terminal", "Fish"]);
    h.shell.execute(ShellCommand::Show(PanelId::Launcher));
    h.advance(MS * 500);
    let before = h.shell.launcher().list().refresher().rebuild_count();

    h.type_text("f");
    h.advance(MS * 50);
    h.type_text("i");
    h.advance(MS * 149);
    assert_eq!(h.shell.launcher().list().refresher().rebuild_count(), before);

    h.advance(MS);
    assert_eq!(h.shell.launcher().list().refresher().rebuild_count(), before + 1);
    assert_eq!(
        h.shell.sink().item_titles(PanelId::Launcher),
        ["Firefox", "Files", "Fish"]
    );
}

#[test]
fn prefix_searches_commands() {
    let mut h = Harness::new(&["Firefox", "Lockpick"]);
    h.shell.execute(ShellCommand::Show(PanelId::Launcher));
    h.type_text(">loc");
    h.advance(MS * 200);
    assert_eq!(h.shell.sink().item_titles(PanelId::Launcher), ["Lock Screen"]);
}

#[test]
fn shrinking_results_reset_the_cursor() {
    let mut h = Harness::new(&["alpha", "beta", "gamma", "delta", "epsilon"]);
    h.shell.execute(ShellCommand::Show(PanelId::Launcher));
    h.advance(MS * 500);
    for _ in 0..5 {
        h.press(LogicalKey::Down);
    }
    assert_eq!(
        h.shell.launcher().list().cursor(),
        FocusCursor::List { index: 4 }
    );

    h.type_text("ta");
    h.advance(MS * 200);
    assert_eq!(h.shell.sink().item_titles(PanelId::Launcher), ["beta", "delta"]);
    assert_eq!(h.shell.launcher().list().cursor(), FocusCursor::TextInput);
}

#[test]
fn command_entry_opens_another_panel() {
    let mut h = Harness::new(&["Firefox"]);
    h.shell.execute(ShellCommand::Show(PanelId::Launcher));
    h.type_text(">clip");
    h.advance(MS * 200);
    assert_eq!(h.shell.sink().item_titles(PanelId::Launcher), ["Clipboard"]);

    h.press(LogicalKey::Down);
    h.press(LogicalKey::Enter);
    assert!(!h.shell.state(PanelId::Launcher).is_shown());
    assert!(h.shell.state(PanelId::Clipboard).is_shown());
    assert_eq!(h.shell.focused(), Some(PanelId::Clipboard));

    h.advance(MS * 1000);
    assert_eq!(h.shell.state(PanelId::Launcher), PanelState::Hidden);
    assert_eq!(h.shell.sink().item_titles(PanelId::Clipboard), ["copied text"]);
}

#[test]
fn empty_results_keep_typing_in_the_field() {
    let mut h = Harness::new(&["Firefox"]);
    h.shell.execute(ShellCommand::Show(PanelId::Launcher));
    h.type_text("zzz");
    h.advance(MS * 200);
    assert!(h.shell.sink().item_titles(PanelId::Launcher).is_empty());
    assert_eq!(h.shell.sink().placeholder(PanelId::Launcher), Some("No results"));

    h.press(LogicalKey::Down);
    assert_eq!(h.shell.launcher().list().cursor(), FocusCursor::TextInput);
}
