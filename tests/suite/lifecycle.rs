//! Show/hide invariants observed through the whole shell.

use halo_engine::testing::RecordingSink;
use halo_engine::{Shell, ShellCommand, ShellConfig};
use halo_types::ui::{PanelState, PropertyId};
use halo_types::{PanelId, TimerKind};

use crate::common::{Harness, MS};

fn animation_loops(shell: &Shell<RecordingSink>) -> Vec<usize> {
    PanelId::ALL
        .into_iter()
        .map(|panel| shell.timers().active_count(TimerKind::Animation(panel)))
        .collect()
}

#[test]
fn rapid_toggling_never_runs_two_loops_per_panel() {
    let mut h = Harness::new(&["Firefox", "Files"]);
    for _ in 0..4 {
        h.shell.execute(ShellCommand::Toggle(PanelId::Launcher));
        assert!(animation_loops(&h.shell).iter().all(|&n| n <= 1));
        h.step(MS * 30, |shell| {
            assert!(animation_loops(shell).iter().all(|&n| n <= 1));
        });
        h.shell.execute(ShellCommand::Show(PanelId::Launcher));
        h.shell.execute(ShellCommand::Hide(PanelId::Launcher));
        assert!(animation_loops(&h.shell).iter().all(|&n| n <= 1));
    }
    h.step(MS * 2000, |shell| {
        assert!(animation_loops(shell).iter().all(|&n| n <= 1));
    });
    assert_eq!(
        h.shell.timers().active_count(TimerKind::Animation(PanelId::Launcher)),
        0
    );
}

#[test]
fn converged_show_lands_exactly_on_target() {
    let mut h = Harness::new(&["Firefox"]);
    h.shell.execute(ShellCommand::Show(PanelId::Launcher));
    h.advance(MS * 2000);

    let sink = h.shell.sink();
    assert_eq!(h.shell.state(PanelId::Launcher), PanelState::Visible);
    assert_eq!(sink.last_value(PanelId::Launcher, PropertyId::Opacity), Some(1.0));
    assert_eq!(
        sink.last_value(PanelId::Launcher, PropertyId::Offset),
        Some(ShellConfig::default().animation.rest_offset)
    );
    assert!(sink.is_surface_visible(PanelId::Launcher));
}

#[test]
fn converged_hide_unmaps_the_surface() {
    let mut h = Harness::new(&["Firefox"]);
    h.shell.execute(ShellCommand::Show(PanelId::Search));
    h.advance(MS * 2000);
    h.shell.execute(ShellCommand::Hide(PanelId::Search));
    assert!(h.shell.sink().is_surface_visible(PanelId::Search));
    h.advance(MS * 2000);

    let sink = h.shell.sink();
    assert_eq!(h.shell.state(PanelId::Search), PanelState::Hidden);
    assert_eq!(sink.last_value(PanelId::Search, PropertyId::Opacity), Some(0.0));
    assert!(!sink.is_surface_visible(PanelId::Search));
    assert_eq!(
        sink.visibility_log()
            .iter()
            .filter(|(panel, _)| *panel == PanelId::Search)
            .count(),
        2
    );
}

#[test]
fn hiding_a_hidden_panel_does_nothing() {
    let mut h = Harness::new(&["Firefox"]);
    h.advance(MS * 10);
    let timers = h.shell.timers().len();
    let log = h.shell.sink().visibility_log().len();

    h.shell.execute(ShellCommand::Hide(PanelId::Launcher));

    assert_eq!(h.shell.timers().len(), timers);
    assert_eq!(h.shell.sink().visibility_log().len(), log);
    assert_eq!(h.shell.state(PanelId::Launcher), PanelState::Hidden);
    assert_eq!(h.shell.focused(), None);
}

#[test]
fn showing_again_mid_hide_reverses_without_remapping() {
    let mut h = Harness::new(&["Firefox"]);
    h.shell.execute(ShellCommand::Show(PanelId::Power));
    h.advance(MS * 1000);
    h.shell.execute(ShellCommand::Hide(PanelId::Power));
    h.advance(MS * 40);
    assert_eq!(h.shell.state(PanelId::Power), PanelState::Hiding);

    h.shell.execute(ShellCommand::Show(PanelId::Power));
    assert!(h.shell.state(PanelId::Power).is_shown());
    h.advance(MS * 1000);
    assert_eq!(h.shell.state(PanelId::Power), PanelState::Visible);
    assert_eq!(
        h.shell
            .sink()
            .visibility_log()
            .iter()
            .filter(|(panel, visible)| *panel == PanelId::Power && !visible)
            .count(),
        0
    );
}
