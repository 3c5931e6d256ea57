//! OSD, power popup and status bar through the shell.

use halo_engine::{OsdAction, ShellCommand};
use halo_types::ui::{LogicalKey, PanelState};
use halo_types::{BatteryStatus, PanelId, PowerProfile};

use crate::common::{Harness, MS};

#[test]
fn osd_hides_one_second_after_the_last_nudge() {
    let mut h = Harness::new(&[]);
    h.advance(MS * 100);
    h.shell.execute(ShellCommand::Osd(OsdAction::VolumeUp));
    h.advance(MS * 500);
    h.shell.execute(ShellCommand::Osd(OsdAction::VolumeUp));
    assert_eq!(h.system.state().volume, 60);

    h.advance(MS * 999);
    assert!(h.shell.state(PanelId::Osd).is_shown());
    h.advance(MS);
    assert_eq!(h.shell.state(PanelId::Osd), PanelState::Hiding);
    h.advance(MS * 1000);
    assert_eq!(h.shell.state(PanelId::Osd), PanelState::Hidden);
}

#[test]
fn mute_toggle_reaches_the_sink() {
    let mut h = Harness::new(&[]);
    h.shell.execute(ShellCommand::Osd(OsdAction::ToggleMute));
    assert!(h.system.state().muted);
    assert_eq!(h.shell.sink().muted(), Some(true));
    assert_eq!(h.shell.focused(), None);
}

#[test]
fn power_popup_sets_the_selected_profile() {
    let mut h = Harness::new(&[]);
    h.shell.execute(ShellCommand::Show(PanelId::Power));
    assert_eq!(h.shell.sink().active_profile(), Some(PowerProfile::Balanced));

    h.press(LogicalKey::Right);
    h.press(LogicalKey::Right);
    h.press(LogicalKey::Right);
    h.press(LogicalKey::Enter);
    assert_eq!(h.system.state().profile, PowerProfile::Performance);
    assert_eq!(h.shell.sink().active_profile(), Some(PowerProfile::Performance));
}

#[test]
fn low_battery_notifies_once() {
    let mut h = Harness::new(&[]);
    h.system.state().battery = BatteryStatus {
        percent: 5,
        plugged: false,
    };
    h.advance(MS * 5_001);
    assert_eq!(h.system.state().notifications.len(), 1);
    h.advance(MS * 10_000);
    assert_eq!(h.system.state().notifications.len(), 1);
    assert_eq!(
        h.shell.sink().status().map(|status| status.battery.percent),
        Some(5)
    );
}
