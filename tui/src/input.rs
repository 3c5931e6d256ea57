//! Input pump for the halo terminal front-end.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use halo_engine::{RenderSink, Shell};

use crate::keys::{Input, KeyMap};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve animation

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking task and hands them to the control
/// loop through a bounded channel.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending terminal events into the shell.
///
/// Returns `Ok(true)` when the user asked to quit.
pub fn handle_events<S: RenderSink>(
    shell: &mut Shell<S>,
    keymap: &KeyMap,
    input: &mut InputPump,
) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        if apply_event(shell, keymap, &ev) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(false)
}

/// Feed one terminal event to the shell. Returns `true` on quit.
pub fn apply_event<S: RenderSink>(shell: &mut Shell<S>, keymap: &KeyMap, event: &Event) -> bool {
    let input = match event {
        Event::Key(key) => keymap.translate(key),
        Event::FocusLost => Input::FocusLost,
        _ => Input::Ignored,
    };
    match input {
        Input::Quit => return true,
        Input::Command(command) => shell.execute(command),
        Input::Key(key) => shell.handle_key(key),
        Input::FocusLost => {
            debug!(focused = ?shell.focused(), "Terminal lost focus");
            shell.focus_lost();
        }
        Input::Ignored => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use halo_engine::testing::{FakeSystem, RecordingSink, candidates};
    use halo_engine::{PanelState, Shell, ShellConfig};
    use halo_types::PanelId;

    use super::apply_event;
    use crate::keys::KeyMap;

    fn shell() -> Shell<RecordingSink> {
        let config = ShellConfig::default();
        let collaborators = FakeSystem::new().collaborators(
            candidates(&["Firefox", "Files"]),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        Shell::new(&config, collaborators, RecordingSink::default())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn keymap() -> KeyMap {
        let mut table = BTreeMap::new();
        table.insert("f1".to_string(), "launcher.toggle".to_string());
        KeyMap::from_config(&table)
    }

    #[test]
    fn binding_shows_panel_and_escape_hides_it() {
        let mut shell = shell();
        let keymap = keymap();
        assert!(!apply_event(&mut shell, &keymap, &key(KeyCode::F(1))));
        assert_eq!(shell.focused(), Some(PanelId::Launcher));
        assert!(shell.state(PanelId::Launcher).is_shown());

        assert!(!apply_event(&mut shell, &keymap, &key(KeyCode::Esc)));
        assert_eq!(shell.state(PanelId::Launcher), PanelState::Hiding);
    }

    #[test]
    fn focus_lost_releases_focus() {
        let mut shell = shell();
        let keymap = keymap();
        apply_event(&mut shell, &keymap, &key(KeyCode::F(1)));
        apply_event(&mut shell, &keymap, &Event::FocusLost);
        assert_eq!(shell.focused(), None);
    }

    #[test]
    fn ctrl_q_quits() {
        let mut shell = shell();
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(apply_event(&mut shell, &KeyMap::default(), &quit));
    }
}
