//! Shared test utilities and fixtures
//!
//! A shell wired to an in-memory machine, driven on a virtual clock.

#![allow(dead_code)]

use std::rc::Rc;
use std::time::Duration;

use halo_engine::testing::{FakeCandidate, FakeSystem, RecordingSink, candidates};
use halo_engine::{CandidateRef, RenderSink, Shell, ShellCommand, ShellConfig};
use halo_types::PanelId;
use halo_types::ui::LogicalKey;

pub const MS: Duration = Duration::from_millis(1);

/// Launcher commands: one that opens the clipboard panel plus plain entries.
pub fn commands() -> Vec<CandidateRef> {
    let mut commands: Vec<CandidateRef> = vec![Rc::new(
        FakeCandidate::new("Clipboard").dispatching(ShellCommand::Toggle(PanelId::Clipboard)),
    )];
    commands.extend(candidates(&["Lock Screen", "Logout", "Reboot"]));
    commands
}

/// A shell on a fake machine, with a clock that only moves when told to.
pub struct Harness<S: RenderSink> {
    pub system: FakeSystem,
    pub shell: Shell<S>,
}

impl Harness<RecordingSink> {
    pub fn new(apps: &[&str]) -> Self {
        Self::with_sink(apps, RecordingSink::new())
    }
}

impl<S: RenderSink> Harness<S> {
    pub fn with_sink(apps: &[&str], sink: S) -> Self {
        let system = FakeSystem::new();
        let collaborators = system.collaborators(
            candidates(apps),
            commands(),
            candidates(&["copied text"]),
            Vec::new(),
        );
        let shell = Shell::new(&ShellConfig::default(), collaborators, sink);
        Self { system, shell }
    }

    pub fn now(&self) -> Duration {
        self.shell.now()
    }

    /// Move the clock forward by `by`, one millisecond at a time, calling
    /// `check` after each step.
    pub fn step(&mut self, by: Duration, mut check: impl FnMut(&Shell<S>)) {
        let until = self.now() + by;
        while self.now() < until {
            let next = self.now() + MS;
            self.shell.advance_to(next);
            check(&self.shell);
        }
    }

    pub fn advance(&mut self, by: Duration) {
        let until = self.now() + by;
        self.shell.advance_to(until);
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.shell.handle_key(LogicalKey::Char(c));
        }
    }

    pub fn press(&mut self, key: LogicalKey) {
        self.shell.handle_key(key);
    }
}
