//! Core engine for halo: panel state machines and orchestration.
//!
//! This crate owns every piece of shell state without any rendering or
//! process dependencies. Rendering goes through [`RenderSink`], the system
//! through the traits in [`collaborators`], time through [`Timers`].

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod anim;
pub mod autohide;
pub mod bar;
pub mod collaborators;
pub mod command;
pub mod focus;
pub mod lifecycle;
pub mod list_panel;
pub mod panels;
pub mod poller;
pub mod refresher;
pub mod shell;
pub mod sink;
pub mod timer;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use anim::{AnimationDriver, Role, Step};
pub use collaborators::{
    Activation, AudioControl, Candidate, CandidateRef, CandidateSource, LevelControl, LocalClock,
    Notification, Notifier, PowerProfileControl, PreviewDecoder, SinkProbe, StatusProbe, Urgency,
    UrlOpener, WallClock,
};
pub use command::{OsdAction, ParseCommandError, ShellCommand};
pub use lifecycle::{PanelCx, PanelLifecycle, TickOutcome};
pub use panels::Panel;
pub use poller::{ChangeSource, DeviceChange, SinkWatcher};
pub use refresher::{ListLayout, filter_candidates};
pub use shell::{Collaborators, Shell};
pub use sink::{Fade, RenderSink, RenderedItem};
pub use timer::{Fired, Repeat, Scheduler, Timers};
pub use worker::{PreviewResult, PreviewWorker};

pub use halo_config::ShellConfig;
pub use halo_types::ui::{LogicalKey, PanelState, Preview, PropertyId};
pub use halo_types::{PanelId, PowerProfile, ProviderError, StatusSnapshot};
