//! halo - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The binary bridges [`halo_engine`] (panels, timers, focus) and [`halo_tui`]
//! (rendering), with [`halo_providers`] supplying the real system behind the
//! engine's collaborator traits.
//!
//! ```text
//! main() -> ShellConfig::load() -> Shell::new(config, providers, TerminalSink)
//!                                       |
//!                                       v
//!                          run() -> 8ms frame loop until quit
//! ```
//!
//! # Event Loop
//!
//! A fixed 8ms (~120 FPS) cadence drives everything:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`halo_tui::InputPump`])
//! 3. Fire due timers (`shell.advance_to(elapsed)`)
//! 4. Hand decoded wallpaper previews to the engine
//! 5. Render frame

use anyhow::{Result, bail};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use halo_config::ShellConfig;
use halo_engine::{Shell, ShellCommand};
use halo_tui::{InputPump, KeyMap, TerminalSink, Theme, draw, handle_events};

const FRAME_DURATION: Duration = Duration::from_millis(8);

const USAGE: &str = "\
usage: halo [COMMAND...]

Runs the shell in the terminal. Each COMMAND (for example `launcher.show`
or `osd.volume-up`) is executed once at startup.

Keys: bindings from the [bindings] config table, Esc hides the focused
panel, Ctrl+C or Ctrl+Q quits.";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file stay silent; stderr would corrupt the screen.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: <config dir>/halo/logs/halo.log
    if let Some(config_path) = ShellConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("halo.log"));
    }

    // Fallback: ./.halo/logs/halo.log
    candidates.push(PathBuf::from(".halo").join("logs").join("halo.log"));

    candidates
}

fn load_config() -> ShellConfig {
    match ShellConfig::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::info!("No config file, using defaults");
            ShellConfig::default()
        }
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Config ignored: {err}");
            ShellConfig::default()
        }
    }
}

fn startup_commands() -> Result<Option<Vec<ShellCommand>>> {
    let mut commands = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "-h" || arg == "--help" {
            return Ok(None);
        }
        match arg.parse::<ShellCommand>() {
            Ok(command) => commands.push(command),
            Err(err) => bail!("{err}\n\n{USAGE}"),
        }
    }
    Ok(Some(commands))
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, the alternate screen and focus-change reporting are all undone
/// on drop, so the terminal stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, EnableFocusChange) {
            let _ = disable_raw_mode();
            let _ = execute!(out, DisableFocusChange, LeaveAlternateScreen);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), DisableFocusChange, LeaveAlternateScreen);
                return Err(err.into());
            }
        };
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableFocusChange,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(commands) = startup_commands()? else {
        println!("{USAGE}");
        return Ok(());
    };

    init_tracing();

    let config = load_config();
    let keymap = KeyMap::from_config(&config.bindings);
    let theme = Theme::new(config.ui);

    let mut session = TerminalSession::new()?;
    let size = session.terminal.size()?;
    let mut sink = TerminalSink::new().with_osd_edge(config.osd.edge);
    sink.resize(Rect::new(0, 0, size.width, size.height));

    let mut shell = Shell::new(&config, halo_providers::system(&config), sink);
    for command in commands {
        shell.execute(command);
    }

    let result = run(&mut session.terminal, &mut shell, &keymap, &theme).await;
    drop(session);

    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }
    tracing::info!("halo exiting");
    result
}

async fn run<B>(
    terminal: &mut Terminal<B>,
    shell: &mut Shell<TerminalSink>,
    keymap: &KeyMap,
    theme: &Theme,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let start = Instant::now();

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(shell, keymap, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        shell.advance_to(start.elapsed());
        shell.drain_previews();

        if let Err(e) = terminal.draw(|frame| draw(frame, shell.sink_mut(), theme)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
