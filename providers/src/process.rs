//! Child process plumbing shared by every provider.
//!
//! Programs are resolved on `PATH` with `which` so a missing tool surfaces as
//! [`ProviderError::Unavailable`] instead of a generic spawn failure.

use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread;

use halo_types::ProviderError;

pub(crate) fn resolve(program: &str) -> Result<PathBuf, ProviderError> {
    which::which(program).map_err(|_| ProviderError::Unavailable(program.to_string()))
}

fn command(program: &str) -> Result<Command, ProviderError> {
    let bin = resolve(program)?;
    let mut cmd = Command::new(bin);
    cmd.stdin(Stdio::null());
    Ok(cmd)
}

fn spawn_error(program: &str, source: std::io::Error) -> ProviderError {
    ProviderError::Spawn {
        program: program.to_string(),
        source,
    }
}

fn check(program: &str, output: Output) -> Result<Output, ProviderError> {
    if output.status.success() {
        Ok(output)
    } else {
        Err(ProviderError::Status {
            program: program.to_string(),
            status: output.status.to_string(),
        })
    }
}

/// Run to completion and return stdout as text.
pub(crate) fn output<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<String, ProviderError> {
    let out = command(program)?
        .args(args)
        .stderr(Stdio::null())
        .output()
        .map_err(|e| spawn_error(program, e))?;
    let out = check(program, out)?;
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Run to completion, discarding output.
pub(crate) fn run<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<(), ProviderError> {
    output(program, args).map(drop)
}

/// Run with `input` on stdin and wait for exit.
pub(crate) fn run_with_input(program: &str, args: &[&str], input: &[u8]) -> Result<(), ProviderError> {
    let mut child = command(program)?
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| spawn_error(program, e))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).map_err(|e| spawn_error(program, e))?;
    }
    let status = child.wait().map_err(|e| spawn_error(program, e))?;
    check(
        program,
        Output {
            status,
            stdout: Vec::new(),
            stderr: Vec::new(),
        },
    )
    .map(drop)
}

/// Connect `from`'s stdout to `to`'s stdin and wait for both.
pub(crate) fn pipe(
    from_program: &str,
    from_args: &[&str],
    to_program: &str,
    to_args: &[&str],
) -> Result<(), ProviderError> {
    let mut producer = command(from_program)?
        .args(from_args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| spawn_error(from_program, e))?;
    let Some(stdout) = producer.stdout.take() else {
        let _ = producer.kill();
        return Err(ProviderError::Unavailable(format!("{from_program} stdout")));
    };
    let consumer = command(to_program).and_then(|mut cmd| {
        cmd.args(to_args)
            .stdin(stdout)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| spawn_error(to_program, e))
    });
    let produced = producer.wait().map_err(|e| spawn_error(from_program, e))?;
    let consumed = consumer?;
    for (program, status) in [(from_program, produced), (to_program, consumed)] {
        if !status.success() {
            return Err(ProviderError::Status {
                program: program.to_string(),
                status: status.to_string(),
            });
        }
    }
    Ok(())
}

/// Start `program` without waiting for it.
///
/// The child gets its own process group so it outlives the shell, and a
/// reaper thread collects its exit status.
pub(crate) fn spawn_detached<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<(), ProviderError> {
    let mut cmd = command(program)?;
    cmd.args(args).stdout(Stdio::null()).stderr(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    let mut child = cmd.spawn().map_err(|e| spawn_error(program, e))?;
    let name = program.to_string();
    thread::Builder::new()
        .name("halo-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::debug!(program = %name, %status, "detached process failed");
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(program = %name, "wait failed: {err}"),
        })
        .map_err(|e| spawn_error(program, e))?;
    Ok(())
}

/// Run a command line through `sh -c`, detached.
pub(crate) fn shell_detached(command_line: &str) -> Result<(), ProviderError> {
    spawn_detached("sh", &["-c", command_line])
}

/// Run a blocking job on its own thread and log its failure.
pub(crate) fn detach<F>(what: &'static str, job: F) -> Result<(), ProviderError>
where
    F: FnOnce() -> Result<(), ProviderError> + Send + 'static,
{
    thread::Builder::new()
        .name(format!("halo-{what}"))
        .spawn(move || {
            if let Err(err) = job() {
                tracing::warn!("{what} failed: {err}");
            }
        })
        .map(drop)
        .map_err(|e| spawn_error(what, e))
}
