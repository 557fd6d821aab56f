//! Run the fetch tool in the workspace, forwarding its output live.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::env::IsolatedGoEnv;
use crate::error::FetchError;
use crate::info_log;

/// Extra spawn attempts when the kernel reports the executable as busy.
const BUSY_SPAWN_RETRIES: u32 = 5;

/// Arguments for an update-to-latest, verbose fetch of `package`.
pub fn fetch_args(package: &str) -> [&str; 4] {
    ["get", "-u", "-v", package]
}

/// Copy `src` to `dst` chunk by chunk, flushing after every chunk so the
/// operator sees progress as it happens. Returns bytes forwarded.
pub fn forward<R: Read, W: Write>(mut src: R, mut dst: W) -> io::Result<u64> {
    let mut buf = [0u8; 4096];
    let mut total = 0u64;
    loop {
        match src.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => {
                dst.write_all(&buf[..n])?;
                dst.flush()?;
                total += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Run `attempt` again while it fails with `ExecutableFileBusy` (ETXTBSY).
///
/// A freshly written tool can stay busy for a moment while another thread's
/// fork still holds the write handle.
fn retry_while_busy<T>(mut attempt: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut retries = 0;
    loop {
        match attempt() {
            Err(e) if e.kind() == io::ErrorKind::ExecutableFileBusy && retries < BUSY_SPAWN_RETRIES => {
                retries += 1;
                tracing::debug!(retries, "executable busy, retrying spawn");
                thread::sleep(Duration::from_millis(20 * u64::from(retries)));
            }
            other => return other,
        }
    }
}

fn join_forwarder(handle: Option<JoinHandle<io::Result<u64>>>) -> io::Result<u64> {
    match handle {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("output forwarding thread panicked"))),
        None => Ok(0),
    }
}

/// Run `<program> get -u -v <package>` inside the workspace and block until
/// it exits, forwarding its output to our stdout and stderr.
pub fn run_fetch(program: &str, workspace_root: &Path, package: &str) -> Result<(), FetchError> {
    run_fetch_to(program, workspace_root, package, io::stdout(), io::stderr())
}

/// Like [`run_fetch`], with the forwarding destinations supplied by the caller.
///
/// Stdin is inherited (the tool may prompt for VCS credentials). Stdout and
/// stderr are piped and forwarded by two threads while the child runs, so
/// nothing waits in a buffer until exit. A non-zero exit takes precedence
/// over a forwarding failure; after a clean exit, a forwarding failure is
/// reported as `FetchError::Forward`.
pub fn run_fetch_to<O, E>(
    program: &str,
    workspace_root: &Path,
    package: &str,
    out: O,
    err: E,
) -> Result<(), FetchError>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    let env = IsolatedGoEnv::for_workspace(workspace_root);
    let args = fetch_args(package);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    env.apply(&mut cmd);

    info_log!("Running {} {} in {}", program, args.join(" "), workspace_root.display());
    let mut child = retry_while_busy(|| cmd.spawn()).map_err(|source| FetchError::Spawn {
        program: program.to_string(),
        package: package.to_string(),
        source,
    })?;

    let stdout_handle = child
        .stdout
        .take()
        .map(|pipe| thread::spawn(move || forward(pipe, out)));
    let stderr_handle = child
        .stderr
        .take()
        .map(|pipe| thread::spawn(move || forward(pipe, err)));

    let status = child.wait();

    let mut forward_failure = None;
    for (stream, joined) in [
        ("stdout", join_forwarder(stdout_handle)),
        ("stderr", join_forwarder(stderr_handle)),
    ] {
        match joined {
            Ok(bytes) => tracing::debug!(stream, bytes, "fetch output forwarded"),
            Err(e) if forward_failure.is_none() => forward_failure = Some((stream, e)),
            Err(e) => tracing::debug!(stream, "forwarding also failed: {}", e),
        }
    }

    let status = status.map_err(|source| FetchError::Wait {
        program: program.to_string(),
        package: package.to_string(),
        source,
    })?;

    if !status.success() {
        if let Some((stream, e)) = &forward_failure {
            tracing::debug!(stream = *stream, "forwarding failed before non-zero exit: {}", e);
        }
        return Err(FetchError::Exit {
            program: program.to_string(),
            package: package.to_string(),
            exit_code: status.code(),
        });
    }

    if let Some((stream, source)) = forward_failure {
        return Err(FetchError::Forward {
            program: program.to_string(),
            package: package.to_string(),
            stream,
            source,
        });
    }
    Ok(())
}
