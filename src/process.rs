use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Error, Result};

/// A command line to run to completion.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub log_prefix: String,
}

impl ProcessConfig {
    /// Shell-style rendering for messages.
    pub fn display(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub signal: Option<i32>,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && self.signal.is_none()
    }

    /// Stdout followed by stderr, newline-joined.
    pub fn combined(&self) -> String {
        self.stdout_lines
            .iter()
            .chain(self.stderr_lines.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run a child process to completion, collecting its output line by line.
///
/// The child is placed in its own process group on Unix, and SIGINT/SIGTERM
/// received by the parent are forwarded to that group.
pub async fn spawn_and_collect(config: ProcessConfig) -> Result<ProcessOutput> {
    let mut cmd = Command::new(&config.command);
    cmd.args(&config.args)
        .current_dir(&config.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .map_err(|e| Error::Process(format!("failed to spawn '{}': {e}", config.command)))?;

    let pid = child
        .id()
        .ok_or_else(|| Error::Process("child has no pid".into()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Process("child stdout not captured".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::Process("child stderr not captured".into()))?;

    let stdout_task = collect_lines(stdout, format!("{}:out", config.log_prefix));
    let stderr_task = collect_lines(stderr, format!("{}:err", config.log_prefix));

    #[cfg(unix)]
    let signal_task = forward_signals(pid as i32);
    #[cfg(not(unix))]
    let _ = pid;

    let status = child
        .wait()
        .await
        .map_err(|e| Error::Process(format!("wait error: {e}")));

    #[cfg(unix)]
    signal_task.abort();

    let status = status?;

    let stdout_lines = stdout_task
        .await
        .map_err(|e| Error::Process(format!("stdout reader failed: {e}")))??;
    let stderr_lines = stderr_task
        .await
        .map_err(|e| Error::Process(format!("stderr reader failed: {e}")))??;

    let (exit_code, signal) = extract_exit_info(&status);
    debug!(command = %config.display(), exit_code, ?signal, "process finished");

    Ok(ProcessOutput {
        exit_code,
        signal,
        stdout_lines,
        stderr_lines,
    })
}

/// Bytes that are not valid UTF-8 are replaced rather than ending the read.
fn collect_lines<R>(reader: R, prefix: String) -> JoinHandle<Result<Vec<String>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = Vec::new();
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| Error::Process(format!("[{prefix}] read error: {e}")))?;
            if read == 0 {
                break;
            }
            let line = decode_line(&buf);
            debug!("[{prefix}] {line}");
            lines.push(line);
        }
        Ok(lines)
    })
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

#[cfg(unix)]
fn forward_signals(pgid: i32) -> JoinHandle<()> {
    tokio::spawn(async move {
        use tokio::signal::unix::{SignalKind, signal};
        let (Ok(mut sigint), Ok(mut sigterm)) = (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) else {
            return;
        };
        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    unsafe { libc::killpg(pgid, libc::SIGINT); }
                }
                _ = sigterm.recv() => {
                    unsafe { libc::killpg(pgid, libc::SIGTERM); }
                }
            }
        }
    })
}

fn extract_exit_info(status: &std::process::ExitStatus) -> (i32, Option<i32>) {
    if let Some(code) = status.code() {
        return (code, None);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return (128 + sig, Some(sig));
        }
    }
    (-1, None)
}
