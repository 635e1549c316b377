use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crate::error::CheckError;

/// How long a timed-out command gets between SIGTERM and SIGKILL.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// One external command, optionally run through a privilege wrapper.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// `sudo` or similar; `None` runs `program` directly.
    pub elevation: Option<PathBuf>,
    pub program:   PathBuf,
    pub args:      Vec<String>,
    pub timeout:   Duration,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self { elevation: None, program: program.into(), args, timeout }
    }

    pub fn elevated(mut self, wrapper: Option<&Path>) -> Self {
        self.elevation = wrapper.map(Path::to_path_buf);
        self
    }

    /// Full argv, wrapper first.
    pub fn argv(&self) -> Vec<String> {
        self.elevation.iter()
            .chain(std::iter::once(&self.program))
            .map(|p| p.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect()
    }

    fn display(&self) -> String {
        self.argv().join(" ")
    }
}

/// Run the command to completion and return its output lines, stdout first
/// then stderr. A non-zero exit or a timeout is an error.
///
/// The child leads its own process group. sudo forks the real command
/// instead of exec-ing it, so on timeout the whole group is terminated.
pub fn run(inv: &Invocation) -> Result<Vec<String>, CheckError> {
    let argv = inv.argv();
    let command = inv.display();
    log::debug!("running `{}` (timeout {:?})", command, inv.timeout);

    let child = Command::new(&argv[0])
        .args(&argv[1..])
        .process_group(0)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CheckError::Spawn { command: command.clone(), source })?;
    let pgid = Pid::from_raw(child.id() as i32);

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(child.wait_with_output());
    });

    let output = match rx.recv_timeout(inv.timeout) {
        Ok(result) => result.map_err(|source| CheckError::Spawn { command: command.clone(), source })?,
        Err(_) => {
            log::warn!("`{}` exceeded {:?}, terminating process group {}", command, inv.timeout, pgid);
            terminate(pgid, &command, &rx);
            return Err(CheckError::Timeout { command, timeout: inv.timeout });
        }
    };

    let text = combined_text(&output);
    if !output.status.success() {
        return Err(CheckError::CommandFailed { command, code: output.status.code(), output: text });
    }
    log::debug!("`{}` produced {} bytes", command, text.len());
    Ok(text.lines().map(str::to_string).collect())
}

/// SIGTERM the group (sudo relays it to its child), then SIGKILL whatever
/// is still holding the output pipes after `KILL_GRACE`.
fn terminate(pgid: Pid, command: &str, waiter: &Receiver<io::Result<Output>>) {
    if !signal_group(pgid, Signal::SIGTERM, command) {
        return;
    }
    if waiter.recv_timeout(KILL_GRACE).is_ok() {
        return;
    }
    log::warn!("`{}` ignored SIGTERM, sending SIGKILL", command);
    signal_group(pgid, Signal::SIGKILL, command);
}

/// False once the group is gone.
fn signal_group(pgid: Pid, signal: Signal, command: &str) -> bool {
    match killpg(pgid, signal) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(e) => {
            log::warn!("could not send {} to `{}` (process group {}): {}", signal, command, pgid, e);
            true
        }
    }
}

fn combined_text(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }
    text
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, timeout: Duration) -> Invocation {
        Invocation::new("sh", vec!["-c".into(), script.into()], timeout)
    }

    #[test]
    fn argv_with_and_without_elevation() {
        let inv = Invocation::new("/usr/bin/btrfs", vec!["filesystem".into(), "show".into(), "/mydisk".into()],
            Duration::from_secs(10));
        assert_eq!(inv.argv(), ["/usr/bin/btrfs", "filesystem", "show", "/mydisk"]);
        let inv = inv.elevated(Some(Path::new("/sudo")));
        assert_eq!(inv.argv(), ["/sudo", "/usr/bin/btrfs", "filesystem", "show", "/mydisk"]);
    }

    #[test]
    fn captures_lines() {
        let lines = run(&sh("printf 'unit\\ntest\\n'", Duration::from_secs(10))).unwrap();
        assert_eq!(lines, ["unit", "test"]);
    }

    #[test]
    fn stderr_follows_stdout() {
        let lines = run(&sh("printf out; printf err >&2", Duration::from_secs(10))).unwrap();
        assert_eq!(lines, ["out", "err"]);
    }

    #[test]
    fn runs_through_elevation_wrapper() {
        let inv = Invocation::new("printf", vec!["wrapped".into()], Duration::from_secs(10))
            .elevated(Some(Path::new("env")));
        assert_eq!(run(&inv).unwrap(), ["wrapped"]);
    }

    #[test]
    fn nonzero_exit_is_command_failed() {
        let err = run(&sh("echo stdout; echo stderr >&2; exit 2", Duration::from_secs(10))).unwrap_err();
        match err {
            CheckError::CommandFailed { code, output, .. } => {
                assert_eq!(code, Some(2));
                assert!(output.contains("stdout"));
                assert!(output.contains("stderr"));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn slow_command_times_out() {
        let err = run(&sh("sleep 5", Duration::from_millis(200))).unwrap_err();
        assert!(matches!(err, CheckError::Timeout { .. }));
    }

    #[test]
    fn timeout_reports_duration() {
        let err = run(&sh("sleep 5", Duration::from_millis(300))).unwrap_err();
        assert_eq!(err.to_string(), "`sh -c sleep 5` timed out after 300ms");
    }

    /// Gone or a zombie waiting to be reaped.
    #[cfg(target_os = "linux")]
    fn exited(pid: i32) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => stat.rsplit(')').next()
                .and_then(|rest| rest.split_whitespace().next())
                .map_or(true, |state| state == "Z"),
            Err(_) => true,
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn timeout_kills_forked_grandchild() {
        let dir = tempfile::tempdir().unwrap();
        let pidfile = dir.path().join("inner.pid");
        // The outer shell forks the inner one and waits, like sudo does.
        let script = format!("sh -c 'echo $$ > {}; exec sleep 30'; echo done", pidfile.display());
        let err = run(&sh(&script, Duration::from_millis(500))).unwrap_err();
        assert!(matches!(err, CheckError::Timeout { .. }));

        let inner: i32 = std::fs::read_to_string(&pidfile).unwrap().trim().parse().unwrap();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !exited(inner) && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }
        assert!(exited(inner), "inner command {} still running", inner);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let inv = Invocation::new("/nonexistent/btrfs", vec![], Duration::from_secs(1));
        assert!(matches!(run(&inv), Err(CheckError::Spawn { .. })));
    }
}
