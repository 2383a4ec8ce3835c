//! Supervised execution of external tools
//!
//! Runs one command at a time with a wall-clock budget. Standard output and
//! standard error go to the same capture file, so the bytes come back
//! interleaved in the order the tool wrote them.
//!
//! On unix each tool runs in its own process group, and a timeout kills
//! the whole group so that processes started by a shell line die with it.

use crate::error::{HarnessError, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

#[cfg(unix)]
use nix::sys::signal::{killpg, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// How often a running child is checked for exit
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Invocation {
    Argv { program: OsString, args: Vec<OsString> },
    Shell(String),
}

/// An external command: an argument vector, or a shell line for tools
/// whose invocation syntax needs one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    invocation: Invocation,
    current_dir: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
}

impl ToolCommand {
    /// Start an argument vector with the program to run
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self::from_invocation(Invocation::Argv {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        })
    }

    /// Build from a complete argument vector, program first
    pub fn from_argv<S: AsRef<OsStr>>(argv: &[S]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HarnessError::InvalidInput("empty command".to_string()))?;
        Ok(Self::new(program).args(args))
    }

    /// A single line interpreted by `sh -c`
    pub fn shell(line: impl Into<String>) -> Self {
        Self::from_invocation(Invocation::Shell(line.into()))
    }

    fn from_invocation(invocation: Invocation) -> Self {
        Self {
            invocation,
            current_dir: None,
            envs: Vec::new(),
        }
    }

    /// Append one argument. Ignored for shell lines.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        if let Invocation::Argv { args, .. } = &mut self.invocation {
            args.push(arg.as_ref().to_os_string());
        }
        self
    }

    /// Append several arguments. Ignored for shell lines.
    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        args.into_iter().fold(self, |cmd, arg| cmd.arg(arg))
    }

    /// Run the process in `dir`
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Directory the process will run in, if set
    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Set an environment variable for the process
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    fn build(&self) -> Command {
        let mut cmd = match &self.invocation {
            Invocation::Argv { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            Invocation::Shell(line) => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(line);
                cmd
            }
        };
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        own_process_group(&mut cmd);
        cmd.envs(self.envs.iter().map(|(k, v)| (k, v)));
        cmd
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.invocation {
            Invocation::Argv { program, args } => {
                write!(f, "{}", program.to_string_lossy())?;
                for arg in args {
                    write!(f, " {}", arg.to_string_lossy())?;
                }
                Ok(())
            }
            Invocation::Shell(line) => write!(f, "sh -c '{line}'"),
        }
    }
}

/// Bytes a tool printed, plus how long it ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Interleaved stdout and stderr
    pub bytes: Vec<u8>,
    /// Wall-clock time from spawn to exit
    pub elapsed: Duration,
}

impl CapturedOutput {
    /// The output decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Run `command` and wait at most `timeout` for it to exit.
///
/// On timeout the child is killed and [`HarnessError::MethodTimeout`] is
/// returned without output. A launch failure or non-zero exit yields
/// [`HarnessError::ExecutionFailed`] carrying whatever was captured.
pub fn run(command: &ToolCommand, timeout: Duration) -> Result<CapturedOutput> {
    let capture = tempfile::tempfile().map_err(|e| failed(format!("capture file: {e}")))?;
    let stdout = capture
        .try_clone()
        .map_err(|e| failed(format!("capture file: {e}")))?;
    let stderr = capture
        .try_clone()
        .map_err(|e| failed(format!("capture file: {e}")))?;

    log::debug!("spawning: {command}");
    let started = Instant::now();
    let mut child = command
        .build()
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .spawn()
        .map_err(|e| failed(format!("failed to launch '{command}': {e}")))?;

    let status = match wait_with_timeout(&mut child, timeout)? {
        Some(status) => status,
        None => {
            log::warn!("'{command}' exceeded {}s, killed", timeout.as_secs_f64());
            return Err(HarnessError::MethodTimeout { budget: timeout });
        }
    };
    let elapsed = started.elapsed();
    let bytes = read_capture(capture)?;

    if !status.success() {
        return Err(HarnessError::ExecutionFailed {
            reason: format!("'{command}' failed with {status}"),
            output: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    log::debug!("'{command}' finished in {:.3}s", elapsed.as_secs_f64());
    Ok(CapturedOutput { bytes, elapsed })
}

fn failed(reason: String) -> HarnessError {
    HarnessError::ExecutionFailed {
        reason,
        output: String::new(),
    }
}

/// `None` when the budget ran out; the child has been killed and reaped
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {
                if started.elapsed() >= timeout {
                    terminate(child);
                    let _ = child.wait();
                    return Ok(None);
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                terminate(child);
                return Err(failed(format!("waiting for child failed: {e}")));
            }
        }
    }
}

#[cfg(unix)]
fn own_process_group(cmd: &mut Command) {
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_cmd: &mut Command) {}

/// Kill the child and, on unix, every process in its group
fn terminate(child: &mut Child) {
    kill_group(child);
    let _ = child.kill();
}

#[cfg(unix)]
fn kill_group(child: &Child) {
    let Ok(pgid) = i32::try_from(child.id()) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        log::debug!("killpg({pgid}) failed: {e}");
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}

fn read_capture(mut capture: File) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    capture
        .seek(SeekFrom::Start(0))
        .and_then(|_| capture.read_to_end(&mut bytes))
        .map_err(|e| failed(format!("reading captured output: {e}")))?;
    Ok(bytes)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout_and_stderr() {
        let cmd = ToolCommand::shell("echo out; echo err 1>&2");
        let output = run(&cmd, Duration::from_secs(10)).unwrap();
        assert_eq!(output.text(), "out\nerr\n");
    }

    #[test]
    fn test_argv_arguments_not_shell_split() {
        let cmd = ToolCommand::new("printf").args(["%s|", "a b", "c"]);
        let output = run(&cmd, Duration::from_secs(10)).unwrap();
        assert_eq!(output.text(), "a b|c|");
    }

    #[test]
    fn test_non_zero_exit_carries_output() {
        let cmd = ToolCommand::shell("echo partial result; exit 3");
        let err = run(&cmd, Duration::from_secs(10)).unwrap_err();
        match &err {
            HarnessError::ExecutionFailed { output, .. } => {
                assert_eq!(output, "partial result\n")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains(" -- partial result"));
    }

    #[test]
    fn test_timeout_kills_process() {
        let cmd = ToolCommand::new("sleep").arg("5");
        let started = Instant::now();
        let err = run(&cmd, Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, HarnessError::MethodTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_kills_shell_descendants() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("marker");
        let line = format!("(sleep 1; touch '{}'); true", marker.display());

        let err = run(&ToolCommand::shell(line), Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, HarnessError::MethodTimeout { .. }));

        thread::sleep(Duration::from_millis(1500));
        assert!(!marker.exists(), "subshell outlived the timeout");
    }

    #[test]
    fn test_launch_failure() {
        let cmd = ToolCommand::new("/nonexistent/tool-binary");
        let err = run(&cmd, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, HarnessError::ExecutionFailed { .. }));
    }

    #[test]
    fn test_env_and_current_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let cmd = ToolCommand::shell("echo $MLBENCH_TEST_VAR; pwd")
            .env("MLBENCH_TEST_VAR", "hello")
            .current_dir(dir.path());
        let output = run(&cmd, Duration::from_secs(10)).unwrap();
        let text = output.text();
        assert!(text.starts_with("hello\n"));
        let canonical = dir.path().canonicalize().unwrap();
        assert!(text.contains(canonical.file_name().unwrap().to_str().unwrap()));
    }

    #[test]
    fn test_from_argv_and_display() {
        let cmd = ToolCommand::from_argv(&["java", "-classpath", "weka.jar", "DTC"]).unwrap();
        assert_eq!(cmd.to_string(), "java -classpath weka.jar DTC");
        assert!(ToolCommand::from_argv::<&str>(&[]).is_err());
    }
}
