//! Background execution of the wrapped tool.
//!
//! Every run reports back over a channel as exactly one [`RunMessage::Started`]
//! followed by exactly one [`RunMessage::Finished`]. The startup search-path
//! probe goes through the same pair of messages, tagged [`Origin::Probe`].

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::config::describe_duration;
use crate::error::{Error, Result};
use crate::interpolation::command_text;

/// Time allowed for the output pipes to close once the child has exited or
/// been killed. A grandchild holding a pipe open must not hang the run.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

const READ_CHUNK: usize = 4096;

/// Who asked for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The startup check for the tool on the search path
    Probe,
    /// An operator dispatch
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
    TimedOut,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => f.write_str("success"),
            Outcome::Failure(reason) => write!(f, "failure ({reason})"),
            Outcome::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Result of one finished execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub command_text: String,
    /// Merged stdout and stderr, verbatim
    pub output: String,
    pub outcome: Outcome,
}

impl RunOutcome {
    fn failed(command_text: String, output: String, reason: String) -> Self {
        // Without any captured output the reason is the only thing worth showing
        let output = if output.trim().is_empty() {
            reason.clone()
        } else {
            output
        };

        Self {
            command_text,
            output,
            outcome: Outcome::Failure(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMessage {
    Started {
        origin: Origin,
        command_text: String,
    },
    Finished {
        origin: Origin,
        result: RunOutcome,
    },
}

/// Something that can take an argument vector and run it.
///
/// The interactive state machine only talks to this trait, so tests can
/// record dispatches instead of spawning processes.
pub trait Executor {
    fn execute(&mut self, argv: Vec<String>);
}

async fn pump<R: AsyncRead + Unpin>(mut reader: R, sender: UnboundedSender<Vec<u8>>) {
    let mut buffer = [0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => {
                if sender.send(buffer[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Stopped reading child output: {e}");
                break;
            }
        }
    }
}

/// Runs `argv` to completion or until `timeout` elapses.
///
/// Standard output and standard error are merged in arrival order. On timeout
/// the child is killed and a notice is appended to whatever was captured.
/// Launch failures come back as [`Outcome::Failure`] like any other failure.
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        warn!("Process id {pid} out of range, not killing its group");
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        warn!("Failed to kill process group {pid}: {e}");
    }
}

pub async fn run_command(argv: Vec<String>, timeout: Duration) -> RunOutcome {
    let text = command_text(&argv);

    let Some((program, args)) = argv.split_first() else {
        let reason = Error::EmptyArgumentVector.to_string();
        return RunOutcome::failed(text, String::new(), reason);
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // Own group so a timeout can take down everything the tool started
    #[cfg(unix)]
    command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            let reason = Error::launch_error(program, e).to_string();
            warn!("{reason}");
            return RunOutcome::failed(text, String::new(), reason);
        }
    };

    let (sender, mut receiver) = mpsc::unbounded_channel::<Vec<u8>>();
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(pump(stdout, sender.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(pump(stderr, sender.clone()));
    }
    drop(sender);

    let outcome = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) if status.success() => Outcome::Success,
        Ok(Ok(status)) => Outcome::Failure(status.to_string()),
        Ok(Err(e)) => Outcome::Failure(e.to_string()),
        Err(_elapsed) => {
            warn!("`{text}` timed out after {}", describe_duration(timeout));
            #[cfg(unix)]
            if let Some(pid) = child.id() {
                kill_process_group(pid);
            }
            if let Err(e) = child.kill().await {
                warn!("Failed to kill timed out child: {e}");
            }
            Outcome::TimedOut
        }
    };

    let mut captured: Vec<u8> = Vec::new();
    let drain = async {
        while let Some(chunk) = receiver.recv().await {
            captured.extend_from_slice(&chunk);
        }
    };
    if tokio::time::timeout(DRAIN_GRACE, drain).await.is_err() {
        debug!("Output pipes of `{text}` still open, keeping what arrived");
    }
    while let Ok(chunk) = receiver.try_recv() {
        captured.extend_from_slice(&chunk);
    }

    let mut output = String::from_utf8_lossy(&captured).to_string();

    match outcome {
        Outcome::TimedOut => {
            output.push_str(&format!(
                "\n\nTimed out after {}.",
                describe_duration(timeout)
            ));
            RunOutcome {
                command_text: text,
                output,
                outcome: Outcome::TimedOut,
            }
        }
        Outcome::Failure(reason) => RunOutcome::failed(text, output, reason),
        Outcome::Success => RunOutcome {
            command_text: text,
            output,
            outcome: Outcome::Success,
        },
    }
}

/// Resolves `tool` on the search path.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if no executable of that name is found.
pub fn probe_tool(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| Error::ToolNotFound(tool.to_string()))
}

/// Command text reported for the startup probe.
pub fn probe_command_text(tool: &str) -> String {
    format!("which {tool}")
}

/// Runs commands and the startup probe on a tokio runtime, reporting back
/// through an unbounded channel that the event loop drains.
pub struct TaskRunner {
    handle: Handle,
    sender: UnboundedSender<RunMessage>,
    timeout: Duration,
}

impl TaskRunner {
    pub fn new(handle: Handle, sender: UnboundedSender<RunMessage>, timeout: Duration) -> Self {
        Self {
            handle,
            sender,
            timeout,
        }
    }

    /// Looks up `tool` in the background and reports it as an [`Origin::Probe`] run.
    pub fn probe(&self, tool: &str) {
        let sender = self.sender.clone();
        let tool = tool.to_string();

        self.handle.spawn_blocking(move || {
            let text = probe_command_text(&tool);
            let _ = sender.send(RunMessage::Started {
                origin: Origin::Probe,
                command_text: text.clone(),
            });

            let result = match probe_tool(&tool) {
                Ok(path) => {
                    info!("Found {tool} at {}", path.display());
                    RunOutcome {
                        command_text: text,
                        output: format!("{tool} detected"),
                        outcome: Outcome::Success,
                    }
                }
                Err(e) => {
                    warn!("{e}");
                    RunOutcome::failed(text, String::new(), e.to_string())
                }
            };

            let _ = sender.send(RunMessage::Finished {
                origin: Origin::Probe,
                result,
            });
        });
    }
}

impl Executor for TaskRunner {
    fn execute(&mut self, argv: Vec<String>) {
        let sender = self.sender.clone();
        let timeout = self.timeout;

        self.handle.spawn(async move {
            let text = command_text(&argv);
            info!("Running `{text}`");
            // A closed receiver means the UI is gone; nothing left to report to
            let _ = sender.send(RunMessage::Started {
                origin: Origin::User,
                command_text: text,
            });

            let result = run_command(argv, timeout).await;
            info!("`{}` finished: {}", result.command_text, result.outcome);

            let _ = sender.send(RunMessage::Finished {
                origin: Origin::User,
                result,
            });
        });
    }
}
