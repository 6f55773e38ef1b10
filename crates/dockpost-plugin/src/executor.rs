//! External command execution
//!
//! The plugin never spawns processes directly. It goes through a
//! [`CommandExecutor`] handed to it by the caller, which lets tests swap in a
//! [`RecordingExecutor`].

use crate::error::ExecError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStderr, ChildStdin, Command};

/// Number of trailing stderr lines kept in error messages
const STDERR_TAIL_LINES: usize = 20;

/// Runs an external program to completion
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program` with `args`, feeding `stdin` if given.
    async fn run(&self, program: &str, args: &[String], stdin: Option<&str>)
    -> Result<(), ExecError>;
}

/// Executor backed by real child processes
///
/// The child's stderr is echoed line by line as it arrives and the last
/// [`STDERR_TAIL_LINES`] lines are kept for the error on failure. Children are
/// spawned with `kill_on_drop`, so dropping the `run` future (for example when
/// the caller gives up on Ctrl-C) terminates the process.
#[derive(Debug, Default, Clone)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<(), ExecError> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        // Our stdout carries command results
        cmd.stdout(std::io::stderr());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let input = child.stdin.take();
        let errors = child.stderr.take();
        let (fed, status, tail) = tokio::join!(
            feed_stdin(input, stdin),
            child.wait(),
            stream_stderr(errors, STDERR_TAIL_LINES),
        );
        let status = status?;
        let tail = tail?;

        if !status.success() {
            let status = match status.code() {
                Some(code) => format!("exit status {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(ExecError::Failed {
                program: program.to_string(),
                status,
                stderr: Vec::from(tail).join("\n"),
            });
        }

        fed?;
        Ok(())
    }
}

/// Write `input` to the child and close the pipe.
///
/// A child that exits without reading stdin closes the pipe early; its exit
/// status then decides the outcome.
async fn feed_stdin(pipe: Option<ChildStdin>, input: Option<&str>) -> io::Result<()> {
    let (Some(mut pipe), Some(input)) = (pipe, input) else {
        return Ok(());
    };

    match pipe.write_all(input.as_bytes()).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("Child closed stdin before reading it");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Echo the child's stderr as it arrives, returning the last `keep` lines.
async fn stream_stderr(pipe: Option<ChildStderr>, keep: usize) -> io::Result<VecDeque<String>> {
    let mut tail = VecDeque::with_capacity(keep);
    let Some(pipe) = pipe else {
        return Ok(tail);
    };

    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        eprintln!("{}", line);
        push_bounded(&mut tail, line.to_string(), keep);
    }

    Ok(tail)
}

fn push_bounded(tail: &mut VecDeque<String>, line: String, keep: usize) {
    if keep == 0 {
        return;
    }
    if tail.len() == keep {
        tail.pop_front();
    }
    tail.push_back(line);
}

/// A call captured by [`RecordingExecutor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

/// Executor that records calls instead of running them
///
/// Optionally fails the N-th call (1-based) with a fixed message.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<RecordedCall>>,
    fail_on_call: Option<usize>,
    fail_message: String,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `call`-th invocation (1-based) with `message`.
    pub fn failing_on(call: usize, message: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on_call: Some(call),
            fail_message: message.into(),
        }
    }

    /// Snapshot of the calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<(), ExecError> {
        let call_number = {
            let mut calls = self
                .calls
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            calls.push(RecordedCall {
                program: program.to_string(),
                args: args.to_vec(),
                stdin: stdin.map(str::to_string),
            });
            calls.len()
        };

        if self.fail_on_call == Some(call_number) {
            return Err(ExecError::Other(self.fail_message.clone()));
        }

        Ok(())
    }
}
