// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive shell session driven over a PTY.
//!
//! A session owns one spawned interpreter, its constrained environment,
//! and a private temp file. Every operation is synchronous from the
//! caller's point of view: it returns only once the expected pattern
//! has been observed in the output stream, or fails fatally on timeout.

use std::time::Duration;

use tempfile::{NamedTempFile, TempPath};
use tokio::time::{timeout, Instant};

use crate::error::SessionError;
use crate::normalize;
use crate::prompt::PromptMatcher;
use crate::pty::Pty;

/// Prefix used when echoing commands into the captured record.
pub const DISPLAY_PREFIX: &str = "shelldiff>> ";

/// Synthetic identity exported to both shells as `$SHELL`.
const SHELL_IDENTITY: &str = "/bin/shelldiff";

/// Fixed lookup path exported to both shells.
const SESSION_PATH: &str = "/bin:/usr/bin";

/// The shell idiom for "print the last exit code".
const STATUS_PROBE: &str = "echo $?";

/// Geometry and synchronization bounds for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub cols: u16,
    pub rows: u16,
    pub timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            cols: 60,
            rows: 30,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Everything one `exec` observed, split into its three captured parts.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    /// The (possibly truncated) command display line.
    pub display: String,
    /// Everything between the echoed command and the next prompt.
    pub body: String,
    /// The echoed status probe plus the status value itself.
    pub status: String,
}

impl ExecutionRecord {
    /// The concatenated text the equivalence checker consumes.
    pub fn text(&self) -> String {
        format!(
            "{DISPLAY_PREFIX}{}\n{}{DISPLAY_PREFIX}{}",
            self.display, self.body, self.status
        )
    }
}

/// One interpreter under interactive control.
pub struct ShellSession {
    pty: Pty,
    prompt: PromptMatcher,
    line_feed: PromptMatcher,
    buf: Vec<u8>,
    timeout: Duration,
    // Unlinked when the session goes away, on every exit path.
    temp_path: TempPath,
}

impl ShellSession {
    /// Spawn the interpreter and block until its first prompt appears.
    pub async fn open(
        program: &str,
        args: &[String],
        prompt_text: &str,
        opts: &SessionOptions,
    ) -> Result<Self, SessionError> {
        let temp = NamedTempFile::new()?.into_temp_path();
        let temp_file = temp.display().to_string();

        let env = session_env(&temp_file);
        let pty = Pty::spawn(program, args, &env, opts.cols, opts.rows)?;

        let mut session = Self {
            pty,
            prompt: PromptMatcher::literal(prompt_text),
            line_feed: PromptMatcher::line_feed(),
            buf: Vec::new(),
            timeout: opts.timeout,
            temp_path: temp,
        };

        let prompt = session.prompt.clone();
        session.expect(&prompt).await?;
        Ok(session)
    }

    /// Path of this session's private temp file, exported as `$TMPFILE`.
    pub fn temp_file(&self) -> String {
        self.temp_path.display().to_string()
    }

    /// Run one command to completion and capture its record: the echoed
    /// command line, the output body, and the exit-status probe.
    pub async fn exec(&mut self, command: &str) -> Result<ExecutionRecord, SessionError> {
        self.send_line(command).await?;
        let line_feed = self.line_feed.clone();
        self.expect(&line_feed).await?;
        let display = normalize::display_text(command);

        let prompt = self.prompt.clone();
        let body = self.expect(&prompt).await?;

        self.send_line(STATUS_PROBE).await?;
        let status = self.expect(&prompt).await?;

        Ok(ExecutionRecord {
            display,
            body,
            status,
        })
    }

    /// Ask the interpreter to terminate, wait for end-of-stream, reap the
    /// child, and return the formatted teardown report.
    pub async fn close(mut self) -> Result<String, SessionError> {
        self.send_line("exit 0").await?;
        let tail = self.expect_eof().await?;
        let code = self.pty.wait().await?;
        Ok(format!("\n\nEXIT REPORT:\n{tail}\n\nExit status: {code}"))
    }

    async fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        self.pty.write_all(line.as_bytes()).await?;
        self.pty.write_all(b"\n").await
    }

    /// Accumulate output until `matcher` appears, returning everything
    /// before the match and consuming through its end.
    async fn expect(&mut self, matcher: &PromptMatcher) -> Result<String, SessionError> {
        let deadline = Instant::now() + self.timeout;
        let mut chunk = [0u8; 4096];

        loop {
            if let Some((start, end)) = matcher.find(&self.buf) {
                let before = String::from_utf8_lossy(&self.buf[..start]).into_owned();
                self.buf.drain(..end);
                return Ok(before);
            }
            if Instant::now() > deadline {
                return Err(SessionError::SyncTimeout {
                    pattern: matcher.describe().to_string(),
                    timeout: self.timeout,
                });
            }
            match timeout(Duration::from_millis(100), self.pty.read(&mut chunk)).await {
                Ok(Ok(0)) => {
                    return Err(SessionError::Eof {
                        pattern: matcher.describe().to_string(),
                    })
                }
                Ok(Ok(n)) => self.buf.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) => return Err(e),
                Err(_) => {}
            }
        }
    }

    /// Accumulate output until the stream ends, returning all of it.
    async fn expect_eof(&mut self) -> Result<String, SessionError> {
        let deadline = Instant::now() + self.timeout;
        let mut chunk = [0u8; 4096];

        loop {
            if Instant::now() > deadline {
                return Err(SessionError::SyncTimeout {
                    pattern: "end of stream".to_string(),
                    timeout: self.timeout,
                });
            }
            match timeout(Duration::from_millis(100), self.pty.read(&mut chunk)).await {
                Ok(Ok(0)) => {
                    let tail = String::from_utf8_lossy(&self.buf).into_owned();
                    self.buf.clear();
                    return Ok(tail);
                }
                Ok(Ok(n)) => self.buf.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) => return Err(e),
                Err(_) => {}
            }
        }
    }
}

/// The constrained environment every session child sees: a fixed PATH,
/// inherited-or-default USER and HOME, the synthetic SHELL identity, and
/// this session's private temp file.
fn session_env(temp_file: &str) -> Vec<(String, String)> {
    vec![
        ("PATH".to_string(), SESSION_PATH.to_string()),
        (
            "USER".to_string(),
            std::env::var("USER").unwrap_or_else(|_| "unknown".to_string()),
        ),
        (
            "HOME".to_string(),
            std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()),
        ),
        ("SHELL".to_string(), SHELL_IDENTITY.to_string()),
        ("TERM".to_string(), "vt100".to_string()),
        ("TMPFILE".to_string(), temp_file.to_string()),
    ]
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
