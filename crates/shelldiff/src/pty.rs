// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! PTY (pseudo-terminal) handling.
//!
//! Creates a PTY pair, spawns an interpreter in it with a constrained
//! environment, and provides async read/write to the master side.

use std::ffi::CString;
use std::io;
use std::os::fd::{FromRawFd, IntoRawFd, OwnedFd};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::pty::{forkpty, Winsize};
use nix::sys::signal::{kill, signal, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{ForkResult, Pid};
use tokio::io::unix::AsyncFd;

use crate::error::SessionError;

/// A running PTY with an interpreter child process.
pub struct Pty {
    master_fd: AsyncFd<OwnedFd>,
    child: Option<Pid>,
}

impl Pty {
    /// Spawn `program` with `args` in a new PTY, replacing the child's
    /// environment with exactly `env` (`KEY=VALUE` pairs are built here).
    pub fn spawn(
        program: &str,
        args: &[String],
        env: &[(String, String)],
        cols: u16,
        rows: u16,
    ) -> Result<Self, SessionError> {
        let path_var = env
            .iter()
            .find(|(k, _)| k == "PATH")
            .map(|(_, v)| v.as_str())
            .unwrap_or("");
        let resolved = resolve_program(program, path_var).ok_or_else(|| SessionError::Spawn {
            program: program.to_string(),
            reason: "not found on the session PATH".to_string(),
        })?;

        let spawn_err = |reason: String| SessionError::Spawn {
            program: program.to_string(),
            reason,
        };

        let c_program = CString::new(resolved.as_os_str().as_encoded_bytes())
            .map_err(|e| spawn_err(e.to_string()))?;
        let mut c_args = vec![CString::new(program).map_err(|e| spawn_err(e.to_string()))?];
        for arg in args {
            c_args.push(CString::new(arg.as_str()).map_err(|e| spawn_err(e.to_string()))?);
        }
        let mut c_env = Vec::with_capacity(env.len());
        for (key, value) in env {
            c_env.push(
                CString::new(format!("{key}={value}")).map_err(|e| spawn_err(e.to_string()))?,
            );
        }

        let winsize = Winsize {
            ws_row: rows,
            ws_col: cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };

        // SAFETY: forkpty is safe to call; it creates a new PTY and forks.
        // In the child, we immediately exec, so no shared state issues.
        let result = unsafe { forkpty(&winsize, None) }
            .map_err(|e| spawn_err(io::Error::from(e).to_string()))?;

        match result.fork_result {
            ForkResult::Child => {
                // SAFETY: Restoring SIGPIPE to default is safe in the child
                // process before exec. The child has no other threads here.
                unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl).ok() };

                let _ = nix::unistd::execvpe(&c_program, &c_args, &c_env);
                // exec failed; the parent sees an immediate EOF.
                std::process::exit(127);
            }
            ForkResult::Parent { child } => {
                let master = result.master;
                set_non_blocking(&master).map_err(|e| spawn_err(io::Error::from(e).to_string()))?;

                // SAFETY: We own the master fd from forkpty and transfer
                // ownership to OwnedFd. The fd is valid and not used
                // elsewhere after this point.
                let owned: OwnedFd = unsafe { OwnedFd::from_raw_fd(master.into_raw_fd()) };
                let async_fd = AsyncFd::new(owned).map_err(SessionError::Io)?;

                Ok(Self {
                    master_fd: async_fd,
                    child: Some(child),
                })
            }
        }
    }

    /// Read output from the PTY (child's stdout/stderr). Returns 0 on EOF.
    pub async fn read(&self, buf: &mut [u8]) -> Result<usize, SessionError> {
        loop {
            let mut guard = self.master_fd.readable().await?;
            match nb_read(self.master_fd.get_ref(), buf).map_err(io::Error::from)? {
                Some(n) => return Ok(n),
                None => guard.clear_ready(),
            }
        }
    }

    /// Write input to the PTY (sends to child's stdin).
    pub async fn write_all(&self, data: &[u8]) -> Result<(), SessionError> {
        let mut written = 0;
        while written < data.len() {
            let mut guard = self.master_fd.writable().await?;
            match nb_write(self.master_fd.get_ref(), &data[written..]).map_err(io::Error::from)? {
                Some(n) => written += n,
                None => guard.clear_ready(),
            }
        }
        Ok(())
    }

    /// Wait for the child process to exit and return its exit code.
    pub async fn wait(&mut self) -> Result<i32, SessionError> {
        let Some(pid) = self.child.take() else {
            return Err(SessionError::Io(io::Error::other("child already reaped")));
        };

        let status = tokio::task::spawn_blocking(move || waitpid(pid, None))
            .await
            .map_err(io::Error::other)?
            .map_err(io::Error::from)?;

        match status {
            WaitStatus::Exited(_, code) => Ok(code),
            WaitStatus::Signaled(_, sig, _) => Ok(128 + sig as i32),
            _ => Ok(1),
        }
    }
}

impl Drop for Pty {
    fn drop(&mut self) {
        // The run may abort mid-command; never leave the child behind.
        if let Some(pid) = self.child.take() {
            kill(pid, Signal::SIGKILL).ok();
            waitpid(pid, None).ok();
        }
    }
}

/// Resolve `program` against the session's PATH. Names containing a slash
/// are taken literally, everything else is searched like execvp would.
fn resolve_program(program: &str, path_var: &str) -> Option<PathBuf> {
    if program.contains('/') {
        let candidate = PathBuf::from(program);
        return is_executable(&candidate).then_some(candidate);
    }
    for dir in path_var.split(':').filter(|d| !d.is_empty()) {
        let candidate = Path::new(dir).join(program);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

fn set_non_blocking(fd: &OwnedFd) -> nix::Result<()> {
    use std::os::fd::AsRawFd;
    let flags = fcntl(fd.as_raw_fd(), FcntlArg::F_GETFL)?;
    let flags = OFlag::from_bits_truncate(flags) | OFlag::O_NONBLOCK;
    fcntl(fd.as_raw_fd(), FcntlArg::F_SETFL(flags))?;
    Ok(())
}

/// Read, handling EAGAIN/EWOULDBLOCK. Returns None if would block.
fn nb_read(fd: &OwnedFd, buf: &mut [u8]) -> nix::Result<Option<usize>> {
    use std::os::fd::AsRawFd;
    match nix::unistd::read(fd.as_raw_fd(), buf) {
        Ok(n) => Ok(Some(n)),
        Err(Errno::EAGAIN) => Ok(None),
        Err(Errno::EIO) => Ok(Some(0)), // PTY closed
        Err(e) => Err(e),
    }
}

/// Write, handling EAGAIN/EWOULDBLOCK. Returns None if would block.
fn nb_write(fd: &OwnedFd, buf: &[u8]) -> nix::Result<Option<usize>> {
    match nix::unistd::write(fd, buf) {
        Ok(n) => Ok(Some(n)),
        Err(Errno::EAGAIN) => Ok(None),
        Err(e) => Err(e),
    }
}
