//! TmuxCommandRunner trait and TmuxExecutor (blocking subprocess wrapper).

use std::process::Command;

use crate::error::TmuxError;

/// Runs one tmux command and returns its stdout. Mock-injectable for tests.
pub trait TmuxCommandRunner: Send + Sync {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError>;
}

impl<T: TmuxCommandRunner + ?Sized> TmuxCommandRunner for &T {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        (**self).run(args)
    }
}

/// Which tmux server to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxSocket {
    /// `tmux -S <path>`
    Path(String),
    /// `tmux -L <name>`
    Name(String),
}

/// Real tmux executor using `std::process::Command`.
#[derive(Debug, Clone)]
pub struct TmuxExecutor {
    tmux_bin: String,
    socket: Option<TmuxSocket>,
}

impl TmuxExecutor {
    pub fn new(tmux_bin: impl Into<String>) -> Self {
        Self {
            tmux_bin: tmux_bin.into(),
            socket: None,
        }
    }

    #[must_use]
    pub fn with_socket(mut self, socket: TmuxSocket) -> Self {
        self.socket = Some(socket);
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.tmux_bin);
        match &self.socket {
            Some(TmuxSocket::Path(path)) => {
                cmd.args(["-S", path]);
            }
            Some(TmuxSocket::Name(name)) => {
                cmd.args(["-L", name]);
            }
            None => {}
        }
        cmd.args(args);
        cmd
    }
}

impl Default for TmuxExecutor {
    fn default() -> Self {
        Self::new("tmux")
    }
}

impl TmuxCommandRunner for TmuxExecutor {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        tracing::debug!(bin = %self.tmux_bin, ?args, "running tmux");
        let output = self.command(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TmuxError::CommandFailed(format!(
                "exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
