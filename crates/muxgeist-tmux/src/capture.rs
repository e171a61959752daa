//! Pane capture.

use muxgeist_core::ScrollbackFallback;

use crate::error::TmuxError;
use crate::executor::{TmuxCommandRunner, TmuxExecutor};

/// Capture the visible content of `target` (session, window, or pane).
pub fn capture_visible(runner: &impl TmuxCommandRunner, target: &str) -> Result<String, TmuxError> {
    runner.run(&["capture-pane", "-p", "-t", target])
}

/// Decoder fallback that captures the session straight from tmux.
#[derive(Debug, Clone, Default)]
pub struct TmuxScrollbackFallback<R = TmuxExecutor> {
    runner: R,
}

impl<R: TmuxCommandRunner> TmuxScrollbackFallback<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: TmuxCommandRunner> ScrollbackFallback for TmuxScrollbackFallback<R> {
    fn capture(&self, session_id: &str) -> Option<String> {
        match capture_visible(&self.runner, session_id) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(session_id, error = %e, "could not get scrollback from tmux");
                None
            }
        }
    }
}
