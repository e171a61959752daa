//! muxgeist-tmux: tmux IO boundary.
//! Subprocess execution and pane capture, plus the live-capture fallback the
//! response decoder uses when the daemon sends no scrollback.

pub mod capture;
pub mod error;
pub mod executor;

pub use capture::{TmuxScrollbackFallback, capture_visible};
pub use error::TmuxError;
pub use executor::{TmuxCommandRunner, TmuxExecutor, TmuxSocket};
