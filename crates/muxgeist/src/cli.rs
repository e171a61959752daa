//! CLI definition using clap derive.

use clap::{Parser, Subcommand};
use muxgeist_tmux::TmuxSocket;

#[derive(Parser)]
#[command(name = "muxgeist", about = "tmux session context and analysis client")]
pub struct Cli {
    /// Daemon socket path (default: daemon.socket_path from config)
    #[arg(long, short = 's', global = true, env = "MUXGEIST_SOCKET")]
    pub socket_path: Option<String>,

    /// Socket read/write timeout in milliseconds (0 disables it)
    #[arg(long, global = true, default_value = "5000")]
    pub timeout_ms: u64,

    /// Do not capture the pane from tmux when the daemon sends no scrollback
    #[arg(long, global = true)]
    pub no_capture_fallback: bool,

    /// tmux server socket path used by the capture fallback (tmux -S)
    #[arg(long, global = true, conflicts_with = "tmux_socket_name")]
    pub tmux_socket: Option<String>,

    /// tmux server socket name used by the capture fallback (tmux -L)
    #[arg(long, global = true)]
    pub tmux_socket_name: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Which tmux server the capture fallback talks to; `None` is tmux's default.
    pub fn tmux_socket(&self) -> Option<TmuxSocket> {
        match (&self.tmux_socket, &self.tmux_socket_name) {
            (Some(path), _) => Some(TmuxSocket::Path(path.clone())),
            (None, Some(name)) => Some(TmuxSocket::Name(name.clone())),
            (None, None) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the daemon status line
    Status,
    /// List tracked session ids
    List,
    /// One-screen overview of tracked sessions
    Summary,
    /// Print the decoded context of a session (JSON)
    Context {
        session: String,
    },
    /// Analyze a session and print the report (JSON)
    Analyze(AnalyzeOpts),
    /// Show the resolved configuration
    Config(ConfigOpts),
}

#[derive(clap::Args)]
pub struct AnalyzeOpts {
    pub session: String,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

#[derive(clap::Args)]
pub struct ConfigOpts {
    /// Write the default config file if none exists
    #[arg(long)]
    pub init: bool,
}
