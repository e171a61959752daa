//! muxgeist: query the session-context daemon and analyze tmux sessions.

use std::time::Duration;

use clap::Parser;
use muxgeist::{DaemonClient, SessionService};
use muxgeist_core::{ConfigResolver, ResponseDecoder};
use muxgeist_tmux::{TmuxExecutor, TmuxScrollbackFallback};

mod cli;
mod cmd_config;
mod cmd_session;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let config = ConfigResolver::load();

    let filter = std::env::var("MUXGEIST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| config.get_string_or("logging.level", "warn").to_lowercase());
    let filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let decoder = if args.no_capture_fallback {
        ResponseDecoder::new()
    } else {
        let executor = match args.tmux_socket() {
            Some(socket) => TmuxExecutor::default().with_socket(socket),
            None => TmuxExecutor::default(),
        };
        ResponseDecoder::new().with_fallback(TmuxScrollbackFallback::with_runner(executor))
    };
    let socket_path = args.socket_path.unwrap_or_else(|| config.socket_path());
    let client = DaemonClient::new(socket_path)
        .with_timeout(Duration::from_millis(args.timeout_ms))
        .with_decoder(decoder);

    let exit_code = match args.command {
        cli::Command::Status => cmd_session::cmd_status(&client),
        cli::Command::List => cmd_session::cmd_list(&client),
        cli::Command::Summary => cmd_session::cmd_summary(&SessionService::new(client)),
        cli::Command::Context { session } => cmd_session::cmd_context(&client, &session)?,
        cli::Command::Analyze(opts) => {
            cmd_session::cmd_analyze(&SessionService::new(client), &opts.session, opts.pretty)?
        }
        cli::Command::Config(opts) => {
            cmd_config::cmd_config(&config, opts.init)?;
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
